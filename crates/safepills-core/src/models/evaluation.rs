//! Risk evaluation models.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::Answers;

/// Ordered risk classification.
///
/// The legacy backend only emits green/orange/red; the current one adds yellow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(from = "String", rename_all = "UPPERCASE")]
pub enum Severity {
    Green,
    Yellow,
    Orange,
    Red,
}

impl Severity {
    /// Parse a backend label.
    ///
    /// Accepts the evaluation labels (`GREEN`..`RED`, any case) and the
    /// interaction labels (`Vert`, `Jaune`, `Orange`, `Rouge`). Anything else
    /// is treated as `Red`: an unrecognized verdict is never shown as safe.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "green" | "vert" => Severity::Green,
            "yellow" | "jaune" => Severity::Yellow,
            "orange" => Severity::Orange,
            "red" | "rouge" => Severity::Red,
            other => {
                tracing::warn!(label = %other, "Unknown severity label, using red");
                Severity::Red
            }
        }
    }

    /// Lowercase name used for presentation classes.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Green => "green",
            Severity::Yellow => "yellow",
            Severity::Orange => "orange",
            Severity::Red => "red",
        }
    }
}

impl Severity {
    /// Parse a question's risk tag. Only the four evaluation labels count;
    /// any other tag leaves the question untagged.
    pub fn from_risk_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_uppercase().as_str() {
            "GREEN" => Some(Severity::Green),
            "YELLOW" => Some(Severity::Yellow),
            "ORANGE" => Some(Severity::Orange),
            "RED" => Some(Severity::Red),
            _ => None,
        }
    }
}

/// Deserialize an optional `risk_level` with [`Severity::from_risk_tag`].
pub fn deserialize_risk_tag<'de, D>(deserializer: D) -> Result<Option<Severity>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag = Option::<String>::deserialize(deserializer)?;
    Ok(tag.as_deref().and_then(Severity::from_risk_tag))
}

impl From<String> for Severity {
    fn from(label: String) -> Self {
        Severity::from_label(&label)
    }
}

/// Body of `POST /api/automedication/evaluate`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationRequest {
    /// Drug CIS or substance code
    pub cis: String,
    /// Medical answers only, keyed by question id
    pub answers: BTreeMap<String, bool>,
    pub has_other_meds: bool,
    pub gender: Option<String>,
    pub age: Option<i64>,
}

/// Response of the evaluate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluationResponse {
    pub score: Severity,
    /// Explanatory messages computed by the scoring rules
    #[serde(default)]
    pub details: Vec<String>,
    /// Plain-language explanation generated for orange/red verdicts
    #[serde(default)]
    pub ai_explanation: Option<String>,
    #[serde(default)]
    pub general_advice: Option<Vec<String>>,
    #[serde(default)]
    pub has_coverage: Option<bool>,
}

/// Where a verdict came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrigin {
    /// Computed by the scoring service
    Assessed,
    /// The scoring service could not be reached; severity is the fail-safe default
    Unavailable,
}

/// Final outcome of a questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub severity: Severity,
    pub explanation: Option<String>,
    pub general_advice: Vec<String>,
    /// Whether the reference base knows any risk question for the substance
    pub has_coverage: bool,
    pub origin: ResultOrigin,
    /// Answers collected when the result was requested
    pub answers: Answers,
    /// RFC 3339 timestamp
    pub evaluated_at: String,
}

impl AnalysisResult {
    /// Map a scoring response, passing explanation and advice through unchanged.
    pub fn from_response(response: EvaluationResponse, answers: Answers) -> Self {
        Self {
            severity: response.score,
            explanation: response.ai_explanation,
            general_advice: response.general_advice.unwrap_or_default(),
            has_coverage: response.has_coverage.unwrap_or(true),
            origin: ResultOrigin::Assessed,
            answers,
            evaluated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Highest-severity verdict used when the assessment could not be performed.
    pub fn unavailable(answers: Answers) -> Self {
        Self {
            severity: Severity::Red,
            explanation: None,
            general_advice: Vec::new(),
            has_coverage: true,
            origin: ResultOrigin::Unavailable,
            answers,
            evaluated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Fixed verdict with no backend round-trip (legacy "no questions" screen).
    pub fn acknowledged(severity: Severity) -> Self {
        Self {
            severity,
            explanation: None,
            general_advice: Vec::new(),
            has_coverage: false,
            origin: ResultOrigin::Assessed,
            answers: Answers::new(),
            evaluated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn is_assessed(&self) -> bool {
        self.origin == ResultOrigin::Assessed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Green < Severity::Yellow);
        assert!(Severity::Yellow < Severity::Orange);
        assert!(Severity::Orange < Severity::Red);
        assert_eq!(
            [Severity::Orange, Severity::Green, Severity::Red]
                .into_iter()
                .max(),
            Some(Severity::Red)
        );
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::from_label("GREEN"), Severity::Green);
        assert_eq!(Severity::from_label("yellow"), Severity::Yellow);
        assert_eq!(Severity::from_label("Jaune"), Severity::Yellow);
        assert_eq!(Severity::from_label("Rouge"), Severity::Red);
        assert_eq!(Severity::from_label("Vert"), Severity::Green);
        assert_eq!(Severity::from_label("PURPLE"), Severity::Red);
    }

    #[test]
    fn test_risk_tag_is_strict() {
        assert_eq!(Severity::from_risk_tag("RED"), Some(Severity::Red));
        assert_eq!(Severity::from_risk_tag("orange"), Some(Severity::Orange));
        assert_eq!(Severity::from_risk_tag("LOW"), None);
        assert_eq!(Severity::from_risk_tag("Rouge"), None);
    }

    #[test]
    fn test_severity_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Severity::Orange).unwrap(), "\"ORANGE\"");
    }

    #[test]
    fn test_red_response_passes_through() {
        let json = r#"{
            "score": "RED",
            "details": ["Contre-indication"],
            "ai_explanation": "Vous avez indiqué une grossesse.",
            "general_advice": ["Demandez conseil à votre pharmacien"],
            "has_coverage": true
        }"#;

        let response: EvaluationResponse = serde_json::from_str(json).unwrap();
        let result = AnalysisResult::from_response(response, Answers::new());

        assert_eq!(result.severity, Severity::Red);
        assert_eq!(
            result.explanation.as_deref(),
            Some("Vous avez indiqué une grossesse.")
        );
        assert_eq!(result.general_advice, vec!["Demandez conseil à votre pharmacien"]);
        assert!(result.has_coverage);
        assert!(result.is_assessed());
    }

    #[test]
    fn test_minimal_response_defaults() {
        let response: EvaluationResponse = serde_json::from_str(r#"{"score":"GREEN"}"#).unwrap();
        let result = AnalysisResult::from_response(response, Answers::new());

        assert_eq!(result.severity, Severity::Green);
        assert!(result.general_advice.is_empty());
        assert!(result.has_coverage);
        assert!(result.explanation.is_none());
    }

    #[test]
    fn test_unavailable_is_red() {
        let result = AnalysisResult::unavailable(Answers::new());
        assert_eq!(result.severity, Severity::Red);
        assert!(!result.is_assessed());
        assert!(result.general_advice.is_empty());
    }

    #[test]
    fn test_request_wire_shape() {
        let mut answers = BTreeMap::new();
        answers.insert("Q_ULCERE".to_string(), false);

        let request = EvaluationRequest {
            cis: "60234100".into(),
            answers,
            has_other_meds: true,
            gender: Some("F".into()),
            age: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "cis": "60234100",
                "answers": {"Q_ULCERE": false},
                "has_other_meds": true,
                "gender": "F",
                "age": null
            })
        );
    }
}
