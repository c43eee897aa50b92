//! Drug-drug interaction report models.

use serde::{Deserialize, Serialize};

use super::Severity;

/// Response of `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionReport {
    pub interaction_detected: bool,
    /// `Rouge`, `Orange`, `Jaune`, `Vert` or null
    #[serde(default)]
    pub global_severity: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub conduct_to_follow: Option<String>,
    #[serde(default)]
    pub technical_details: Vec<InteractionDetail>,
}

/// One interacting pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionDetail {
    pub molecule_a: String,
    pub molecule_b: String,
    pub level_risk: String,
    pub risk: String,
    #[serde(default)]
    pub management: Option<String>,
}

impl InteractionReport {
    /// Overall severity, if the service reported one.
    pub fn severity(&self) -> Option<Severity> {
        self.global_severity.as_deref().map(Severity::from_label)
    }
}

impl InteractionDetail {
    pub fn severity(&self) -> Severity {
        Severity::from_label(&self.level_risk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let json = r#"{
            "interaction_detected": true,
            "global_severity": "Orange",
            "explanation": "Association déconseillée",
            "conduct_to_follow": "Espacer les prises",
            "technical_details": [
                {"molecule_a": "ibuprofène", "molecule_b": "aspirine", "level_risk": "Orange", "risk": "Risque hémorragique"}
            ]
        }"#;

        let report: InteractionReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.severity(), Some(Severity::Orange));
        assert_eq!(report.technical_details.len(), 1);
        assert!(report.technical_details[0].management.is_none());
    }

    #[test]
    fn test_no_interaction_has_no_severity() {
        let json = r#"{"interaction_detected": false, "global_severity": null, "explanation": "", "conduct_to_follow": "", "technical_details": []}"#;
        let report: InteractionReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.severity(), None);
    }
}
