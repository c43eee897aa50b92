//! Questionnaire flow models.
//!
//! The flow endpoint returns profile questions (gender, age, other medications)
//! followed by medical yes/no questions. Each question may carry a `show_if`
//! predicate that the client evaluates against the answers collected so far.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Severity;

/// Answer key for the gender profile question.
pub const GENDER_KEY: &str = "GENDER";
/// Answer key for the age profile question.
pub const AGE_KEY: &str = "AGE";
/// Answer key for the concurrent-medication profile question.
pub const HAS_OTHER_MEDS_KEY: &str = "HAS_OTHER_MEDS";

/// One question of the unified flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowQuestion {
    /// Question identifier (profile key or medical question id)
    pub id: String,
    /// Localized question text
    pub text: String,
    /// Expected answer kind
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Options for `choice` questions
    #[serde(default)]
    pub options: Option<Vec<FlowOption>>,
    /// Risk tag (medical questions only); unknown tags are dropped
    #[serde(default, deserialize_with = "super::deserialize_risk_tag")]
    pub risk_level: Option<Severity>,
    /// Visibility predicate; absent means always visible
    #[serde(default)]
    pub show_if: Option<ShowIf>,
    /// Demographic question rather than a medical one
    #[serde(default)]
    pub is_profile: bool,
}

/// Answer kind expected by a question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Choice,
    Number,
    Boolean,
}

/// A labeled option of a `choice` question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowOption {
    pub value: String,
    pub label: String,
}

impl FlowQuestion {
    /// Create a medical yes/no question.
    pub fn medical(id: impl Into<String>, text: impl Into<String>, risk: Severity) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind: QuestionKind::Boolean,
            options: None,
            risk_level: Some(risk),
            show_if: None,
            is_profile: false,
        }
    }

    /// Create a profile question.
    pub fn profile(id: impl Into<String>, text: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind,
            options: None,
            risk_level: None,
            show_if: None,
            is_profile: true,
        }
    }

    /// Attach choice options.
    pub fn with_options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = Some(
            options
                .iter()
                .map(|(value, label)| FlowOption {
                    value: (*value).to_string(),
                    label: (*label).to_string(),
                })
                .collect(),
        );
        self
    }

    /// Add a visibility condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.show_if
            .get_or_insert_with(ShowIf::default)
            .conditions
            .push(condition);
        self
    }

    /// Check whether the question is visible under the given answers.
    pub fn is_visible(&self, answers: &Answers) -> bool {
        self.show_if
            .as_ref()
            .map_or(true, |show_if| show_if.is_satisfied(answers))
    }

    /// Check whether an affirmative answer ends the questionnaire early.
    pub fn is_red_flag(&self) -> bool {
        !self.is_profile && self.risk_level == Some(Severity::Red)
    }

    /// Check whether a value is an acceptable answer for this question.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        match (self.kind, value) {
            (QuestionKind::Boolean, AnswerValue::Boolean(_)) => true,
            (QuestionKind::Number, AnswerValue::Number(_)) => true,
            (QuestionKind::Choice, AnswerValue::Text(choice)) => match &self.options {
                Some(options) => options.iter().any(|o| &o.value == choice),
                None => true,
            },
            _ => false,
        }
    }
}

/// Visibility predicate: every condition must hold.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawShowIf", into = "RawShowIf")]
pub struct ShowIf {
    pub conditions: Vec<Condition>,
}

/// One clause of a visibility predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Gender answer must equal the value; unanswered fails
    GenderEquals(String),
    /// Age answer must fall within the bounds; unanswered passes
    AgeRange { min: Option<i64>, max: Option<i64> },
    /// Concurrent-medication answer must equal the value; unanswered fails
    HasOtherMedsEquals(bool),
}

impl ShowIf {
    pub fn is_satisfied(&self, answers: &Answers) -> bool {
        self.conditions.iter().all(|c| c.is_satisfied(answers))
    }
}

impl Condition {
    pub fn is_satisfied(&self, answers: &Answers) -> bool {
        match self {
            Condition::GenderEquals(expected) => answers.text(GENDER_KEY) == Some(expected.as_str()),
            Condition::AgeRange { min, max } => match answers.number(AGE_KEY) {
                None => true,
                Some(age) => min.map_or(true, |m| age >= m) && max.map_or(true, |m| age <= m),
            },
            Condition::HasOtherMedsEquals(expected) => {
                answers.boolean(HAS_OTHER_MEDS_KEY) == Some(*expected)
            }
        }
    }
}

/// Wire shape of `show_if`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawShowIf {
    #[serde(rename = "GENDER", default, skip_serializing_if = "Option::is_none")]
    gender: Option<String>,
    #[serde(rename = "AGE_MIN", default, skip_serializing_if = "Option::is_none")]
    age_min: Option<i64>,
    #[serde(rename = "AGE_MAX", default, skip_serializing_if = "Option::is_none")]
    age_max: Option<i64>,
    #[serde(rename = "HAS_OTHER_MEDS", default, skip_serializing_if = "Option::is_none")]
    has_other_meds: Option<bool>,
}

impl From<RawShowIf> for ShowIf {
    fn from(raw: RawShowIf) -> Self {
        let mut conditions = Vec::new();
        if let Some(gender) = raw.gender {
            conditions.push(Condition::GenderEquals(gender));
        }
        if raw.age_min.is_some() || raw.age_max.is_some() {
            conditions.push(Condition::AgeRange {
                min: raw.age_min,
                max: raw.age_max,
            });
        }
        if let Some(expected) = raw.has_other_meds {
            conditions.push(Condition::HasOtherMedsEquals(expected));
        }
        Self { conditions }
    }
}

impl From<ShowIf> for RawShowIf {
    fn from(show_if: ShowIf) -> Self {
        let mut raw = RawShowIf::default();
        for condition in show_if.conditions {
            match condition {
                Condition::GenderEquals(gender) => raw.gender = Some(gender),
                Condition::AgeRange { min, max } => {
                    raw.age_min = min;
                    raw.age_max = max;
                }
                Condition::HasOtherMedsEquals(expected) => raw.has_other_meds = Some(expected),
            }
        }
        raw
    }
}

/// A single response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnswerValue {
    Boolean(bool),
    Number(i64),
    Text(String),
}

impl AnswerValue {
    /// Check for a "yes" answer.
    pub fn is_affirmative(&self) -> bool {
        matches!(self, AnswerValue::Boolean(true))
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Boolean(value)
    }
}

impl From<i64> for AnswerValue {
    fn from(value: i64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

/// Answers collected during a questionnaire, keyed by question id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Answers(BTreeMap<String, AnswerValue>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question_id: impl Into<String>, value: AnswerValue) {
        self.0.insert(question_id.into(), value);
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn text(&self, question_id: &str) -> Option<&str> {
        match self.0.get(question_id) {
            Some(AnswerValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn number(&self, question_id: &str) -> Option<i64> {
        match self.0.get(question_id) {
            Some(AnswerValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn boolean(&self, question_id: &str) -> Option<bool> {
        match self.0.get(question_id) {
            Some(AnswerValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    /// Keep only the answers whose key satisfies the predicate.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|key, _| keep(key));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, AnswerValue)]) -> Answers {
        let mut answers = Answers::new();
        for (key, value) in pairs {
            answers.insert(*key, value.clone());
        }
        answers
    }

    #[test]
    fn test_parse_flow_question() {
        let json = r#"{
            "id": "Q_GROSSESSE",
            "text": "Êtes-vous enceinte ?",
            "type": "boolean",
            "risk_level": "RED",
            "show_if": {"GENDER": "F", "AGE_MIN": 15, "AGE_MAX": 50},
            "is_profile": false
        }"#;

        let question: FlowQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(question.kind, QuestionKind::Boolean);
        assert_eq!(question.risk_level, Some(Severity::Red));
        assert!(question.is_red_flag());

        let show_if = question.show_if.unwrap();
        assert_eq!(
            show_if.conditions,
            vec![
                Condition::GenderEquals("F".into()),
                Condition::AgeRange {
                    min: Some(15),
                    max: Some(50)
                },
            ]
        );
    }

    #[test]
    fn test_unknown_risk_tag_is_not_a_red_flag() {
        let json = r#"{"id": "Q_X", "text": "?", "type": "boolean", "risk_level": "LOW", "is_profile": false}"#;
        let question: FlowQuestion = serde_json::from_str(json).unwrap();
        assert!(question.risk_level.is_none());
        assert!(!question.is_red_flag());

        let json = r#"{"id": "Q_Y", "text": "?", "type": "boolean", "risk_level": null, "is_profile": false}"#;
        let question: FlowQuestion = serde_json::from_str(json).unwrap();
        assert!(question.risk_level.is_none());
    }

    #[test]
    fn test_parse_profile_question_defaults() {
        let json = r#"{
            "id": "GENDER",
            "text": "Quel est votre sexe ?",
            "type": "choice",
            "options": [{"value": "M", "label": "Un homme"}, {"value": "F", "label": "Une femme"}],
            "is_profile": true
        }"#;

        let question: FlowQuestion = serde_json::from_str(json).unwrap();
        assert!(question.is_profile);
        assert!(question.show_if.is_none());
        assert!(question.risk_level.is_none());
        assert!(!question.is_red_flag());
        assert!(question.accepts(&"F".into()));
        assert!(!question.accepts(&"X".into()));
        assert!(!question.accepts(&true.into()));
    }

    #[test]
    fn test_unknown_show_if_keys_are_ignored() {
        let json = r#"{"id":"Q","text":"?","type":"boolean","show_if":{"BMI_MIN":30}}"#;
        let question: FlowQuestion = serde_json::from_str(json).unwrap();
        assert!(question.show_if.unwrap().conditions.is_empty());
    }

    #[test]
    fn test_gender_condition_requires_answer() {
        let condition = Condition::GenderEquals("F".into());

        assert!(!condition.is_satisfied(&Answers::new()));
        assert!(!condition.is_satisfied(&answers(&[(GENDER_KEY, "M".into())])));
        assert!(condition.is_satisfied(&answers(&[(GENDER_KEY, "F".into())])));
    }

    #[test]
    fn test_age_range_passes_when_unanswered() {
        let condition = Condition::AgeRange {
            min: Some(65),
            max: None,
        };

        assert!(condition.is_satisfied(&Answers::new()));
        assert!(condition.is_satisfied(&answers(&[(AGE_KEY, 70i64.into())])));
        assert!(condition.is_satisfied(&answers(&[(AGE_KEY, 65i64.into())])));
        assert!(!condition.is_satisfied(&answers(&[(AGE_KEY, 40i64.into())])));
    }

    #[test]
    fn test_age_range_upper_bound() {
        let condition = Condition::AgeRange {
            min: None,
            max: Some(12),
        };

        assert!(condition.is_satisfied(&answers(&[(AGE_KEY, 12i64.into())])));
        assert!(!condition.is_satisfied(&answers(&[(AGE_KEY, 13i64.into())])));
    }

    #[test]
    fn test_other_meds_condition() {
        let condition = Condition::HasOtherMedsEquals(true);

        assert!(!condition.is_satisfied(&Answers::new()));
        assert!(!condition.is_satisfied(&answers(&[(HAS_OTHER_MEDS_KEY, false.into())])));
        assert!(condition.is_satisfied(&answers(&[(HAS_OTHER_MEDS_KEY, true.into())])));
    }

    #[test]
    fn test_show_if_serializes_to_wire_keys() {
        let question = FlowQuestion::medical("Q_SENIOR", "?", Severity::Orange)
            .with_condition(Condition::AgeRange {
                min: Some(65),
                max: None,
            })
            .with_condition(Condition::HasOtherMedsEquals(true));

        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(
            json["show_if"],
            serde_json::json!({"AGE_MIN": 65, "HAS_OTHER_MEDS": true})
        );
    }

    #[test]
    fn test_answer_value_untagged() {
        let values: Vec<AnswerValue> = serde_json::from_str(r#"[true, 42, "F"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                AnswerValue::Boolean(true),
                AnswerValue::Number(42),
                AnswerValue::Text("F".into())
            ]
        );
    }
}
