//! Evaluation payload assembly.

use std::collections::BTreeMap;

use crate::models::{
    AnswerValue, Answers, EvaluationRequest, FlowQuestion, AGE_KEY, GENDER_KEY,
    HAS_OTHER_MEDS_KEY,
};

/// Why the engine stopped asking questions.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitReason {
    /// Every visible question was answered
    Completed,
    /// A red-flag question was answered "yes"
    Interrupted { question: String },
    /// The substance has no question at all
    NoQuestions,
}

/// A request the caller must send to the scoring service.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub request: EvaluationRequest,
    pub reason: SubmitReason,
}

/// Split answers into medical answers and profile fields.
///
/// Only non-profile questions contribute to `answers`, and only when their
/// recorded value is a boolean.
pub fn build_request(cis: &str, questions: &[FlowQuestion], answers: &Answers) -> EvaluationRequest {
    let mut medical = BTreeMap::new();
    for question in questions.iter().filter(|q| !q.is_profile) {
        match answers.get(&question.id) {
            Some(AnswerValue::Boolean(value)) => {
                medical.insert(question.id.clone(), *value);
            }
            Some(other) => {
                tracing::warn!(question = %question.id, value = ?other, "Skipping non-boolean medical answer");
            }
            None => {}
        }
    }

    EvaluationRequest {
        cis: cis.to_string(),
        answers: medical,
        has_other_meds: answers.boolean(HAS_OTHER_MEDS_KEY).unwrap_or(false),
        gender: answers.text(GENDER_KEY).map(str::to_string),
        age: answers.number(AGE_KEY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuestionKind, Severity};

    #[test]
    fn test_partition_profile_and_medical() {
        let questions = vec![
            FlowQuestion::profile(GENDER_KEY, "Sexe ?", QuestionKind::Choice),
            FlowQuestion::profile(AGE_KEY, "Âge ?", QuestionKind::Number),
            FlowQuestion::profile(HAS_OTHER_MEDS_KEY, "Autres ?", QuestionKind::Boolean),
            FlowQuestion::medical("Q_ULCERE", "Ulcère ?", Severity::Red),
            FlowQuestion::medical("Q_ASTHME", "Asthme ?", Severity::Orange),
        ];

        let mut answers = Answers::new();
        answers.insert(GENDER_KEY, "F".into());
        answers.insert(AGE_KEY, 34i64.into());
        answers.insert(HAS_OTHER_MEDS_KEY, true.into());
        answers.insert("Q_ULCERE", false.into());

        let request = build_request("60234100", &questions, &answers);

        assert_eq!(request.cis, "60234100");
        assert_eq!(request.answers.len(), 1);
        assert_eq!(request.answers.get("Q_ULCERE"), Some(&false));
        assert!(request.has_other_meds);
        assert_eq!(request.gender.as_deref(), Some("F"));
        assert_eq!(request.age, Some(34));
    }

    #[test]
    fn test_empty_answers_use_profile_defaults() {
        let request = build_request("X", &[], &Answers::new());

        assert!(request.answers.is_empty());
        assert!(!request.has_other_meds);
        assert!(request.gender.is_none());
        assert!(request.age.is_none());
    }

    #[test]
    fn test_answers_to_unknown_questions_are_dropped() {
        let mut answers = Answers::new();
        answers.insert("Q_FANTOME", true.into());

        let request = build_request("X", &[], &answers);
        assert!(request.answers.is_empty());
    }
}
