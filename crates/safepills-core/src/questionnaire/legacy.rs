//! Legacy linear quiz.
//!
//! Predecessor of the unified engine: the backend filters questions by
//! profile, the client walks the list in order with yes/no answers only.
//! There is no branching and no early exit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Back, EngineError, EngineResult, Progress};
use crate::models::{AnalysisResult, Severity, SubstanceRef};

/// A question from `GET /api/automedication/questions/<id>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegacyQuestion {
    pub id: String,
    pub text: String,
    #[serde(default, deserialize_with = "crate::models::deserialize_risk_tag")]
    pub risk_level: Option<Severity>,
}

/// Optional profile filters sent as query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LegacyProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_other_meds: Option<bool>,
}

/// Body of the legacy evaluate call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegacyEvaluationRequest {
    pub cis: String,
    pub answers: BTreeMap<String, bool>,
}

/// Legacy quiz state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyState {
    Loading,
    /// Nothing to ask; waiting for the user to acknowledge
    NoQuestions,
    Asking,
    Submitting,
    Complete,
}

impl LegacyState {
    fn name(self) -> &'static str {
        match self {
            LegacyState::Loading => "loading",
            LegacyState::NoQuestions => "no_questions",
            LegacyState::Asking => "asking",
            LegacyState::Submitting => "submitting",
            LegacyState::Complete => "complete",
        }
    }
}

/// Outcome of loading or answering.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyStep {
    Ask(Progress),
    /// Show the "no specific questions" screen
    NoQuestions,
    Submit(LegacyEvaluationRequest),
}

/// Linear yes/no quiz.
#[derive(Debug, Clone)]
pub struct LegacyQuiz {
    substance: SubstanceRef,
    questions: Vec<LegacyQuestion>,
    answers: BTreeMap<String, bool>,
    index: usize,
    state: LegacyState,
    result: Option<AnalysisResult>,
}

impl LegacyQuiz {
    pub fn new(substance: SubstanceRef) -> Self {
        Self {
            substance,
            questions: Vec::new(),
            answers: BTreeMap::new(),
            index: 0,
            state: LegacyState::Loading,
            result: None,
        }
    }

    pub fn load(&mut self, questions: Vec<LegacyQuestion>) -> EngineResult<LegacyStep> {
        if self.state != LegacyState::Loading {
            return Err(EngineError::AlreadyLoaded);
        }
        self.questions = questions;
        if self.questions.is_empty() {
            self.state = LegacyState::NoQuestions;
            return Ok(LegacyStep::NoQuestions);
        }
        self.state = LegacyState::Asking;
        Ok(LegacyStep::Ask(self.progress()))
    }

    /// Accept the "no specific questions" screen, which yields green.
    pub fn acknowledge(&mut self) -> EngineResult<()> {
        if self.state != LegacyState::NoQuestions {
            return Err(EngineError::NotAsking(self.state.name()));
        }
        self.state = LegacyState::Complete;
        self.result = Some(AnalysisResult::acknowledged(Severity::Green));
        Ok(())
    }

    pub fn answer(&mut self, value: bool) -> EngineResult<LegacyStep> {
        let question_id = self
            .current_question()
            .map(|q| q.id.clone())
            .ok_or(EngineError::NotAsking(self.state.name()))?;
        self.answers.insert(question_id, value);

        if self.index + 1 < self.questions.len() {
            self.index += 1;
            return Ok(LegacyStep::Ask(self.progress()));
        }

        self.state = LegacyState::Submitting;
        Ok(LegacyStep::Submit(LegacyEvaluationRequest {
            cis: self.substance.id.clone(),
            answers: self.answers.clone(),
        }))
    }

    /// Back always leaves the quiz.
    pub fn back(&self) -> Back {
        Back::Exit
    }

    pub fn finish(&mut self, result: AnalysisResult) -> EngineResult<()> {
        if !matches!(self.state, LegacyState::Submitting | LegacyState::Loading) {
            return Err(EngineError::NotSubmitting(self.state.name()));
        }
        self.state = LegacyState::Complete;
        self.result = Some(result);
        Ok(())
    }

    pub fn current_question(&self) -> Option<&LegacyQuestion> {
        if self.state != LegacyState::Asking {
            return None;
        }
        self.questions.get(self.index)
    }

    pub fn progress(&self) -> Progress {
        let total = self.questions.len();
        let percent = if total > 0 {
            self.index as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Progress {
            position: self.index + 1,
            total,
            percent,
        }
    }

    pub fn substance(&self) -> &SubstanceRef {
        &self.substance
    }

    pub fn state(&self) -> LegacyState {
        self.state
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }
}
