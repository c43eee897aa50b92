//! Unified questionnaire state machine.
//!
//! ```text
//! Loading ──load──▶ Asking ──answer──▶ Asking
//!    │                 │  ▲
//!    │                 │  └── back (cursor > 0)
//!    │                 ├── red flag "yes" ──▶ Interrupted ──finish──▶ Complete
//!    │                 └── last answer ─────▶ Submitting  ──finish──▶ Complete
//!    └── empty flow ──────────────────────▶ Submitting
//! ```
//!
//! The visible sequence is recomputed from the full question list after every
//! answer: a profile answer can reveal or hide later questions.

use uuid::Uuid;

use super::{build_request, EngineError, EngineResult, SubmitReason, Submission};
use crate::models::{AnalysisResult, AnswerValue, Answers, FlowQuestion, SubstanceRef};

/// Engine state.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineState {
    /// Waiting for the question flow
    Loading,
    /// A visible question awaits an answer
    Asking,
    /// A red-flag answer ended the session; submission in flight
    Interrupted { question: String },
    /// All visible questions answered; submission in flight
    Submitting,
    /// Result delivered
    Complete,
}

impl EngineState {
    pub fn name(&self) -> &'static str {
        match self {
            EngineState::Loading => "loading",
            EngineState::Asking => "asking",
            EngineState::Interrupted { .. } => "interrupted",
            EngineState::Submitting => "submitting",
            EngineState::Complete => "complete",
        }
    }
}

/// Position within the visible sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// 1-based position of the current question
    pub position: usize,
    /// Number of visible questions
    pub total: usize,
    /// Share of visible questions already answered (0.0 - 100.0)
    pub percent: f64,
}

/// Outcome of loading or answering.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Show the current question
    Ask(Progress),
    /// Send the submission and report back with [`QuestionnaireEngine::finish`]
    Submit(Submission),
}

/// Outcome of backward navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum Back {
    /// Moved to the previous visible question
    Previous(Progress),
    /// Already at the first question; the caller leaves the questionnaire
    Exit,
}

/// Question visible under the given answers, in flow order.
pub fn visible_questions<'q>(questions: &'q [FlowQuestion], answers: &Answers) -> Vec<&'q FlowQuestion> {
    questions.iter().filter(|q| q.is_visible(answers)).collect()
}

/// Branching questionnaire for one substance.
#[derive(Debug, Clone)]
pub struct QuestionnaireEngine {
    session_id: String,
    substance: SubstanceRef,
    questions: Vec<FlowQuestion>,
    answers: Answers,
    cursor: usize,
    state: EngineState,
    result: Option<AnalysisResult>,
}

impl QuestionnaireEngine {
    /// Create an engine waiting for its question flow.
    pub fn new(substance: SubstanceRef) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            substance,
            questions: Vec::new(),
            answers: Answers::new(),
            cursor: 0,
            state: EngineState::Loading,
            result: None,
        }
    }

    /// Install the fetched flow.
    ///
    /// An empty flow goes straight to submission with no answers, so the
    /// caller still receives general advice and the coverage flag.
    pub fn load(&mut self, questions: Vec<FlowQuestion>) -> EngineResult<Step> {
        if self.state != EngineState::Loading {
            return Err(EngineError::AlreadyLoaded);
        }

        tracing::debug!(
            session = %self.session_id,
            substance = %self.substance.id,
            count = questions.len(),
            "Questionnaire flow loaded"
        );

        self.questions = questions;
        if self.questions.is_empty() {
            return Ok(self.begin_submission(SubmitReason::NoQuestions));
        }

        self.state = EngineState::Asking;
        if self.visible().is_empty() {
            return Ok(self.begin_submission(SubmitReason::Completed));
        }
        Ok(Step::Ask(self.progress()))
    }

    /// Record an answer to the current question and move on.
    pub fn answer(&mut self, value: AnswerValue) -> EngineResult<Step> {
        let question = self
            .current_question()
            .cloned()
            .ok_or(EngineError::NotAsking(self.state.name()))?;

        if !question.accepts(&value) {
            return Err(EngineError::InvalidAnswer {
                question_id: question.id,
                reason: format!("{:?} does not fit a {:?} question", value, question.kind),
            });
        }

        let affirmative = value.is_affirmative();
        self.answers.insert(question.id.clone(), value);

        if question.is_red_flag() && affirmative {
            tracing::info!(
                session = %self.session_id,
                question = %question.id,
                "Red-flag answer, ending questionnaire early"
            );
            self.state = EngineState::Interrupted {
                question: question.text.clone(),
            };
            return Ok(Step::Submit(self.submission(SubmitReason::Interrupted {
                question: question.text,
            })));
        }

        let next = self.cursor + 1;
        if next >= self.visible().len() {
            return Ok(self.begin_submission(SubmitReason::Completed));
        }

        self.cursor = next;
        Ok(Step::Ask(self.progress()))
    }

    /// Go back one visible question.
    ///
    /// Answers from the new position onward are discarded, so hidden
    /// branches never leak into the submission.
    pub fn back(&mut self) -> EngineResult<Back> {
        if self.state != EngineState::Asking {
            return Err(EngineError::NotAsking(self.state.name()));
        }
        if self.cursor == 0 {
            return Ok(Back::Exit);
        }

        self.cursor -= 1;
        let kept: Vec<String> = self.visible()[..self.cursor]
            .iter()
            .map(|q| q.id.clone())
            .collect();
        self.answers.retain(|id| kept.iter().any(|k| k == id));

        Ok(Back::Previous(self.progress()))
    }

    /// Deliver the outcome of the submission.
    ///
    /// Also accepted while loading, for a flow that could not be fetched.
    pub fn finish(&mut self, result: AnalysisResult) -> EngineResult<()> {
        match self.state {
            EngineState::Loading | EngineState::Submitting | EngineState::Interrupted { .. } => {
                tracing::info!(
                    session = %self.session_id,
                    substance = %self.substance.id,
                    severity = result.severity.as_str(),
                    "Questionnaire complete"
                );
                self.state = EngineState::Complete;
                self.result = Some(result);
                Ok(())
            }
            _ => Err(EngineError::NotSubmitting(self.state.name())),
        }
    }

    /// The question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&FlowQuestion> {
        if self.state != EngineState::Asking {
            return None;
        }
        self.visible().get(self.cursor).copied()
    }

    /// Position of the current question.
    pub fn progress(&self) -> Progress {
        let total = self.visible().len();
        let percent = if total > 0 {
            self.cursor as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        Progress {
            position: self.cursor + 1,
            total,
            percent,
        }
    }

    /// Questions visible under the current answers.
    pub fn visible(&self) -> Vec<&FlowQuestion> {
        visible_questions(&self.questions, &self.answers)
    }

    /// Text of the red-flag question that ended the session.
    pub fn interrupted_by(&self) -> Option<&str> {
        match &self.state {
            EngineState::Interrupted { question } => Some(question),
            _ => None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn substance(&self) -> &SubstanceRef {
        &self.substance
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn questions(&self) -> &[FlowQuestion] {
        &self.questions
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.state == EngineState::Complete
    }

    fn begin_submission(&mut self, reason: SubmitReason) -> Step {
        self.state = EngineState::Submitting;
        Step::Submit(self.submission(reason))
    }

    fn submission(&self, reason: SubmitReason) -> Submission {
        Submission {
            request: build_request(&self.substance.id, &self.questions, &self.answers),
            reason,
        }
    }
}
