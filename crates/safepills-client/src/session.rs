//! Questionnaire sessions: engine plus backend.
//!
//! Network failures never escape a session. A flow that cannot be fetched or
//! an evaluation that fails ends the session with the fail-safe verdict
//! (red, flagged unavailable). Only engine misuse is returned as an error.

use std::sync::Arc;

use safepills_core::questionnaire::{
    LegacyEvaluationRequest, LegacyProfile, LegacyQuestion, LegacyQuiz, LegacyState, LegacyStep,
    SubmitReason, Submission,
};
use safepills_core::{
    AnalysisResult, AnswerValue, Answers, Back, EngineResult, FlowQuestion, Lang, Progress,
    QuestionnaireEngine, Step, SubstanceRef,
};

use crate::api::AutomedicationBackend;

/// What the UI shows next.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Display the current question
    Ask(Progress),
    /// Display the verdict
    Complete(AnalysisResult),
}

/// Unified questionnaire bound to a backend.
pub struct QuestionnaireSession<B: AutomedicationBackend> {
    backend: Arc<B>,
    lang: Lang,
    engine: QuestionnaireEngine,
    interrupted_by: Option<String>,
}

impl<B: AutomedicationBackend> QuestionnaireSession<B> {
    pub fn new(backend: Arc<B>, substance: SubstanceRef, lang: Lang) -> Self {
        Self {
            backend,
            lang,
            engine: QuestionnaireEngine::new(substance),
            interrupted_by: None,
        }
    }

    /// Fetch the flow and show the first question (or submit straight away).
    pub async fn start(&mut self) -> EngineResult<SessionEvent> {
        let substance_id = self.engine.substance().id.clone();
        tracing::info!(
            session = %self.engine.session_id(),
            substance = %substance_id,
            lang = self.lang.code(),
            "Starting questionnaire"
        );

        match self.backend.flow(&substance_id, self.lang).await {
            Ok(questions) => {
                let step = self.engine.load(questions)?;
                self.drive(step).await
            }
            Err(e) => {
                tracing::warn!(substance = %substance_id, error = %e, "Could not load questionnaire");
                let result = AnalysisResult::unavailable(Answers::new());
                self.engine.finish(result.clone())?;
                Ok(SessionEvent::Complete(result))
            }
        }
    }

    pub async fn answer(&mut self, value: AnswerValue) -> EngineResult<SessionEvent> {
        let step = self.engine.answer(value)?;
        self.drive(step).await
    }

    /// `Back::Exit` means the caller returns to the molecule search.
    pub fn back(&mut self) -> EngineResult<Back> {
        self.engine.back()
    }

    pub fn current_question(&self) -> Option<&FlowQuestion> {
        self.engine.current_question()
    }

    pub fn progress(&self) -> Progress {
        self.engine.progress()
    }

    pub fn substance(&self) -> &SubstanceRef {
        self.engine.substance()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.engine.result()
    }

    /// Text of the red-flag question that ended the session early.
    pub fn interrupted_by(&self) -> Option<&str> {
        self.interrupted_by.as_deref()
    }

    pub fn engine(&self) -> &QuestionnaireEngine {
        &self.engine
    }

    async fn drive(&mut self, step: Step) -> EngineResult<SessionEvent> {
        match step {
            Step::Ask(progress) => Ok(SessionEvent::Ask(progress)),
            Step::Submit(submission) => {
                if let SubmitReason::Interrupted { question } = &submission.reason {
                    self.interrupted_by = Some(question.clone());
                }
                let result = self.submit(submission).await;
                self.engine.finish(result.clone())?;
                Ok(SessionEvent::Complete(result))
            }
        }
    }

    async fn submit(&self, submission: Submission) -> AnalysisResult {
        let answers = self.engine.answers().clone();
        tracing::debug!(
            session = %self.engine.session_id(),
            reason = ?submission.reason,
            answered = submission.request.answers.len(),
            "Submitting answers"
        );

        match self.backend.evaluate(&submission.request, self.lang).await {
            Ok(response) => AnalysisResult::from_response(response, answers),
            Err(e) => {
                tracing::error!(
                    session = %self.engine.session_id(),
                    substance = %submission.request.cis,
                    error = %e,
                    "Evaluation failed, reporting highest severity"
                );
                AnalysisResult::unavailable(answers)
            }
        }
    }
}

/// What the legacy quiz shows next.
#[derive(Debug, Clone, PartialEq)]
pub enum LegacyEvent {
    Ask(Progress),
    /// "No specific questions" screen; call [`LegacyQuizSession::acknowledge`]
    NoQuestions,
    Complete(AnalysisResult),
}

/// Legacy linear quiz bound to a backend.
pub struct LegacyQuizSession<B: AutomedicationBackend> {
    backend: Arc<B>,
    profile: LegacyProfile,
    quiz: LegacyQuiz,
}

impl<B: AutomedicationBackend> LegacyQuizSession<B> {
    pub fn new(backend: Arc<B>, substance: SubstanceRef, profile: LegacyProfile) -> Self {
        Self {
            backend,
            profile,
            quiz: LegacyQuiz::new(substance),
        }
    }

    pub async fn start(&mut self) -> EngineResult<LegacyEvent> {
        let substance_id = self.quiz.substance().id.clone();
        match self
            .backend
            .legacy_questions(&substance_id, &self.profile)
            .await
        {
            Ok(questions) => match self.quiz.load(questions)? {
                LegacyStep::Ask(progress) => Ok(LegacyEvent::Ask(progress)),
                LegacyStep::NoQuestions => Ok(LegacyEvent::NoQuestions),
                LegacyStep::Submit(request) => self.submit(request).await,
            },
            Err(e) => {
                tracing::warn!(substance = %substance_id, error = %e, "Could not load legacy quiz");
                let result = AnalysisResult::unavailable(Answers::new());
                self.quiz.finish(result.clone())?;
                Ok(LegacyEvent::Complete(result))
            }
        }
    }

    pub async fn answer(&mut self, value: bool) -> EngineResult<LegacyEvent> {
        match self.quiz.answer(value)? {
            LegacyStep::Ask(progress) => Ok(LegacyEvent::Ask(progress)),
            LegacyStep::NoQuestions => Ok(LegacyEvent::NoQuestions),
            LegacyStep::Submit(request) => self.submit(request).await,
        }
    }

    /// Accept the no-question screen: green, no request.
    pub fn acknowledge(&mut self) -> EngineResult<AnalysisResult> {
        self.quiz.acknowledge()?;
        Ok(self
            .quiz
            .result()
            .cloned()
            .unwrap_or_else(|| AnalysisResult::unavailable(Answers::new())))
    }

    /// Always leaves the quiz.
    pub fn back(&self) -> Back {
        self.quiz.back()
    }

    pub fn current_question(&self) -> Option<&LegacyQuestion> {
        self.quiz.current_question()
    }

    pub fn progress(&self) -> Progress {
        self.quiz.progress()
    }

    pub fn state(&self) -> LegacyState {
        self.quiz.state()
    }

    pub fn substance(&self) -> &SubstanceRef {
        self.quiz.substance()
    }

    async fn submit(&mut self, request: LegacyEvaluationRequest) -> EngineResult<LegacyEvent> {
        let answers = legacy_answers(&request);
        let result = match self.backend.evaluate_legacy(&request).await {
            Ok(response) => AnalysisResult::from_response(response, answers),
            Err(e) => {
                tracing::error!(substance = %request.cis, error = %e, "Legacy evaluation failed");
                AnalysisResult::unavailable(answers)
            }
        };
        self.quiz.finish(result.clone())?;
        Ok(LegacyEvent::Complete(result))
    }
}

fn legacy_answers(request: &LegacyEvaluationRequest) -> Answers {
    let mut answers = Answers::new();
    for (id, value) in &request.answers {
        answers.insert(id.clone(), AnswerValue::Boolean(*value));
    }
    answers
}
