//! SafePills Core Library
//!
//! Medication self-assessment: pick a molecule, answer a short branching
//! questionnaire, receive a color-coded verdict.
//!
//! # Architecture
//!
//! ```text
//! Search ──select──▶ Flow fetch ──▶ QuestionnaireEngine ──▶ EvaluationRequest
//!                                        │                        │
//!                                   red flag "yes"          [scoring service]
//!                                        │                        │
//!                                        └────────▶ finish ◀──────┘
//!                                                     │
//!                                                AnalysisResult
//!                                                     │
//!                                          ScoreView (fr / es)
//! ```
//!
//! # Core Principle
//!
//! **Never downgrade risk on failure.** Whenever a verdict cannot be obtained
//! the result is the highest severity, flagged as unavailable.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Drug, FlowQuestion, AnalysisResult, etc.)
//! - [`store`]: Observable selected-drug list
//! - [`questionnaire`]: Unified and legacy questionnaire state machines
//! - [`presentation`]: Localized view models for verdicts and interaction reports
//! - [`i18n`]: French and Spanish string tables
//! - [`wizard`]: Search → questionnaire → score navigation

pub mod i18n;
pub mod models;
pub mod presentation;
pub mod questionnaire;
pub mod store;
pub mod wizard;

// Re-export commonly used types
pub use i18n::{translate, translate_with, Lang};
pub use models::{
    AnalysisResult, AnswerValue, Answers, Drug, EvaluationRequest, EvaluationResponse,
    FlowQuestion, InteractionReport, QuestionKind, ResultOrigin, SearchResult, Severity,
    SubstanceRef,
};
pub use presentation::{InteractionView, ScoreView};
pub use questionnaire::{
    Back, EngineError, EngineResult, EngineState, LegacyQuiz, Progress, QuestionnaireEngine,
    Step,
};
pub use store::{SelectionObserver, SelectionStore, SubscriptionId};
pub use wizard::{Wizard, WizardStep};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use models::Substance;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum SafePillsError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl From<EngineError> for SafePillsError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::InvalidAnswer { .. } => SafePillsError::InvalidInput(e.to_string()),
            other => SafePillsError::InvalidState(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SafePillsError {
    fn from(e: serde_json::Error) -> Self {
        SafePillsError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for SafePillsError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        SafePillsError::LockPoisoned(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Create an empty selection store.
#[uniffi::export]
pub fn new_selection_store() -> Arc<FfiSelectionStore> {
    Arc::new(FfiSelectionStore {
        store: Mutex::new(SelectionStore::new()),
    })
}

/// Create a questionnaire for a molecule. Feed it the flow with
/// [`FfiQuestionnaire::load_flow_json`].
#[uniffi::export]
pub fn new_questionnaire(substance_id: String, substance_name: String) -> Arc<FfiQuestionnaire> {
    Arc::new(FfiQuestionnaire {
        engine: Mutex::new(QuestionnaireEngine::new(SubstanceRef::new(
            substance_id,
            substance_name,
        ))),
    })
}

/// Look up a UI string. Unknown language codes fall back to French.
#[uniffi::export]
pub fn localize(lang_code: String, key: String) -> String {
    translate(Lang::from_code(&lang_code), &key).to_string()
}

#[uniffi::export]
pub fn supported_languages() -> Vec<String> {
    Lang::all().iter().map(|l| l.code().to_string()).collect()
}

/// Render an `/api/analyze` response as plain text.
#[uniffi::export]
pub fn render_interaction_report(
    report_json: String,
    lang_code: String,
) -> Result<String, SafePillsError> {
    let report: InteractionReport = serde_json::from_str(&report_json)?;
    Ok(InteractionView::render(&report, Lang::from_code(&lang_code)).to_string())
}

/// Display label for a search hit, e.g. "Doliprane (paracétamol 1000 mg)".
#[uniffi::export]
pub fn search_result_label(result_json: String, lang_code: String) -> Result<String, SafePillsError> {
    let result: SearchResult = serde_json::from_str(&result_json)?;
    let lang = Lang::from_code(&lang_code);
    Ok(format!("{} ({})", result.name, result.subtitle(lang)))
}

// =========================================================================
// Selection Store
// =========================================================================

/// Receives the full selection after every change.
///
/// Called with the store locked: a listener must not call back into it.
#[uniffi::export(callback_interface)]
pub trait SelectionListener: Send + Sync {
    fn on_change(&self, drugs: Vec<FfiDrug>);
}

struct ListenerBridge(Box<dyn SelectionListener>);

impl SelectionObserver for ListenerBridge {
    fn on_change(&self, drugs: &[Drug]) {
        self.0
            .on_change(drugs.iter().cloned().map(FfiDrug::from).collect());
    }
}

/// Thread-safe selection store wrapper for FFI.
#[derive(uniffi::Object)]
pub struct FfiSelectionStore {
    store: Mutex<SelectionStore>,
}

#[uniffi::export]
impl FfiSelectionStore {
    /// Add a drug. Returns `false` if its CIS was already selected.
    pub fn add(&self, drug: FfiDrug) -> Result<bool, SafePillsError> {
        let mut store = self.store.lock()?;
        Ok(store.add(drug.into()))
    }

    /// Add the drug behind a search hit.
    pub fn add_search_result(&self, result_json: String) -> Result<bool, SafePillsError> {
        let result: SearchResult = serde_json::from_str(&result_json)?;
        let mut store = self.store.lock()?;
        Ok(store.add(Drug::from(&result)))
    }

    pub fn remove(&self, cis: String) -> Result<bool, SafePillsError> {
        let mut store = self.store.lock()?;
        Ok(store.remove(&cis))
    }

    pub fn clear(&self) -> Result<(), SafePillsError> {
        self.store.lock()?.clear();
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<FfiDrug>, SafePillsError> {
        let store = self.store.lock()?;
        Ok(store.read().iter().cloned().map(FfiDrug::from).collect())
    }

    /// CIS codes of the selection, in order.
    pub fn cis_codes(&self) -> Result<Vec<String>, SafePillsError> {
        let store = self.store.lock()?;
        Ok(store.read().iter().map(|d| d.cis.clone()).collect())
    }

    pub fn subscribe(&self, listener: Box<dyn SelectionListener>) -> Result<u64, SafePillsError> {
        let mut store = self.store.lock()?;
        Ok(store.subscribe(ListenerBridge(listener)).value())
    }

    pub fn unsubscribe(&self, subscription: u64) -> Result<bool, SafePillsError> {
        let mut store = self.store.lock()?;
        Ok(store.unsubscribe(SubscriptionId::from(subscription)))
    }
}

// =========================================================================
// Questionnaire
// =========================================================================

/// Thread-safe questionnaire wrapper for FFI.
///
/// The host performs the HTTP calls: it passes the flow JSON in, sends the
/// request JSON from [`FfiStep::Submit`], and reports the response back.
#[derive(uniffi::Object)]
pub struct FfiQuestionnaire {
    engine: Mutex<QuestionnaireEngine>,
}

#[uniffi::export]
impl FfiQuestionnaire {
    pub fn session_id(&self) -> Result<String, SafePillsError> {
        Ok(self.engine.lock()?.session_id().to_string())
    }

    /// Install the `/api/automedication/flow/{id}` response.
    pub fn load_flow_json(&self, flow_json: String) -> Result<FfiStep, SafePillsError> {
        let questions: Vec<FlowQuestion> = serde_json::from_str(&flow_json)?;
        let mut engine = self.engine.lock()?;
        ffi_step(engine.load(questions)?)
    }

    pub fn answer_boolean(&self, value: bool) -> Result<FfiStep, SafePillsError> {
        self.answer(AnswerValue::Boolean(value))
    }

    pub fn answer_number(&self, value: i64) -> Result<FfiStep, SafePillsError> {
        self.answer(AnswerValue::Number(value))
    }

    pub fn answer_choice(&self, value: String) -> Result<FfiStep, SafePillsError> {
        self.answer(AnswerValue::Text(value))
    }

    /// Go back one question. Returns `false` when the host should leave the
    /// questionnaire.
    pub fn back(&self) -> Result<bool, SafePillsError> {
        let mut engine = self.engine.lock()?;
        Ok(matches!(engine.back()?, Back::Previous(_)))
    }

    pub fn current_question(&self) -> Result<Option<FfiQuestion>, SafePillsError> {
        let engine = self.engine.lock()?;
        Ok(engine.current_question().cloned().map(FfiQuestion::from))
    }

    pub fn progress(&self) -> Result<FfiProgress, SafePillsError> {
        Ok(self.engine.lock()?.progress().into())
    }

    pub fn state(&self) -> Result<String, SafePillsError> {
        Ok(self.engine.lock()?.state().name().to_string())
    }

    /// Deliver the `/api/automedication/evaluate` response.
    ///
    /// An unparseable body is treated like a failed call.
    pub fn finish_with_response_json(&self, response_json: String) -> Result<(), SafePillsError> {
        let mut engine = self.engine.lock()?;
        let answers = engine.answers().clone();
        let result = match serde_json::from_str::<EvaluationResponse>(&response_json) {
            Ok(response) => AnalysisResult::from_response(response, answers),
            Err(e) => {
                tracing::warn!(error = %e, "Malformed evaluation response");
                AnalysisResult::unavailable(answers)
            }
        };
        engine.finish(result)?;
        Ok(())
    }

    /// Record that the flow fetch or the evaluation call failed.
    pub fn finish_unavailable(&self) -> Result<(), SafePillsError> {
        let mut engine = self.engine.lock()?;
        let answers = engine.answers().clone();
        engine.finish(AnalysisResult::unavailable(answers))?;
        Ok(())
    }

    /// Score screen for the delivered verdict, if any.
    pub fn score_view(&self, lang_code: String) -> Result<Option<FfiScoreView>, SafePillsError> {
        let engine = self.engine.lock()?;
        let molecule = engine.substance().name.clone();
        Ok(engine.result().map(|result| {
            ScoreView::render(result, Some(&molecule), Lang::from_code(&lang_code)).into()
        }))
    }
}

impl FfiQuestionnaire {
    fn answer(&self, value: AnswerValue) -> Result<FfiStep, SafePillsError> {
        let mut engine = self.engine.lock()?;
        ffi_step(engine.answer(value)?)
    }
}

fn ffi_step(step: Step) -> Result<FfiStep, SafePillsError> {
    Ok(match step {
        Step::Ask(progress) => FfiStep::Ask {
            progress: progress.into(),
        },
        Step::Submit(submission) => FfiStep::Submit {
            request_json: serde_json::to_string(&submission.request)?,
            interrupted_by: match submission.reason {
                questionnaire::SubmitReason::Interrupted { question } => Some(question),
                _ => None,
            },
        },
    })
}

// =========================================================================
// Wizard
// =========================================================================

/// Create a wizard on the search screen.
#[uniffi::export]
pub fn new_wizard() -> Arc<FfiWizard> {
    Arc::new(FfiWizard {
        wizard: Mutex::new(Wizard::new()),
    })
}

/// Thread-safe search → questionnaire → score navigation for FFI.
#[derive(uniffi::Object)]
pub struct FfiWizard {
    wizard: Mutex<Wizard>,
}

#[uniffi::export]
impl FfiWizard {
    pub fn step(&self) -> Result<FfiWizardStep, SafePillsError> {
        Ok(self.wizard.lock()?.step().clone().into())
    }

    /// Pick a molecule and get the questionnaire to drive for it.
    pub fn select_molecule(
        &self,
        substance_id: String,
        substance_name: String,
    ) -> Result<Arc<FfiQuestionnaire>, SafePillsError> {
        let substance = SubstanceRef::new(substance_id, substance_name);
        self.wizard.lock()?.select_molecule(substance.clone());
        Ok(Arc::new(FfiQuestionnaire {
            engine: Mutex::new(QuestionnaireEngine::new(substance)),
        }))
    }

    /// Move to the score screen with the questionnaire's verdict.
    ///
    /// Returns `false` when no questionnaire is running.
    pub fn complete(&self, questionnaire: Arc<FfiQuestionnaire>) -> Result<bool, SafePillsError> {
        let result = questionnaire
            .engine
            .lock()?
            .result()
            .cloned()
            .ok_or_else(|| SafePillsError::InvalidState("questionnaire has no verdict yet".into()))?;
        Ok(self.wizard.lock()?.complete(result))
    }

    pub fn back_to_search(&self) -> Result<(), SafePillsError> {
        self.wizard.lock()?.back_to_search();
        Ok(())
    }

    pub fn reset(&self) -> Result<(), SafePillsError> {
        self.wizard.lock()?.reset();
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe drug.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDrug {
    pub cis: String,
    pub name: String,
    pub substances: Vec<FfiSubstance>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSubstance {
    pub code: String,
    pub name: String,
    pub dose: Option<String>,
}

impl From<Drug> for FfiDrug {
    fn from(drug: Drug) -> Self {
        Self {
            cis: drug.cis,
            name: drug.name,
            substances: drug
                .substances
                .into_iter()
                .map(|s| FfiSubstance {
                    code: s.code,
                    name: s.name,
                    dose: s.dose,
                })
                .collect(),
        }
    }
}

impl From<FfiDrug> for Drug {
    fn from(drug: FfiDrug) -> Self {
        Drug {
            cis: drug.cis,
            name: drug.name,
            substances: drug
                .substances
                .into_iter()
                .map(|s| Substance {
                    code: s.code,
                    name: s.name,
                    dose: s.dose,
                })
                .collect(),
        }
    }
}

/// FFI-safe flow question.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQuestion {
    pub id: String,
    pub text: String,
    /// "choice", "number" or "boolean"
    pub kind: String,
    pub options: Vec<FfiOption>,
    pub risk_level: Option<String>,
    pub is_profile: bool,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiOption {
    pub value: String,
    pub label: String,
}

impl From<FlowQuestion> for FfiQuestion {
    fn from(question: FlowQuestion) -> Self {
        let kind = match question.kind {
            QuestionKind::Choice => "choice",
            QuestionKind::Number => "number",
            QuestionKind::Boolean => "boolean",
        };
        Self {
            id: question.id,
            text: question.text,
            kind: kind.to_string(),
            options: question
                .options
                .unwrap_or_default()
                .into_iter()
                .map(|o| FfiOption {
                    value: o.value,
                    label: o.label,
                })
                .collect(),
            risk_level: question.risk_level.map(|r| r.as_str().to_string()),
            is_profile: question.is_profile,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProgress {
    pub position: u32,
    pub total: u32,
    pub percent: f64,
}

impl From<Progress> for FfiProgress {
    fn from(progress: Progress) -> Self {
        Self {
            position: progress.position as u32,
            total: progress.total as u32,
            percent: progress.percent,
        }
    }
}

/// What the host does next.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiStep {
    /// Display [`FfiQuestionnaire::current_question`]
    Ask { progress: FfiProgress },
    /// POST `request_json` to the evaluate endpoint
    Submit {
        request_json: String,
        /// Text of the red-flag question that ended the session early
        interrupted_by: Option<String>,
    },
}

/// FFI-safe wizard step.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiWizardStep {
    Search,
    Quiz {
        substance_id: String,
        substance_name: String,
    },
    Score {
        substance_id: String,
        substance_name: String,
        /// "green", "yellow", "orange" or "red"
        severity: String,
    },
}

impl From<WizardStep> for FfiWizardStep {
    fn from(step: WizardStep) -> Self {
        match step {
            WizardStep::Search => FfiWizardStep::Search,
            WizardStep::Quiz { substance } => FfiWizardStep::Quiz {
                substance_id: substance.id,
                substance_name: substance.name,
            },
            WizardStep::Score { substance, result } => FfiWizardStep::Score {
                substance_id: substance.id,
                substance_name: substance.name,
                severity: result.severity.as_str().to_string(),
            },
        }
    }
}

/// FFI-safe score view, flattened.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiScoreView {
    /// "green", "yellow", "orange" or "red"
    pub severity: String,
    pub label: String,
    pub text: String,
    pub css_class: String,
    pub unavailable_notice: Option<String>,
    pub coverage_warning: Option<String>,
    pub general_advice_title: Option<String>,
    pub general_advice: Vec<String>,
    pub explanation_title: Option<String>,
    pub explanation: Option<String>,
    pub disclaimer: Option<String>,
    pub reset_label: String,
}

impl From<ScoreView> for FfiScoreView {
    fn from(view: ScoreView) -> Self {
        let (general_advice_title, general_advice) = match view.general_advice {
            Some(block) => (Some(block.title), block.items),
            None => (None, Vec::new()),
        };
        let (explanation_title, explanation, disclaimer) = match view.explanation {
            Some(block) => (Some(block.title), Some(block.body), Some(block.disclaimer)),
            None => (None, None, None),
        };
        Self {
            severity: view.severity.as_str().to_string(),
            label: view.label,
            text: view.text,
            css_class: view.css_class,
            unavailable_notice: view.unavailable_notice,
            coverage_warning: view
                .coverage_warning
                .map(|w| format!("{}{}", w.before, w.bold)),
            general_advice_title,
            general_advice,
            explanation_title,
            explanation,
            disclaimer,
            reset_label: view.reset_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOW: &str = r#"[
        {"id": "GENDER", "text": "Sexe ?", "type": "choice", "is_profile": true,
         "options": [{"value": "M", "label": "Homme"}, {"value": "F", "label": "Femme"}]},
        {"id": "Q_GROSSESSE", "text": "Êtes-vous enceinte ?", "type": "boolean",
         "risk_level": "RED", "is_profile": false, "show_if": {"GENDER": "F"}},
        {"id": "Q_ULCERE", "text": "Ulcère ?", "type": "boolean", "risk_level": "ORANGE", "is_profile": false}
    ]"#;

    #[test]
    fn test_ffi_questionnaire_red_flag() {
        let quiz = new_questionnaire("IBU".into(), "Ibuprofène".into());

        assert!(matches!(quiz.load_flow_json(FLOW.into()).unwrap(), FfiStep::Ask { .. }));
        quiz.answer_choice("F".into()).unwrap();
        assert_eq!(quiz.current_question().unwrap().unwrap().id, "Q_GROSSESSE");

        match quiz.answer_boolean(true).unwrap() {
            FfiStep::Submit {
                request_json,
                interrupted_by,
            } => {
                assert_eq!(interrupted_by.as_deref(), Some("Êtes-vous enceinte ?"));
                let request: EvaluationRequest = serde_json::from_str(&request_json).unwrap();
                assert_eq!(request.gender.as_deref(), Some("F"));
                assert_eq!(request.answers.get("Q_GROSSESSE"), Some(&true));
            }
            other => panic!("unexpected step {:?}", other),
        }

        quiz.finish_unavailable().unwrap();
        let view = quiz.score_view("es".into()).unwrap().unwrap();
        assert_eq!(view.severity, "red");
        assert!(view.unavailable_notice.is_some());
    }

    #[test]
    fn test_ffi_malformed_response_is_red() {
        let quiz = new_questionnaire("X".into(), "X".into());
        quiz.load_flow_json("[]".into()).unwrap();
        quiz.finish_with_response_json("{not json".into()).unwrap();

        let view = quiz.score_view("fr".into()).unwrap().unwrap();
        assert_eq!(view.severity, "red");
    }

    #[test]
    fn test_ffi_invalid_answer_is_input_error() {
        let quiz = new_questionnaire("IBU".into(), "Ibuprofène".into());
        quiz.load_flow_json(FLOW.into()).unwrap();
        let err = quiz.answer_number(3).unwrap_err();
        assert!(matches!(err, SafePillsError::InvalidInput(_)));
    }

    struct Recorder(Mutex<Vec<usize>>);

    impl SelectionListener for Arc<Recorder> {
        fn on_change(&self, drugs: Vec<FfiDrug>) {
            self.0.lock().unwrap().push(drugs.len());
        }
    }

    #[test]
    fn test_ffi_store_notifies_listener() {
        let store = new_selection_store();
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let id = store.subscribe(Box::new(recorder.clone())).unwrap();

        let drug = FfiDrug {
            cis: "60234100".into(),
            name: "Doliprane".into(),
            substances: vec![],
        };
        assert!(store.add(drug.clone()).unwrap());
        assert!(!store.add(drug).unwrap());
        assert!(store.unsubscribe(id).unwrap());
        store.clear().unwrap();

        assert_eq!(*recorder.0.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_ffi_wizard_cycle() {
        let wizard = new_wizard();
        assert!(matches!(wizard.step().unwrap(), FfiWizardStep::Search));

        let quiz = wizard
            .select_molecule("IBU".into(), "Ibuprofène".into())
            .unwrap();
        assert!(matches!(
            wizard.step().unwrap(),
            FfiWizardStep::Quiz { substance_id, .. } if substance_id == "IBU"
        ));

        // No verdict yet
        assert!(matches!(
            wizard.complete(quiz.clone()),
            Err(SafePillsError::InvalidState(_))
        ));

        quiz.load_flow_json(FLOW.into()).unwrap();
        quiz.answer_choice("F".into()).unwrap();
        quiz.answer_boolean(true).unwrap();
        quiz.finish_unavailable().unwrap();

        assert!(wizard.complete(quiz).unwrap());
        match wizard.step().unwrap() {
            FfiWizardStep::Score {
                substance_name,
                severity,
                ..
            } => {
                assert_eq!(substance_name, "Ibuprofène");
                assert_eq!(severity, "red");
            }
            other => panic!("unexpected step {:?}", other),
        }

        wizard.reset().unwrap();
        assert!(matches!(wizard.step().unwrap(), FfiWizardStep::Search));
    }

    #[test]
    fn test_ffi_wizard_back_to_search() {
        let wizard = new_wizard();
        wizard.select_molecule("IBU".into(), "Ibuprofène".into()).unwrap();
        wizard.back_to_search().unwrap();
        assert!(matches!(wizard.step().unwrap(), FfiWizardStep::Search));
    }

    #[test]
    fn test_search_result_label() {
        let json = r#"{"id": "60234100", "type": "drug", "name": "Doliprane", "description": null}"#;
        let label = search_result_label(json.into(), "fr".into()).unwrap();
        assert!(label.starts_with("Doliprane ("));
    }
}
