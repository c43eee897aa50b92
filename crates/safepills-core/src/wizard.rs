//! Three-step assessment flow: search → questionnaire → score.

use crate::models::{AnalysisResult, SubstanceRef};

#[derive(Debug, Clone, PartialEq)]
pub enum WizardStep {
    /// Picking a molecule
    Search,
    /// Questionnaire running for the chosen molecule
    Quiz { substance: SubstanceRef },
    /// Verdict displayed
    Score {
        substance: SubstanceRef,
        result: AnalysisResult,
    },
}

/// Screen-level navigation for the self-assessment flow.
#[derive(Debug, Clone)]
pub struct Wizard {
    step: WizardStep,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Search,
        }
    }

    pub fn step(&self) -> &WizardStep {
        &self.step
    }

    /// Start a questionnaire. Replaces whatever step is current.
    pub fn select_molecule(&mut self, substance: SubstanceRef) {
        tracing::debug!(substance = %substance.id, "Molecule selected");
        self.step = WizardStep::Quiz { substance };
    }

    /// Move to the score screen.
    ///
    /// Ignored (returns `false`) unless a questionnaire is running.
    pub fn complete(&mut self, result: AnalysisResult) -> bool {
        match std::mem::replace(&mut self.step, WizardStep::Search) {
            WizardStep::Quiz { substance } => {
                self.step = WizardStep::Score { substance, result };
                true
            }
            other => {
                tracing::warn!("Result received outside of a questionnaire, ignoring");
                self.step = other;
                false
            }
        }
    }

    /// Leave the questionnaire (back at its first question).
    pub fn back_to_search(&mut self) {
        self.step = WizardStep::Search;
    }

    /// "Start another assessment".
    pub fn reset(&mut self) {
        self.step = WizardStep::Search;
    }

    pub fn substance(&self) -> Option<&SubstanceRef> {
        match &self.step {
            WizardStep::Search => None,
            WizardStep::Quiz { substance } | WizardStep::Score { substance, .. } => Some(substance),
        }
    }
}
