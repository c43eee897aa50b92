//! Interaction analysis of the selected drugs.

use std::sync::Arc;

use safepills_core::{translate, Drug, InteractionReport, InteractionView, Lang};

use crate::api::InteractionBackend;

/// Outcome of an "analyze" click.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// Empty selection; no request was sent
    NothingSelected,
    Report(InteractionReport),
    /// The service could not be reached or answered with an error
    Unavailable,
}

impl AnalysisOutcome {
    pub fn render(&self, lang: Lang) -> String {
        match self {
            AnalysisOutcome::NothingSelected => translate(lang, "analysis.empty").to_string(),
            AnalysisOutcome::Report(report) => InteractionView::render(report, lang).to_string(),
            AnalysisOutcome::Unavailable => translate(lang, "analysis.unavailable").to_string(),
        }
    }
}

pub struct InteractionAnalyzer<B: InteractionBackend> {
    backend: Arc<B>,
}

impl<B: InteractionBackend> InteractionAnalyzer<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Send the selection to the interaction service.
    pub async fn analyze(&self, drugs: &[Drug]) -> AnalysisOutcome {
        if drugs.is_empty() {
            return AnalysisOutcome::NothingSelected;
        }

        tracing::info!(count = drugs.len(), "Analyzing selection");
        match self.backend.analyze(drugs).await {
            Ok(report) => {
                tracing::info!(
                    detected = report.interaction_detected,
                    severity = ?report.global_severity,
                    "Interaction analysis complete"
                );
                AnalysisOutcome::Report(report)
            }
            Err(e) => {
                tracing::warn!(count = drugs.len(), error = %e, "Interaction analysis failed");
                AnalysisOutcome::Unavailable
            }
        }
    }
}
