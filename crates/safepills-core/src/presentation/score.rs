//! Score screen view model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::i18n::{translate, translate_with, Lang};
use crate::models::{AnalysisResult, ResultOrigin, Severity};

/// Everything the score screen displays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreView {
    pub severity: Severity,
    pub label: String,
    pub text: String,
    /// Presentation class (e.g., "score-red")
    pub css_class: String,
    /// Shown when the verdict is the fail-safe default
    pub unavailable_notice: Option<String>,
    /// Shown when the substance has no associated question
    pub coverage_warning: Option<CoverageWarning>,
    pub general_advice: Option<AdviceBlock>,
    pub explanation: Option<ExplanationBlock>,
    pub reset_label: String,
}

/// Coverage warning, with its emphasized second half.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageWarning {
    pub before: String,
    pub bold: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdviceBlock {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplanationBlock {
    pub title: String,
    pub body: String,
    pub disclaimer: String,
}

/// Translation keys for a severity: (label, advisory text).
fn severity_keys(severity: Severity) -> (&'static str, &'static str) {
    match severity {
        Severity::Green => ("score.risk.low", "score.risk.low.text"),
        Severity::Yellow => ("score.risk.yellow", "score.risk.yellow.text"),
        Severity::Orange => ("score.risk.medium", "score.risk.medium.text"),
        Severity::Red => ("score.risk.high", "score.risk.high.text"),
    }
}

impl ScoreView {
    /// Build the view for a verdict about `molecule`.
    pub fn render(result: &AnalysisResult, molecule: Option<&str>, lang: Lang) -> Self {
        let (label_key, text_key) = severity_keys(result.severity);
        let molecule = molecule.unwrap_or("");

        let unavailable_notice = (result.origin == ResultOrigin::Unavailable)
            .then(|| translate(lang, "score.unavailable").to_string());

        let coverage_warning = (!result.has_coverage).then(|| CoverageWarning {
            before: translate(lang, "score.no_coverage.before").to_string(),
            bold: translate(lang, "score.no_coverage.bold").to_string(),
        });

        let general_advice = (!result.general_advice.is_empty()).then(|| AdviceBlock {
            title: translate(lang, "score.general_advice").to_string(),
            items: result.general_advice.clone(),
        });

        let explanation = result
            .explanation
            .as_deref()
            .filter(|body| !body.trim().is_empty())
            .map(|body| ExplanationBlock {
                title: translate(lang, "score.ai_explanation.title").to_string(),
                body: body.to_string(),
                disclaimer: translate(lang, "score.ai_explanation.disclaimer").to_string(),
            });

        Self {
            severity: result.severity,
            label: translate(lang, label_key).to_string(),
            text: translate_with(lang, text_key, &[("molecule", molecule)]),
            css_class: format!("score-{}", result.severity.as_str()),
            unavailable_notice,
            coverage_warning,
            general_advice,
            explanation,
            reset_label: translate(lang, "score.reset").to_string(),
        }
    }
}

impl fmt::Display for ScoreView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.label)?;
        writeln!(f, "{}", self.text)?;
        if let Some(notice) = &self.unavailable_notice {
            writeln!(f, "\n{}", notice)?;
        }
        if let Some(warning) = &self.coverage_warning {
            writeln!(f, "\n{}{}", warning.before, warning.bold)?;
        }
        if let Some(advice) = &self.general_advice {
            writeln!(f, "\n{}", advice.title)?;
            for item in &advice.items {
                writeln!(f, "  - {}", item)?;
            }
        }
        if let Some(explanation) = &self.explanation {
            writeln!(f, "\n{}", explanation.title)?;
            writeln!(f, "{}", explanation.body)?;
            writeln!(f, "({})", explanation.disclaimer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Answers, EvaluationResponse};

    fn result(severity: Severity) -> AnalysisResult {
        AnalysisResult::from_response(
            EvaluationResponse {
                score: severity,
                details: vec![],
                ai_explanation: None,
                general_advice: None,
                has_coverage: Some(true),
            },
            Answers::new(),
        )
    }

    #[test]
    fn test_green_label() {
        let view = ScoreView::render(&result(Severity::Green), Some("Paracétamol"), Lang::Fr);
        assert_eq!(view.label, "FAIBLE RISQUE");
        assert_eq!(view.css_class, "score-green");
        assert!(view.text.contains("Paracétamol"));
        assert!(view.unavailable_notice.is_none());
    }

    #[test]
    fn test_red_label() {
        let view = ScoreView::render(&result(Severity::Red), Some("Paracétamol"), Lang::Fr);
        assert_eq!(view.label, "CONTRE-INDIQUÉ");
        assert_eq!(view.css_class, "score-red");
    }

    #[test]
    fn test_every_severity_has_distinct_label() {
        let labels: Vec<String> = [Severity::Green, Severity::Yellow, Severity::Orange, Severity::Red]
            .into_iter()
            .map(|s| ScoreView::render(&result(s), None, Lang::Fr).label)
            .collect();
        let mut deduped = labels.clone();
        deduped.dedup();
        assert_eq!(labels, deduped);
    }

    #[test]
    fn test_general_advice_block() {
        let mut verdict = result(Severity::Green);
        verdict.general_advice = vec!["Respectez la posologie".into(), "Ne pas dépasser 3g/jour".into()];

        let view = ScoreView::render(&verdict, Some("Paracétamol"), Lang::Fr);
        let advice = view.general_advice.unwrap();
        assert_eq!(advice.items, vec!["Respectez la posologie", "Ne pas dépasser 3g/jour"]);
    }

    #[test]
    fn test_coverage_warning_only_without_coverage() {
        let mut verdict = result(Severity::Green);
        let view = ScoreView::render(&verdict, None, Lang::Fr);
        assert!(view.coverage_warning.is_none());

        verdict.has_coverage = false;
        let view = ScoreView::render(&verdict, None, Lang::Fr);
        assert!(view.coverage_warning.unwrap().before.contains("Notre base ne couvre pas"));
    }

    #[test]
    fn test_explanation_with_disclaimer() {
        let mut verdict = result(Severity::Orange);
        verdict.explanation = Some("Vous avez indiqué avoir des problèmes hépatiques...".into());

        let view = ScoreView::render(&verdict, None, Lang::Fr);
        let explanation = view.explanation.unwrap();
        assert!(explanation.body.contains("problèmes hépatiques"));
        assert!(explanation.disclaimer.contains("Intelligence Artificielle"));
    }

    #[test]
    fn test_no_explanation_block_when_absent_or_blank() {
        let mut verdict = result(Severity::Orange);
        assert!(ScoreView::render(&verdict, None, Lang::Fr).explanation.is_none());

        verdict.explanation = Some("   ".into());
        assert!(ScoreView::render(&verdict, None, Lang::Fr).explanation.is_none());
    }

    #[test]
    fn test_spanish_labels() {
        let view = ScoreView::render(&result(Severity::Red), None, Lang::Es);
        assert_eq!(view.label, "CONTRAINDICADO");
        assert_eq!(view.reset_label, "Hacer otra evaluación");
    }

    #[test]
    fn test_unavailable_notice() {
        let view = ScoreView::render(&AnalysisResult::unavailable(Answers::new()), None, Lang::Fr);
        assert_eq!(view.severity, Severity::Red);
        assert!(view.unavailable_notice.is_some());
        assert!(view.general_advice.is_none());
    }

    #[test]
    fn test_plain_text_rendering() {
        let mut verdict = result(Severity::Green);
        verdict.general_advice = vec!["Buvez de l'eau".into()];

        let text = ScoreView::render(&verdict, Some("Paracétamol"), Lang::Fr).to_string();
        assert!(text.starts_with("[FAIBLE RISQUE]"));
        assert!(text.contains("  - Buvez de l'eau"));
    }
}
