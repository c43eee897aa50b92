//! Interaction report view model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::i18n::{translate, Lang};
use crate::models::{InteractionReport, Severity};

/// Everything the interaction screen displays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionView {
    pub title: String,
    pub severity: Option<Severity>,
    pub severity_label: Option<String>,
    /// Presentation class (e.g., "severity-orange", or "severity-none")
    pub css_class: String,
    pub summary: String,
    pub conduct: Option<TitledText>,
    pub details_title: String,
    pub details: Vec<InteractionLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TitledText {
    pub title: String,
    pub text: String,
}

/// One interacting pair, localized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionLine {
    /// "molecule_a + molecule_b"
    pub pair: String,
    pub severity: Severity,
    pub severity_label: String,
    pub risk: String,
    pub management: Option<TitledText>,
}

fn severity_label(lang: Lang, severity: Severity) -> &'static str {
    match severity {
        Severity::Red => translate(lang, "analysis.severity.red"),
        Severity::Orange => translate(lang, "analysis.severity.orange"),
        Severity::Yellow => translate(lang, "analysis.severity.yellow"),
        Severity::Green => translate(lang, "analysis.severity.green"),
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

impl InteractionView {
    pub fn render(report: &InteractionReport, lang: Lang) -> Self {
        let severity = report.severity();

        let summary = match non_blank(report.explanation.as_deref()) {
            Some(explanation) => explanation.to_string(),
            None if !report.interaction_detected => translate(lang, "analysis.none").to_string(),
            None => String::new(),
        };

        let conduct = non_blank(report.conduct_to_follow.as_deref()).map(|text| TitledText {
            title: translate(lang, "analysis.conduct").to_string(),
            text: text.to_string(),
        });

        let details = report
            .technical_details
            .iter()
            .map(|detail| {
                let severity = detail.severity();
                InteractionLine {
                    pair: format!("{} + {}", detail.molecule_a, detail.molecule_b),
                    severity,
                    severity_label: severity_label(lang, severity).to_string(),
                    risk: detail.risk.clone(),
                    management: non_blank(detail.management.as_deref()).map(|text| TitledText {
                        title: translate(lang, "analysis.management").to_string(),
                        text: text.to_string(),
                    }),
                }
            })
            .collect();

        Self {
            title: translate(lang, "analysis.title").to_string(),
            severity,
            severity_label: severity.map(|s| severity_label(lang, s).to_string()),
            css_class: format!(
                "severity-{}",
                severity.map(Severity::as_str).unwrap_or("none")
            ),
            summary,
            conduct,
            details_title: translate(lang, "analysis.details").to_string(),
            details,
        }
    }
}

impl fmt::Display for InteractionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(label) = &self.severity_label {
            writeln!(f, "[{}]", label)?;
        }
        if !self.summary.is_empty() {
            writeln!(f, "{}", self.summary)?;
        }
        if let Some(conduct) = &self.conduct {
            writeln!(f, "\n{}: {}", conduct.title, conduct.text)?;
        }
        if !self.details.is_empty() {
            writeln!(f, "\n{}", self.details_title)?;
            for line in &self.details {
                writeln!(f, "  - {} [{}]: {}", line.pair, line.severity_label, line.risk)?;
                if let Some(management) = &line.management {
                    writeln!(f, "    {}: {}", management.title, management.text)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InteractionDetail;

    fn report() -> InteractionReport {
        InteractionReport {
            interaction_detected: true,
            global_severity: Some("Rouge".into()),
            explanation: Some("Association contre-indiquée".into()),
            conduct_to_follow: Some("Ne pas associer".into()),
            technical_details: vec![InteractionDetail {
                molecule_a: "ibuprofène".into(),
                molecule_b: "méthotrexate".into(),
                level_risk: "Rouge".into(),
                risk: "Toxicité hématologique".into(),
                management: None,
            }],
        }
    }

    #[test]
    fn test_render_red_report() {
        let view = InteractionView::render(&report(), Lang::Fr);

        assert_eq!(view.severity, Some(Severity::Red));
        assert_eq!(view.severity_label.as_deref(), Some("Contre-indication"));
        assert_eq!(view.css_class, "severity-red");
        assert_eq!(view.details[0].pair, "ibuprofène + méthotrexate");
        assert!(view.details[0].management.is_none());
        assert_eq!(view.conduct.unwrap().text, "Ne pas associer");
    }

    #[test]
    fn test_render_no_interaction() {
        let report = InteractionReport {
            interaction_detected: false,
            global_severity: None,
            explanation: Some(String::new()),
            conduct_to_follow: Some(String::new()),
            technical_details: vec![],
        };

        let view = InteractionView::render(&report, Lang::Es);
        assert_eq!(view.severity, None);
        assert_eq!(view.css_class, "severity-none");
        assert_eq!(
            view.summary,
            "No se ha detectado ninguna interacción entre sus medicamentos."
        );
        assert!(view.conduct.is_none());
    }

    #[test]
    fn test_plain_text_lists_pairs() {
        let text = InteractionView::render(&report(), Lang::Fr).to_string();
        assert!(text.contains("ibuprofène + méthotrexate [Contre-indication]"));
    }
}
