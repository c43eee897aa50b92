//! Search suggestion models.

use serde::{Deserialize, Serialize};

use crate::i18n::{translate, Lang};

/// One suggestion returned by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// CIS code for drugs, substance code for substances
    pub id: String,
    /// Whether the hit is a branded drug or a substance
    #[serde(rename = "type")]
    pub kind: ResultKind,
    /// Display name
    pub name: String,
    /// Optional subtitle (e.g., composition)
    pub description: Option<String>,
}

/// Kind of search hit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Drug,
    Substance,
}

/// The substance or drug a questionnaire is about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubstanceRef {
    /// CIS or substance code sent to the flow and evaluate endpoints
    pub id: String,
    /// Display name interpolated into advisory texts
    pub name: String,
}

impl SubstanceRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl From<&SearchResult> for SubstanceRef {
    fn from(result: &SearchResult) -> Self {
        Self::new(result.id.clone(), result.name.clone())
    }
}

impl SearchResult {
    /// Second line of a suggestion: the description, else the localized kind.
    pub fn subtitle(&self, lang: Lang) -> String {
        match self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(description) => description.to_string(),
            None => translate(lang, self.kind.label_key()).to_string(),
        }
    }
}

impl ResultKind {
    /// Translation key for the fallback subtitle.
    pub fn label_key(self) -> &'static str {
        match self {
            ResultKind::Drug => "search.kind.drug",
            ResultKind::Substance => "search.kind.substance",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_results() {
        let json = r#"[
            {"id":"60234100","type":"drug","name":"Doliprane","description":"paracétamol 1000 mg"},
            {"id":"S-1","type":"substance","name":"ibuprofène","description":null}
        ]"#;

        let results: Vec<SearchResult> = serde_json::from_str(json).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].kind, ResultKind::Drug);
        assert_eq!(results[1].kind, ResultKind::Substance);
        assert!(results[1].description.is_none());
    }

    #[test]
    fn test_subtitle_falls_back_to_kind() {
        let hit = SearchResult {
            id: "S-1".into(),
            kind: ResultKind::Substance,
            name: "ibuprofène".into(),
            description: None,
        };
        assert_eq!(hit.subtitle(Lang::Fr), translate(Lang::Fr, "search.kind.substance"));

        let hit = SearchResult {
            description: Some("paracétamol 1000 mg".into()),
            ..hit
        };
        assert_eq!(hit.subtitle(Lang::Es), "paracétamol 1000 mg");
    }

    #[test]
    fn test_missing_description_defaults_to_none() {
        let result: SearchResult =
            serde_json::from_str(r#"{"id":"1","type":"drug","name":"Advil"}"#).unwrap();
        assert!(result.description.is_none());
    }
}
