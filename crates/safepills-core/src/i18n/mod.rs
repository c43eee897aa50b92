//! Localized UI strings.
//!
//! French is the default language; every lookup falls back to it.

mod es;
mod fr;

use serde::{Deserialize, Serialize};

/// Supported UI languages.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Fr,
    Es,
}

impl Lang {
    /// Parse a language code; unknown codes fall back to French.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "es" => Lang::Es,
            _ => Lang::Fr,
        }
    }

    /// Code sent as the `lang` query parameter.
    pub fn code(self) -> &'static str {
        match self {
            Lang::Fr => "fr",
            Lang::Es => "es",
        }
    }

    pub fn all() -> &'static [Lang] {
        &[Lang::Fr, Lang::Es]
    }

    fn table(self) -> &'static Table {
        match self {
            Lang::Fr => fr::TABLE,
            Lang::Es => es::TABLE,
        }
    }
}

/// Look up a key in `lang`, then in French, then return the key itself.
pub fn translate<'a>(lang: Lang, key: &'a str) -> &'a str {
    resolve(lang.table(), Lang::default().table(), key)
}

/// Translate and replace `{name}` placeholders.
pub fn translate_with(lang: Lang, key: &str, params: &[(&str, &str)]) -> String {
    let mut text = translate(lang, key).to_string();
    for (name, value) in params {
        text = text.replace(&format!("{{{}}}", name), value);
    }
    text
}

/// All keys defined for a language.
pub fn keys(lang: Lang) -> impl Iterator<Item = &'static str> {
    lang.table().iter().map(|(key, _)| *key)
}

type Table = [(&'static str, &'static str)];

fn resolve<'a>(table: &'static Table, fallback: &'static Table, key: &'a str) -> &'a str {
    lookup(table, key)
        .or_else(|| lookup(fallback, key))
        .unwrap_or(key)
}

fn lookup(table: &'static Table, key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_translate_fr() {
        assert_eq!(translate(Lang::Fr, "nav.home"), "Accueil");
    }

    #[test]
    fn test_translate_es() {
        assert_eq!(translate(Lang::Es, "nav.home"), "Inicio");
    }

    #[test]
    fn test_unknown_code_defaults_to_fr() {
        assert_eq!(Lang::from_code("de"), Lang::Fr);
        assert_eq!(Lang::from_code("ES"), Lang::Es);
        assert_eq!(Lang::from_code(""), Lang::Fr);
    }

    #[test]
    fn test_missing_key_returns_key() {
        assert_eq!(translate(Lang::Es, "does.not.exist"), "does.not.exist");
    }

    #[test]
    fn test_key_missing_in_language_falls_back_to_fr() {
        const PARTIAL_ES: &Table = &[("nav.home", "Inicio")];

        assert_eq!(resolve(PARTIAL_ES, fr::TABLE, "nav.home"), "Inicio");
        assert_eq!(
            resolve(PARTIAL_ES, fr::TABLE, "quiz.yes"),
            translate(Lang::Fr, "quiz.yes")
        );
        assert_eq!(resolve(PARTIAL_ES, fr::TABLE, "does.not.exist"), "does.not.exist");
    }

    #[test]
    fn test_every_fr_key_exists_in_es() {
        let es: HashSet<&str> = keys(Lang::Es).collect();
        let missing: Vec<&str> = keys(Lang::Fr).filter(|k| !es.contains(k)).collect();
        assert!(missing.is_empty(), "missing in es: {:?}", missing);
    }

    #[test]
    fn test_tables_have_same_size_and_no_duplicates() {
        for lang in Lang::all() {
            let unique: HashSet<&str> = keys(*lang).collect();
            assert_eq!(unique.len(), keys(*lang).count(), "duplicate key in {:?}", lang);
        }
        assert_eq!(keys(Lang::Fr).count(), keys(Lang::Es).count());
    }

    #[test]
    fn test_translate_with_placeholder() {
        let text = translate_with(Lang::Fr, "quiz.about", &[("molecule", "Ibuprofène")]);
        assert_eq!(text, "À propos de Ibuprofène");
    }
}
