//! Client configuration.
//!
//! Resolved once at startup and passed into services; nothing here is read
//! again while requests are in flight.

use std::time::Duration;

use reqwest::Url;
use safepills_core::Lang;

use crate::error::{ClientError, ClientResult};

/// Development backend address.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Preferred base-URL variable.
pub const API_URL_ENV: &str = "SAFEPILLS_API_URL";
/// Base-URL variable shared with the web front-end.
pub const PUBLIC_API_URL_ENV: &str = "PUBLIC_API_URL";
/// UI language (`fr` or `es`).
pub const LANG_ENV: &str = "SAFEPILLS_LANG";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL without trailing slash
    pub api_url: String,
    pub lang: Lang,
    pub timeout: Duration,
    /// Quiescence delay before a search is issued
    pub search_delay: Duration,
    /// Shorter queries clear the results without a request
    pub min_query_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            lang: Lang::default(),
            timeout: DEFAULT_TIMEOUT,
            search_delay: DEFAULT_SEARCH_DELAY,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }
}

impl ClientConfig {
    /// Read the process environment.
    pub fn from_env() -> ClientResult<Self> {
        let api_url = api_url_from_env_values(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(PUBLIC_API_URL_ENV).ok(),
        )?;
        Ok(Self {
            api_url,
            lang: lang_from_env_value(std::env::var(LANG_ENV).ok()),
            ..Self::default()
        })
    }

    /// Override the base URL (e.g., from a command-line flag).
    pub fn with_api_url(mut self, raw: &str) -> ClientResult<Self> {
        self.api_url = normalize_api_url(raw)?;
        Ok(self)
    }

    pub fn with_lang(mut self, lang: Lang) -> Self {
        self.lang = lang;
        self
    }
}

/// Pick the base URL from the two supported variables.
///
/// Blank values are skipped. Falls back to [`DEFAULT_API_URL`].
pub fn api_url_from_env_values(
    primary: Option<String>,
    fallback: Option<String>,
) -> ClientResult<String> {
    let chosen = [primary, fallback]
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty());

    match chosen {
        Some(raw) => normalize_api_url(&raw),
        None => Ok(DEFAULT_API_URL.to_string()),
    }
}

/// Parse the language variable. Unknown or missing codes give French.
pub fn lang_from_env_value(value: Option<String>) -> Lang {
    value
        .map(|v| Lang::from_code(v.trim()))
        .unwrap_or_default()
}

/// Validate an absolute http(s) URL and strip trailing slashes.
pub fn normalize_api_url(raw: &str) -> ClientResult<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| ClientError::Config(format!("invalid API URL {:?}: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!(
            "API URL must use http or https, got {:?}",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() {
        return Err(ClientError::Config(format!("API URL {:?} cannot be a base", raw)));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_unset() {
        assert_eq!(api_url_from_env_values(None, None).unwrap(), DEFAULT_API_URL);
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let url = api_url_from_env_values(Some("   ".into()), Some("https://api.safepills.fr/".into()))
            .unwrap();
        assert_eq!(url, "https://api.safepills.fr");
    }

    #[test]
    fn test_primary_wins_over_public() {
        let url = api_url_from_env_values(
            Some("http://10.0.0.2:9000".into()),
            Some("https://api.safepills.fr".into()),
        )
        .unwrap();
        assert_eq!(url, "http://10.0.0.2:9000");
    }

    #[test]
    fn test_rejects_invalid_url() {
        assert!(matches!(
            normalize_api_url("not a url"),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            normalize_api_url("ftp://files.example.org"),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_keeps_path_prefix() {
        assert_eq!(
            normalize_api_url("https://example.org/safepills//").unwrap(),
            "https://example.org/safepills"
        );
    }

    #[test]
    fn test_lang_from_env() {
        assert_eq!(lang_from_env_value(Some("es".into())), Lang::Es);
        assert_eq!(lang_from_env_value(Some(" ES ".into())), Lang::Es);
        assert_eq!(lang_from_env_value(Some("de".into())), Lang::Fr);
        assert_eq!(lang_from_env_value(None), Lang::Fr);
    }
}
