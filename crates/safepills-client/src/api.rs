//! SafePills backend API.
//!
//! Three seams, one per concern, so widgets and sessions can be driven by
//! in-memory fakes in tests. [`ApiClient`] implements all of them over HTTP.

use std::future::Future;
use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use safepills_core::questionnaire::{LegacyEvaluationRequest, LegacyProfile, LegacyQuestion};
use safepills_core::{
    Drug, EvaluationRequest, EvaluationResponse, FlowQuestion, InteractionReport, Lang,
    SearchResult,
};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Search-as-you-type lookups.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
        lang: Lang,
    ) -> impl Future<Output = ClientResult<Vec<SearchResult>>> + Send;
}

/// Questionnaire flows and scoring.
pub trait AutomedicationBackend: Send + Sync + 'static {
    /// Unified flow: profile questions then conditional medical questions.
    fn flow(
        &self,
        substance_id: &str,
        lang: Lang,
    ) -> impl Future<Output = ClientResult<Vec<FlowQuestion>>> + Send;

    /// Linear question list of the legacy quiz.
    fn legacy_questions(
        &self,
        substance_id: &str,
        profile: &LegacyProfile,
    ) -> impl Future<Output = ClientResult<Vec<LegacyQuestion>>> + Send;

    fn evaluate(
        &self,
        request: &EvaluationRequest,
        lang: Lang,
    ) -> impl Future<Output = ClientResult<EvaluationResponse>> + Send;

    fn evaluate_legacy(
        &self,
        request: &LegacyEvaluationRequest,
    ) -> impl Future<Output = ClientResult<EvaluationResponse>> + Send;
}

/// Drug-drug interaction analysis.
pub trait InteractionBackend: Send + Sync + 'static {
    fn analyze(&self, drugs: &[Drug]) -> impl Future<Output = ClientResult<InteractionReport>> + Send;
}

/// HTTP client for the SafePills API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.api_url)
            .map_err(|e| ClientError::Config(format!("invalid API URL {:?}: {}", config.api_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "API URL {:?} cannot be a base",
                config.api_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            timeout: config.timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Base URL plus path segments, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_connect() {
            ClientError::Connection(self.base_url().to_string())
        } else if e.is_timeout() {
            ClientError::Http(format!(
                "Request timed out after {}s",
                self.timeout.as_secs()
            ))
        } else {
            ClientError::Http(e.to_string())
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        tracing::debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        read_json(response).await
    }

    async fn post_json<B, T>(&self, url: Url, query: &[(&str, String)], body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(url = %url, "POST");
        let response = self
            .client
            .post(url)
            .query(query)
            .json(body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ClientError::Http(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::ResponseParsing(e.to_string()))
}

fn lang_param(lang: Lang) -> (&'static str, String) {
    ("lang", lang.code().to_string())
}

impl SearchBackend for ApiClient {
    async fn search(&self, query: &str, lang: Lang) -> ClientResult<Vec<SearchResult>> {
        let url = self.endpoint(&["api", "search"]);
        self.get_json(url, &[("q", query.to_string()), lang_param(lang)])
            .await
    }
}

impl AutomedicationBackend for ApiClient {
    async fn flow(&self, substance_id: &str, lang: Lang) -> ClientResult<Vec<FlowQuestion>> {
        let url = self.endpoint(&["api", "automedication", "flow", substance_id]);
        self.get_json(url, &[lang_param(lang)]).await
    }

    async fn legacy_questions(
        &self,
        substance_id: &str,
        profile: &LegacyProfile,
    ) -> ClientResult<Vec<LegacyQuestion>> {
        let url = self.endpoint(&["api", "automedication", "questions", substance_id]);
        let mut query = Vec::new();
        if let Some(gender) = &profile.gender {
            query.push(("gender", gender.clone()));
        }
        if let Some(age) = profile.age {
            query.push(("age", age.to_string()));
        }
        if let Some(has_other_meds) = profile.has_other_meds {
            query.push(("has_other_meds", has_other_meds.to_string()));
        }
        self.get_json(url, &query).await
    }

    async fn evaluate(
        &self,
        request: &EvaluationRequest,
        lang: Lang,
    ) -> ClientResult<EvaluationResponse> {
        let url = self.endpoint(&["api", "automedication", "evaluate"]);
        self.post_json(url, &[lang_param(lang)], request).await
    }

    async fn evaluate_legacy(
        &self,
        request: &LegacyEvaluationRequest,
    ) -> ClientResult<EvaluationResponse> {
        let url = self.endpoint(&["api", "automedication", "evaluate"]);
        self.post_json(url, &[], request).await
    }
}

impl InteractionBackend for ApiClient {
    async fn analyze(&self, drugs: &[Drug]) -> ClientResult<InteractionReport> {
        let url = self.endpoint(&["api", "analyze"]);
        self.post_json(url, &[], drugs).await
    }
}
