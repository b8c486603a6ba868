//! Live web search through the Serper API.
//!
//! Web search never fails from the caller's point of view: every failure is
//! folded into a one-entry list holding a readable message, so the reply can
//! still be assembled.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::WebConfig;
use crate::error::{HealthbotError, Result};

/// Default Serper search endpoint.
pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

pub const MISSING_API_KEY_MESSAGE: &str = "Web search not available. Missing SERPER_API_KEY.";
pub const NO_RESULTS_MESSAGE: &str = "No search results found.";

const SERVICE: &str = "serper";

/// A web search backend producing `"title - link"` entries.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Search for `query`. Failures are returned as a single message entry.
    async fn search(&self, query: &str) -> Vec<String>;
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
}

/// Extract `"title - link"` entries from a Serper response body, skipping
/// results missing either field.
pub fn parse_results(body: &str) -> Result<Vec<String>> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| HealthbotError::ExternalService {
            service: SERVICE,
            message: format!("invalid response: {e}"),
        })?;
    Ok(response
        .organic
        .into_iter()
        .filter_map(|item| {
            let title = item.title.trim();
            let link = item.link.trim();
            (!title.is_empty() && !link.is_empty()).then(|| format!("{title} - {link}"))
        })
        .collect())
}

/// [`WebSearch`] backed by the Serper Google search API.
#[derive(Debug, Clone)]
pub struct SerperSearch {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    results_limit: usize,
}

impl SerperSearch {
    /// Create a client from the web settings.
    ///
    /// # Errors
    ///
    /// Returns [`HealthbotError::ExternalService`] if the HTTP client cannot
    /// be built.
    pub fn new(config: &WebConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HealthbotError::ExternalService {
                service: SERVICE,
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            api_key: config.serper_api_key.clone(),
            endpoint: config.endpoint.clone(),
            results_limit: config.results_limit,
        })
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Perform the request and report failures as errors.
    pub async fn try_search(&self, query: &str) -> Result<Vec<String>> {
        let external =
            |message: String| HealthbotError::ExternalService { service: SERVICE, message };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&SearchRequest { q: query, num: self.results_limit })
            .send()
            .await
            .map_err(|e| external(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| external(e.to_string()))?;
        if !status.is_success() {
            return Err(external(format!("HTTP {status}: {body}")));
        }
        parse_results(&body)
    }
}

#[async_trait]
impl WebSearch for SerperSearch {
    async fn search(&self, query: &str) -> Vec<String> {
        if !self.has_api_key() {
            return vec![MISSING_API_KEY_MESSAGE.to_string()];
        }
        match self.try_search(query).await {
            Ok(results) if results.is_empty() => vec![NO_RESULTS_MESSAGE.to_string()],
            Ok(results) => {
                debug!(result_count = results.len(), "web search completed");
                results
            }
            Err(e) => {
                warn!(error = %e, "web search failed");
                vec![format!("Error in web search: {e}")]
            }
        }
    }
}
