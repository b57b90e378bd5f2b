//! HTTP client for the remote analysis service.
//!
//! Endpoints consumed:
//! - `POST /api/analyze` with `{ "query": ... }`
//! - `GET /api/results` (last stored analysis)
//! - `GET /api/health`

use async_trait::async_trait;
use oracle_common::config::{Config, DEFAULT_ENDPOINT};
use oracle_common::logging::RequestContext;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::QueryError;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the analysis service (default: localhost:5000)
    pub endpoint: String,
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
        }
    }
}

impl From<&Config> for ClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            endpoint: config.endpoint_base().to_string(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Request body of `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub query: String,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Source of analysis responses.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Submit a (non-empty, trimmed) question and return the raw response.
    async fn analyze(&self, query: &str, ctx: &RequestContext) -> Result<Value, QueryError>;
}

#[async_trait]
impl<T: AnalysisBackend + ?Sized> AnalysisBackend for std::sync::Arc<T> {
    async fn analyze(&self, query: &str, ctx: &RequestContext) -> Result<Value, QueryError> {
        (**self).analyze(query, ctx).await
    }
}

/// Oracle analysis service HTTP client.
#[derive(Debug, Clone)]
pub struct OracleClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl OracleClient {
    /// Create a new client with default configuration.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration.
    pub fn with_config(mut config: ClientConfig) -> anyhow::Result<Self> {
        config.endpoint = config.endpoint.trim_end_matches('/').to_string();

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let http = builder.build()?;

        Ok(Self { config, http })
    }

    /// Base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    /// Fetch the last analysis stored by the service.
    ///
    /// Returns the `results` field when present, otherwise the whole body.
    pub async fn last_results(&self) -> Result<Value, QueryError> {
        let response = self.http.get(self.url("/api/results")).send().await?;
        let mut body = read_json(response).await?;
        Ok(match body.get_mut("results") {
            Some(results) => results.take(),
            None => body,
        })
    }

    /// Check service health.
    pub async fn health(&self) -> Result<HealthResponse, QueryError> {
        let response = self.http.get(self.url("/api/health")).send().await?;
        let body = read_json(response).await?;
        serde_json::from_value(body)
            .map_err(|e| QueryError::Transport(format!("resposta de saúde inválida: {e}")))
    }
}

#[async_trait]
impl AnalysisBackend for OracleClient {
    async fn analyze(&self, query: &str, ctx: &RequestContext) -> Result<Value, QueryError> {
        let started = std::time::Instant::now();
        let response = self
            .http
            .post(self.url("/api/analyze"))
            .headers(ctx.to_headers())
            .json(&AnalyzeRequest {
                query: query.to_string(),
            })
            .send()
            .await?;

        let status = response.status().as_u16();
        let result = read_json(response).await;
        tracing::info!(
            status,
            duration_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Analyze call completed"
        );
        result
    }
}

/// Decode a response: 2xx must be JSON, anything else is an application error.
async fn read_json(response: reqwest::Response) -> Result<Value, QueryError> {
    let status = response.status();
    let text = response.text().await?;

    if status.is_success() {
        serde_json::from_str(&text)
            .map_err(|e| QueryError::Transport(format!("resposta inválida do servidor: {e}")))
    } else {
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
        Err(QueryError::from_error_body(status.as_u16(), &body))
    }
}
