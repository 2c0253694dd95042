//! Single-shot invocation of the hosted scoring service.
//!
//! Exactly one POST per run: no retries, no backoff, and only the HTTP
//! client's default timeout. A failed or unparsable response is the one
//! failure mode treated as fatal to the CI job.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::config::{GateConfig, Runner};

/// Errors raised by the scoring-service invocation. All are fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvokeError {
    /// The request body could not be serialized.
    #[error("failed to encode request body: {message}")]
    Body {
        /// Serialization error detail.
        message: String,
    },

    /// The POST failed or the service answered with an error status.
    #[error("scoring service request failed: {message}")]
    Network {
        /// Transport or status error detail.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("scoring service returned an unexpected response: {message}")]
    InvalidResponse {
        /// Parse error detail.
        message: String,
    },
}

/// Outcome of a successful invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Chrome runner: the audit completed with a score.
    Score(f64),
    /// WebPageTest runner: the run was started; results will appear later.
    WptStarted {
        /// URL where the results will be published.
        target_url: String,
    },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score(score) => write!(f, "Lighthouse score: {score}"),
            Self::WptStarted { target_url } => {
                write!(
                    f,
                    "WebPageTest run started; results will be available at {target_url}"
                )
            }
        }
    }
}

/// Client for the hosted Lighthouse CI scoring service.
pub struct RunInvoker {
    client: reqwest::Client,
    host: String,
    api_key: Option<String>,
}

impl RunInvoker {
    /// Creates an invoker for the given service host.
    #[must_use]
    pub fn new(host: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.into(),
            api_key,
        }
    }

    /// Triggers exactly one audit run and interprets the response.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::Network`] when the POST fails or the service
    /// answers with an error status, and [`InvokeError::InvalidResponse`]
    /// when the body cannot be parsed. No retry is attempted.
    pub async fn trigger(&self, config: &GateConfig) -> Result<RunOutcome, InvokeError> {
        let endpoint = format!(
            "{}{}",
            self.host.trim_end_matches('/'),
            config.runner.endpoint_path()
        );
        let body = request_body(config)?;

        let mut request = self.client.post(&endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-KEY", key);
        }

        let response = request
            .send()
            .await
            .map_err(|error| InvokeError::Network {
                message: error.to_string(),
            })?
            .error_for_status()
            .map_err(|error| InvokeError::Network {
                message: error.to_string(),
            })?;

        match config.runner {
            Runner::Chrome => parse_score(response).await,
            Runner::Wpt => parse_run_started(response).await,
        }
    }
}

/// Serializes the configuration and applies runner-specific fields.
fn request_body(config: &GateConfig) -> Result<serde_json::Value, InvokeError> {
    let mut value = serde_json::to_value(config).map_err(|error| InvokeError::Body {
        message: error.to_string(),
    })?;

    if let serde_json::Value::Object(body) = &mut value {
        config.runner.decorate_body(body);
    }

    Ok(value)
}

/// Chrome response shape: `{"score": <number>}`.
#[derive(Debug, Deserialize)]
struct ScoreResponse {
    score: f64,
}

/// WebPageTest response shape: `{"data": {"target_url": <url>}}`.
#[derive(Debug, Deserialize)]
struct RunStartedResponse {
    data: RunStartedData,
}

#[derive(Debug, Deserialize)]
struct RunStartedData {
    target_url: String,
}

async fn parse_score(response: reqwest::Response) -> Result<RunOutcome, InvokeError> {
    response
        .json::<ScoreResponse>()
        .await
        .map(|parsed| RunOutcome::Score(parsed.score))
        .map_err(|error| InvokeError::InvalidResponse {
            message: error.to_string(),
        })
}

async fn parse_run_started(response: reqwest::Response) -> Result<RunOutcome, InvokeError> {
    response
        .json::<RunStartedResponse>()
        .await
        .map(|parsed| RunOutcome::WptStarted {
            target_url: parsed.data.target_url,
        })
        .map_err(|error| InvokeError::InvalidResponse {
            message: error.to_string(),
        })
}
