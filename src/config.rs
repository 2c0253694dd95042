//! CLI arguments, environment snapshot, and the resolved run configuration.
//!
//! The environment is captured exactly once at startup into an explicit
//! [`Environment`] struct and passed down; nothing re-reads process
//! variables mid-run. CLI parsing uses clap; the one invariant clap cannot
//! express (`--no-comment` requires a positive `--score`) is checked by
//! [`CliArgs::validate`].

use std::env;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use thiserror::Error;

use crate::github::{PullRequestInfo, RepoInfo};

/// Default scoring-service host used when `CI_HOST` is not set.
pub const DEFAULT_CI_HOST: &str = "https://lighthouse-ci.appspot.com";

/// Errors raised while validating CLI input beyond what clap checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsageError {
    /// Commenting was disabled without supplying a score threshold.
    #[error(
        "--no-comment disables the summary comment, so a positive --score \
         threshold is required to gate the run"
    )]
    ScoreRequiredWithoutComment,
}

/// Command-line arguments for triggering a Lighthouse CI run.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "lighthouse-gate",
    about = "Trigger a hosted Lighthouse CI audit for the current pull request"
)]
pub struct CliArgs {
    /// URL to audit.
    #[arg(value_name = "URL")]
    pub test_url: String,

    /// Minimum passing Lighthouse score.
    #[arg(long, value_name = "SCORE")]
    pub score: Option<f64>,

    /// Do not post a summary comment on the pull request.
    #[arg(long)]
    pub no_comment: bool,

    /// Audit backend to run against.
    #[arg(long, value_enum, default_value = "chrome")]
    pub runner: Runner,
}

impl CliArgs {
    /// Checks that either commenting is enabled or a positive score
    /// threshold was given.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::ScoreRequiredWithoutComment`] when
    /// `--no-comment` is set without a positive `--score`.
    pub fn validate(&self) -> Result<(), UsageError> {
        if !self.no_comment {
            return Ok(());
        }
        match self.score {
            Some(value) if value > 0.0 => Ok(()),
            _ => Err(UsageError::ScoreRequiredWithoutComment),
        }
    }
}

/// Audit backend selection.
///
/// Each variant owns its endpoint path and request-body decoration, so
/// adding a backend is a matter of adding a variant and its strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Runner {
    /// Hosted Chrome runner that responds with a score.
    #[default]
    Chrome,
    /// WebPageTest runner that starts a run and reports a results URL.
    Wpt,
}

impl Runner {
    /// Path of the scoring-service endpoint for this runner.
    #[must_use]
    pub const fn endpoint_path(self) -> &'static str {
        match self {
            Self::Chrome => "/run_on_chrome",
            Self::Wpt => "/run_on_wpt",
        }
    }

    /// Applies runner-specific fields to the request body.
    ///
    /// The Chrome runner sets `output: "json"` so the service responds
    /// with a machine-readable score.
    pub fn decorate_body(self, body: &mut serde_json::Map<String, serde_json::Value>) {
        if matches!(self, Self::Chrome) {
            body.insert(
                "output".to_owned(),
                serde_json::Value::String("json".to_owned()),
            );
        }
    }
}

/// One-shot snapshot of the environment variables the tool consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Scoring-service host, from `CI_HOST` or [`DEFAULT_CI_HOST`].
    pub ci_host: String,
    /// API key forwarded in the `X-API-KEY` header.
    pub api_key: Option<String>,
    /// Raw `TRAVIS_PULL_REQUEST` value (`"false"` for push builds).
    pub travis_pull_request: Option<String>,
    /// `TRAVIS_PULL_REQUEST_SHA`: head commit of the pull request.
    pub travis_pull_request_sha: Option<String>,
    /// `TRAVIS_REPO_SLUG`: `owner/name` of the repository under test.
    pub travis_repo_slug: Option<String>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            ci_host: DEFAULT_CI_HOST.to_owned(),
            api_key: None,
            travis_pull_request: None,
            travis_pull_request_sha: None,
            travis_repo_slug: None,
        }
    }
}

impl Environment {
    /// Captures the relevant environment variables.
    ///
    /// Prefers `LIGHTHOUSE_API_KEY` over the legacy `API_KEY` name and
    /// warns when only the legacy name is set.
    #[must_use]
    pub fn capture() -> Self {
        let api_key = env::var("LIGHTHOUSE_API_KEY").ok().or_else(|| {
            let legacy = env::var("API_KEY").ok();
            if legacy.is_some() {
                tracing::warn!("API_KEY is deprecated; set LIGHTHOUSE_API_KEY instead");
            }
            legacy
        });

        Self {
            ci_host: env::var("CI_HOST").unwrap_or_else(|_| DEFAULT_CI_HOST.to_owned()),
            api_key,
            travis_pull_request: env::var("TRAVIS_PULL_REQUEST").ok(),
            travis_pull_request_sha: env::var("TRAVIS_PULL_REQUEST_SHA").ok(),
            travis_repo_slug: env::var("TRAVIS_REPO_SLUG").ok(),
        }
    }

    /// Returns the CI pull request number when this is a PR build.
    ///
    /// Travis sets `TRAVIS_PULL_REQUEST=false` for push builds, so any
    /// value that does not parse as an integer means "not a PR build".
    #[must_use]
    pub fn ci_pull_request_number(&self) -> Option<u64> {
        self.travis_pull_request
            .as_deref()
            .and_then(|raw| raw.parse().ok())
    }
}

/// Fully resolved configuration for one audit run.
///
/// Serialized verbatim (camelCase) as the scoring-service request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateConfig {
    /// URL to audit.
    pub test_url: String,
    /// Whether the service should post a summary comment on the PR.
    pub add_comment: bool,
    /// Minimum passing score; omitted from the body when not gating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_pass_score: Option<f64>,
    /// Selected audit backend.
    pub runner: Runner,
    /// Pull request under test.
    pub pr: PullRequestInfo,
    /// Repository containing the pull request.
    pub repo: RepoInfo,
}

impl GateConfig {
    /// Combines validated CLI arguments with the resolved PR identity.
    #[must_use]
    pub fn new(args: &CliArgs, pr: PullRequestInfo, repo: RepoInfo) -> Self {
        Self {
            test_url: args.test_url.clone(),
            add_comment: !args.no_comment,
            min_pass_score: args.score,
            runner: args.runner,
            pr,
            repo,
        }
    }
}
