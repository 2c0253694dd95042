//! Error types exposed by the pull request lookup.

use thiserror::Error;

/// Errors surfaced while querying GitHub for open pull requests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The API base URI could not be parsed.
    #[error("GitHub API base URI is invalid: {0}")]
    InvalidUri(String),

    /// GitHub returned an API error.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body from GitHub describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },
}
