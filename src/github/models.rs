//! Identity types and wire models for the pull request lookup.

use serde::{Deserialize, Serialize};

/// Identity of the pull request being evaluated.
///
/// Resolved once per run and never mutated; serialized as the `pr` field
/// of the scoring-service request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestInfo {
    /// Pull request number.
    pub number: u64,
    /// Head commit SHA.
    pub sha: String,
}

/// Repository owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoInfo {
    /// Repository owner (user or organisation).
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoInfo {
    /// Parses an `owner/name` slug into repository identity.
    ///
    /// Returns `None` unless the slug contains exactly two non-empty
    /// segments.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        let mut parts = slug.split('/');
        let owner = parts.next()?;
        let name = parts.next()?;
        if owner.is_empty() || name.is_empty() || parts.next().is_some() {
            return None;
        }
        Some(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }
}

/// Subset of the GitHub list-pulls response consumed by the lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiOpenPullRequest {
    /// Pull request number.
    pub number: u64,
    /// Head branch details.
    pub head: ApiPullRequestHead,
}

/// Head details within a list-pulls entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPullRequestHead {
    /// Head commit SHA.
    pub sha: String,
}

impl From<ApiOpenPullRequest> for PullRequestInfo {
    fn from(api: ApiOpenPullRequest) -> Self {
        Self {
            number: api.number,
            sha: api.head.sha,
        }
    }
}
