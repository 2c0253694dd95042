//! Pull request resolution chain.
//!
//! Tries CI environment variables first, then local git discovery plus a
//! GitHub lookup. Every failure path is a value rather than an exception:
//! the caller treats all of them as "no pull request context" and exits
//! cleanly, because non-PR builds are an expected state.

use std::path::Path;

use thiserror::Error;

use crate::config::Environment;
use crate::github::{LookupError, PullRequestInfo, PullRequestLookup, RepoInfo};
use crate::local::{LocalDiscoveryError, discover_context};

/// Resolved pull request identity and repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPullRequest {
    /// Pull request under test.
    pub pr: PullRequestInfo,
    /// Repository containing the pull request.
    pub repo: RepoInfo,
}

/// Errors that prevent resolving a pull request context.
///
/// All variants are soft failures: the run is skipped, not failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// CI provided a PR number but the rest of the context is missing.
    #[error("CI environment is missing {variable}")]
    IncompleteCiEnvironment {
        /// Name of the absent variable.
        variable: &'static str,
    },

    /// The CI repository slug did not look like `owner/name`.
    #[error("could not parse repository slug: {slug}")]
    InvalidRepoSlug {
        /// The malformed slug value.
        slug: String,
    },

    /// Local git discovery failed.
    #[error(transparent)]
    LocalDiscovery(#[from] LocalDiscoveryError),

    /// The GitHub lookup failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// No open pull request matches the current branch head.
    #[error("no open pull request found for {head}")]
    NoOpenPullRequest {
        /// The `owner:branch` head that was queried.
        head: String,
    },
}

/// Resolves the pull request under test.
///
/// Takes identity from the CI environment when a PR number is present,
/// otherwise falls back to discovering the local repository and asking
/// GitHub for the open pull request matching the current branch.
///
/// # Errors
///
/// Returns a [`ResolveError`] when neither source yields a pull request;
/// callers treat this as "nothing to do", not a failure.
pub async fn resolve_pull_request(
    env: &Environment,
    lookup: &dyn PullRequestLookup,
    start_path: &Path,
) -> Result<ResolvedPullRequest, ResolveError> {
    if let Some(number) = env.ci_pull_request_number() {
        return from_ci_environment(env, number);
    }

    tracing::debug!("no CI pull request variables set; falling back to local git discovery");
    from_local_repository(lookup, start_path).await
}

/// Builds the PR identity directly from CI environment variables.
fn from_ci_environment(
    env: &Environment,
    number: u64,
) -> Result<ResolvedPullRequest, ResolveError> {
    let sha = env
        .travis_pull_request_sha
        .clone()
        .ok_or(ResolveError::IncompleteCiEnvironment {
            variable: "TRAVIS_PULL_REQUEST_SHA",
        })?;
    let slug = env
        .travis_repo_slug
        .as_deref()
        .ok_or(ResolveError::IncompleteCiEnvironment {
            variable: "TRAVIS_REPO_SLUG",
        })?;
    let repo = RepoInfo::from_slug(slug).ok_or_else(|| ResolveError::InvalidRepoSlug {
        slug: slug.to_owned(),
    })?;

    Ok(ResolvedPullRequest {
        pr: PullRequestInfo { number, sha },
        repo,
    })
}

/// Discovers the local branch and queries GitHub for its open PR.
async fn from_local_repository(
    lookup: &dyn PullRequestLookup,
    start_path: &Path,
) -> Result<ResolvedPullRequest, ResolveError> {
    let context = discover_context(start_path)?;
    let mut pulls = lookup
        .open_pull_requests(context.repo(), context.branch())
        .await?;

    // The API can return several PRs for one head; the last entry is the
    // most recently returned match.
    let pr = pulls.pop().ok_or_else(|| ResolveError::NoOpenPullRequest {
        head: format!("{}:{}", context.repo().owner, context.branch()),
    })?;

    Ok(ResolvedPullRequest {
        pr,
        repo: context.into_repo(),
    })
}
