//! Octocrab-backed lookup of open pull requests for a branch head.
//!
//! The trait-based design enables mocking in tests while the Octocrab
//! implementation handles real HTTP requests.

use async_trait::async_trait;
use http::Uri;
use octocrab::Octocrab;
use serde::Serialize;

use super::error::LookupError;
use super::models::{ApiOpenPullRequest, PullRequestInfo, RepoInfo};

/// Public GitHub API base used when no other base is supplied.
const GITHUB_API_BASE: &str = "https://api.github.com";

/// Gateway that can list open pull requests for a branch head.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestLookup: Send + Sync {
    /// Lists open pull requests whose head matches `{owner}:{branch}`.
    ///
    /// Entries keep the order returned by the API.
    async fn open_pull_requests(
        &self,
        repo: &RepoInfo,
        branch: &str,
    ) -> Result<Vec<PullRequestInfo>, LookupError>;
}

/// Octocrab-backed lookup.
pub struct OctocrabLookup {
    client: Octocrab,
}

impl OctocrabLookup {
    /// Creates a lookup from an existing Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an unauthenticated client for the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] when the Octocrab client cannot be
    /// constructed.
    pub fn public() -> Result<Self, LookupError> {
        Self::for_base_uri(GITHUB_API_BASE)
    }

    /// Builds an unauthenticated client against a specific API base URI.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidUri`] when the base URI cannot be
    /// parsed or [`LookupError::Api`] when Octocrab fails to construct a
    /// client.
    pub fn for_base_uri(api_base: &str) -> Result<Self, LookupError> {
        let base_uri: Uri = api_base
            .parse::<Uri>()
            .map_err(|error| LookupError::InvalidUri(error.to_string()))?;

        let client = Octocrab::builder()
            .base_uri(base_uri)
            .map_err(|error| LookupError::Api {
                message: format!("build client failed: {error}"),
            })?
            .build()
            .map_err(|error| map_octocrab_error("build client", &error))?;

        Ok(Self::new(client))
    }
}

/// Query parameters for the list-pulls endpoint.
#[derive(Debug, Serialize)]
struct ListOpenParams<'a> {
    state: &'a str,
    head: &'a str,
}

#[async_trait]
impl PullRequestLookup for OctocrabLookup {
    async fn open_pull_requests(
        &self,
        repo: &RepoInfo,
        branch: &str,
    ) -> Result<Vec<PullRequestInfo>, LookupError> {
        let head = format!("{}:{branch}", repo.owner);
        let route = format!("/repos/{}/{}/pulls", repo.owner, repo.name);
        let params = ListOpenParams {
            state: "open",
            head: &head,
        };

        self.client
            .get::<Vec<ApiOpenPullRequest>, _, _>(route, Some(&params))
            .await
            .map(|pulls| pulls.into_iter().map(PullRequestInfo::from).collect())
            .map_err(|error| map_octocrab_error("list open pull requests", &error))
    }
}

/// Maps an Octocrab error into a [`LookupError`], keeping the operation
/// name for context.
fn map_octocrab_error(context: &str, error: &octocrab::Error) -> LookupError {
    match error {
        octocrab::Error::GitHub { source, .. } => LookupError::Api {
            message: format!("{context}: {}", source.message),
        },
        _ => LookupError::Network {
            message: format!("{context}: {error}"),
        },
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Tests panic on failure")]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{LookupError, OctocrabLookup, PullRequestLookup};
    use crate::github::models::{PullRequestInfo, RepoInfo};

    fn repo() -> RepoInfo {
        RepoInfo {
            owner: "octocat".to_owned(),
            name: "hello-world".to_owned(),
        }
    }

    fn lookup_for(server: &MockServer) -> OctocrabLookup {
        OctocrabLookup::for_base_uri(&server.uri()).expect("mock base URI should be accepted")
    }

    #[rstest]
    #[tokio::test]
    async fn lists_open_pull_requests_for_branch_head() {
        let server = MockServer::start().await;

        let body = json!([
            {"number": 7, "head": {"sha": "aaa111"}},
            {"number": 9, "head": {"sha": "bbb222"}},
        ]);

        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello-world/pulls"))
            .and(query_param("state", "open"))
            .and(query_param("head", "octocat:feature-branch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;

        let lookup = lookup_for(&server);
        let pulls = lookup
            .open_pull_requests(&repo(), "feature-branch")
            .await
            .expect("lookup should succeed");

        assert_eq!(
            pulls,
            vec![
                PullRequestInfo {
                    number: 7,
                    sha: "aaa111".to_owned(),
                },
                PullRequestInfo {
                    number: 9,
                    sha: "bbb222".to_owned(),
                },
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn empty_response_yields_no_matches() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello-world/pulls"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let lookup = lookup_for(&server);
        let pulls = lookup
            .open_pull_requests(&repo(), "feature-branch")
            .await
            .expect("lookup should succeed");

        assert!(pulls.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn api_errors_are_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello-world/pulls"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest",
            })))
            .mount(&server)
            .await;

        let lookup = lookup_for(&server);
        let result = lookup.open_pull_requests(&repo(), "feature-branch").await;

        assert!(
            matches!(result, Err(LookupError::Api { .. })),
            "a 404 should surface as an API error, got {result:?}"
        );
    }

    #[rstest]
    fn invalid_base_uri_is_rejected() {
        let result = OctocrabLookup::for_base_uri("not a uri");
        assert!(matches!(result, Err(LookupError::InvalidUri(_))));
    }
}
