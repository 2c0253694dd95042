//! CLI integration tests for exit-code behaviour.
//!
//! These tests spawn the lighthouse-gate binary as a subprocess to verify
//! the documented exit codes: 1 for usage errors and failed remote calls,
//! 0 on success and when no pull request context exists.

#![expect(clippy::expect_used, reason = "Tests panic on failure")]

use std::process::{Command, Output};

use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Returns the path to the built binary.
fn binary_path() -> std::path::PathBuf {
    // cargo test builds binaries in target/debug
    let mut path = std::env::current_exe()
        .unwrap_or_else(|error| panic!("failed to get current exe path: {error}"));
    path.pop(); // remove test binary name
    path.pop(); // remove deps
    path.push("lighthouse-gate");
    path
}

/// Travis-style CI environment variables that identify a pull request.
const CI_PR_ENV: &[(&str, &str)] = &[
    ("TRAVIS_PULL_REQUEST", "42"),
    ("TRAVIS_PULL_REQUEST_SHA", "abc123"),
    ("TRAVIS_REPO_SLUG", "octocat/hello-world"),
];

fn run_gate(args: &[&str], env: &[(&str, &str)], working_dir: &std::path::Path) -> Output {
    let mut command = Command::new(binary_path());
    command.args(args);
    command.current_dir(working_dir);

    // Hermetic even if the developer has these set locally.
    command
        .env_remove("CI_HOST")
        .env_remove("LIGHTHOUSE_API_KEY")
        .env_remove("API_KEY")
        .env_remove("TRAVIS_PULL_REQUEST")
        .env_remove("TRAVIS_PULL_REQUEST_SHA")
        .env_remove("TRAVIS_REPO_SLUG");

    for (key, value) in env {
        command.env(key, value);
    }

    command
        .output()
        .unwrap_or_else(|error| panic!("failed to execute binary: {error}"))
}

#[rstest]
#[case::no_arguments(&[] as &[&str])]
#[case::help(&["--help"])]
#[case::no_comment_without_score(&["https://example.com", "--no-comment"])]
#[case::unknown_runner(&["https://example.com", "--runner", "foo"])]
fn usage_errors_exit_nonzero(#[case] args: &[&str]) {
    let dir = TempDir::new().expect("temp dir should be created");
    let output = run_gate(args, &[], dir.path());

    assert_eq!(
        output.status.code(),
        Some(1),
        "args {args:?} should exit 1, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[tokio::test]
async fn ci_environment_run_reports_score_and_exits_zero() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/run_on_chrome"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"score": 96})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir should be created");
    let mut env = CI_PR_ENV.to_vec();
    let uri = server.uri();
    env.push(("CI_HOST", uri.as_str()));
    env.push(("LIGHTHOUSE_API_KEY", "secret"));

    let output = run_gate(&["https://example.com", "--score", "90"], &env, dir.path());

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(
        String::from_utf8_lossy(&output.stdout).contains("Lighthouse score: 96"),
        "stdout should report the score"
    );

    let requests = server
        .received_requests()
        .await
        .expect("request recording should be enabled");
    let request = requests.first().expect("one request should be recorded");
    let body: serde_json::Value = request.body_json().expect("body should be JSON");

    assert_eq!(body.get("output"), Some(&json!("json")));
    assert_eq!(body.get("pr"), Some(&json!({"number": 42, "sha": "abc123"})));
    assert_eq!(
        body.get("repo"),
        Some(&json!({"owner": "octocat", "name": "hello-world"}))
    );
    assert_eq!(
        request.headers.get("X-API-KEY").map(|v| v.as_bytes()),
        Some(b"secret".as_slice())
    );
}

#[tokio::test]
async fn invalid_scoring_response_exits_one() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/run_on_chrome"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("temp dir should be created");
    let mut env = CI_PR_ENV.to_vec();
    let uri = server.uri();
    env.push(("CI_HOST", uri.as_str()));

    let output = run_gate(&["https://example.com"], &env, dir.path());

    assert_eq!(
        output.status.code(),
        Some(1),
        "an unparsable scoring response must fail the job"
    );
    assert!(
        !String::from_utf8_lossy(&output.stderr).is_empty(),
        "the failure should be logged"
    );
}

#[tokio::test]
async fn unreachable_scoring_service_exits_one() {
    let dir = TempDir::new().expect("temp dir should be created");
    let mut env = CI_PR_ENV.to_vec();
    // Reserved port: connections are refused immediately.
    env.push(("CI_HOST", "http://127.0.0.1:1"));

    let output = run_gate(&["https://example.com"], &env, dir.path());

    assert_eq!(output.status.code(), Some(1));
}

#[rstest]
fn missing_pr_context_exits_zero() {
    // No CI variables and not a git repository: resolution fails softly.
    let dir = TempDir::new().expect("temp dir should be created");

    let output = run_gate(&["https://example.com"], &[], dir.path());

    assert_eq!(
        output.status.code(),
        Some(0),
        "a non-PR build must not fail the CI job"
    );
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("nothing to do"),
        "the skip should be logged"
    );
}
