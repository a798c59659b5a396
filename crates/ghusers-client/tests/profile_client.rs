//! Integration tests for `ProfileClient` and `RetrievalPipeline` using
//! wiremock HTTP mocks. Back-off is zeroed so retries run instantly.

use ghusers_client::{
    ClientConfig, FetchError, PipelineOptions, ProfileClient, RetrievalPipeline, RetryPolicy,
};
use ghusers_core::{PageRequest, Username};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str, max_retries: u32) -> ProfileClient {
    let config = ClientConfig {
        timeout_secs: 5,
        user_agent: "coreAPI".to_owned(),
        retry: RetryPolicy::new(max_retries, 0),
    };
    ProfileClient::with_base_url(&config, base_url).expect("client construction should not fail")
}

fn username(raw: &str) -> Username {
    Username::parse(raw).expect("valid username")
}

fn profile_json(login: &str, name: &str, followers: u64, public_repos: u64) -> serde_json::Value {
    json!({
        "login": login,
        "id": 1,
        "name": name,
        "company": "bcd",
        "followers": followers,
        "public_repos": public_repos,
    })
}

async fn mount_profile(server: &MockServer, login: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/users/{login}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_profile_returns_parsed_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/johndoe"))
        .and(header("user-agent", "coreAPI"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(profile_json("johndoe", "John Doe", 200, 21)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 0);
    let record = client
        .fetch_profile(&username("johndoe"))
        .await
        .expect("should parse profile");

    assert_eq!(record.login(), "johndoe");
    assert_eq!(record.name(), Some("John Doe"));
    assert_eq!(record.company(), Some("bcd"));
    assert_eq!(record.followers(), 200);
    assert_eq!(record.public_repos(), 21);
    assert_eq!(record.followers_per_repo(), 9);
}

#[tokio::test]
async fn fetch_profile_backfills_missing_login() {
    let server = MockServer::start().await;
    mount_profile(&server, "Jane", json!({ "name": null, "company": "", "followers": 0 })).await;

    let client = test_client(&server.uri(), 0);
    let record = client.fetch_profile(&username("Jane")).await.unwrap();

    assert_eq!(record.login(), "Jane");
    assert_eq!(record.followers_per_repo(), 0);
}

// A user that stays 404 after every retry is reported as `Status` and dropped
// from the batch. It is never decoded into a zero-filled record.
#[tokio::test]
async fn not_found_is_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .expect(7)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 6);
    let err = client.fetch_profile(&username("ghost")).await.unwrap_err();

    assert!(
        matches!(err, FetchError::Status { status: 404, .. }),
        "expected Status(404), got {err:?}"
    );
}

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    mount_profile(&server, "flaky", profile_json("flaky", "Flaky", 10, 5)).await;

    let client = test_client(&server.uri(), 3);
    let record = client.fetch_profile(&username("flaky")).await.unwrap();

    assert_eq!(record.login(), "flaky");
    assert_eq!(record.followers_per_repo(), 2);
}

#[tokio::test]
async fn forbidden_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/jane"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 6);
    let err = client.fetch_profile(&username("jane")).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 403, .. }), "got {err:?}");
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 6);
    let err = client.fetch_profile(&username("broken")).await.unwrap_err();

    assert!(err.is_decode_failure(), "got {err:?}");
}

#[tokio::test]
async fn connection_failure_is_reported_as_http_error() {
    // Nothing listens on port 1.
    let client = test_client("http://127.0.0.1:1", 1);
    let err = client.fetch_profile(&username("jane")).await.unwrap_err();
    assert!(matches!(err, FetchError::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn pipeline_excludes_malformed_sibling() {
    let server = MockServer::start().await;
    mount_profile(&server, "JaneJo", profile_json("JaneJo", "Jane Jo", 100, 10)).await;
    mount_profile(&server, "zeta", profile_json("zeta", "zeta", 200, 20)).await;
    Mock::given(method("GET"))
        .and(path("/users/johndoe"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"login\": "))
        .mount(&server)
        .await;

    let pipeline =
        RetrievalPipeline::new(test_client(&server.uri(), 0), PipelineOptions::default());
    let raw = vec!["zeta".to_owned(), "johndoe".to_owned(), "JaneJo".to_owned()];
    let records = pipeline.retrieve(&raw, PageRequest::default()).await;

    let logins: Vec<&str> = records.iter().map(|r| r.login()).collect();
    assert_eq!(logins, vec!["JaneJo", "zeta"]);
}

#[tokio::test]
async fn pipeline_fetches_duplicate_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/Jane"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(profile_json("Jane", "Jane Doe", 100, 10)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pipeline =
        RetrievalPipeline::new(test_client(&server.uri(), 0), PipelineOptions::default());
    let records = pipeline
        .retrieve(&["Jane", "Jane"], PageRequest::default())
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].login(), "Jane");
    assert_eq!(records[0].followers_per_repo(), 10);
}
