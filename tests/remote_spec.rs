//! Bridge client and connection form against a live server instance.

use jira_stories::api::create_router;
use jira_stories::config::ConnectionConfig;
use jira_stories::form::{ConnectionForm, FormField, SubmitOutcome};
use jira_stories::jira::TrackerClient;
use jira_stories::remote::{BridgeClient, BridgeError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Start the bridge on an ephemeral port and return a client for it.
async fn start_bridge() -> (BridgeClient, TrackerClient) {
    let tracker = TrackerClient::default();
    let app = create_router(tracker.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });

    (
        BridgeClient::new(format!("http://{}/api/jira/", addr)),
        tracker,
    )
}

async fn mock_jira() -> MockServer {
    let jira = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/3/myself"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "displayName": "Dev" })))
        .mount(&jira)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/3/search/jql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issues": [{ "id": "1", "key": "PROJ-1", "fields": { "summary": "First" } }]
        })))
        .mount(&jira)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/api/3/issue/PROJ-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1",
            "key": "PROJ-1",
            "fields": { "summary": "First", "description": "Plain" }
        })))
        .mount(&jira)
        .await;

    jira
}

#[tokio::test]
async fn bridge_client_connects_and_reads_stories() {
    let jira = mock_jira().await;
    let (bridge, tracker) = start_bridge().await;

    bridge
        .connect(&ConnectionConfig::new(jira.uri(), "dev@acme.test", "t"))
        .await
        .expect("connect");
    assert!(tracker.is_configured());

    let stories = bridge.list_stories().await.expect("stories");
    assert_eq!(stories.len(), 1);
    assert_eq!(stories[0].key, "PROJ-1");

    let story = bridge.get_story("PROJ-1").await.expect("story");
    assert_eq!(story.description_text(), "Plain");
}

#[tokio::test]
async fn bridge_client_encodes_story_key() {
    let jira = mock_jira().await;
    let (bridge, tracker) = start_bridge().await;
    tracker.configure(&ConnectionConfig::new(jira.uri(), "dev@acme.test", "t"));

    let err = bridge.get_story("../myself").await.unwrap_err();
    assert!(matches!(err, BridgeError::Rejected(_)));

    let requests = jira.received_requests().await.expect("recording enabled");
    let paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    assert_eq!(paths, vec!["/rest/api/3/issue/..%2Fmyself"]);
}

#[tokio::test]
async fn bridge_client_surfaces_rejections() {
    let jira = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/3/myself"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad token" })))
        .mount(&jira)
        .await;

    let (bridge, _) = start_bridge().await;
    let err = bridge
        .connect(&ConnectionConfig::new(jira.uri(), "dev@acme.test", "t"))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::Rejected(ref msg) if msg == "Bad token"));

    let err = bridge.list_stories().await.unwrap_err();
    assert!(matches!(err, BridgeError::Rejected(_)));
}

#[tokio::test]
async fn form_submits_through_bridge() {
    let jira = mock_jira().await;
    let (bridge, tracker) = start_bridge().await;

    let mut form = ConnectionForm::new();
    form.set(FormField::BaseUrl, jira.uri());
    form.set(FormField::Email, "dev@acme.test");
    form.set(FormField::ApiToken, "\"t\"");

    assert_eq!(form.submit(&bridge).await, SubmitOutcome::Connected);
    assert!(form.error().is_none());
    assert!(tracker.is_configured());
}

#[tokio::test]
async fn form_shows_bridge_error_inline() {
    let jira = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/3/myself"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errorMessages": ["Client must be authenticated to access this resource."]
        })))
        .mount(&jira)
        .await;

    let (bridge, _) = start_bridge().await;

    let mut form = ConnectionForm::new();
    form.set(FormField::BaseUrl, jira.uri());
    form.set(FormField::Email, "dev@acme.test");
    form.set(FormField::ApiToken, "wrong");

    let outcome = form.submit(&bridge).await;
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(
        form.error(),
        Some("Client must be authenticated to access this resource.")
    );
    assert!(!form.is_connecting());
}

#[tokio::test]
async fn form_can_connect_in_process() {
    let jira = mock_jira().await;
    let tracker = TrackerClient::default();

    let mut form = ConnectionForm::new();
    form.set(FormField::BaseUrl, format!("{}/", jira.uri()));
    form.set(FormField::Email, "dev@acme.test");
    form.set(FormField::ApiToken, "t");

    assert_eq!(form.submit(&tracker).await, SubmitOutcome::Connected);
    assert_eq!(
        tracker.rest_root(),
        Some(format!("{}/rest/api/3", jira.uri()))
    );
}
