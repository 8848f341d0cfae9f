//! Relay delivery tests against a local webhook stub.

use std::sync::Arc;
use std::time::Duration;

use activity_relay::{WebhookRelay, RELAY_CONTENT_TYPE};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::Router;
use netscript_core::{ActivityLog, GitHubUser, LogAction, LogSink, MemoryStore};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

async fn spawn_webhook() -> (String, mpsc::UnboundedReceiver<(Option<String>, String)>) {
    let (tx, rx) = mpsc::unbounded_channel();

    async fn receive(
        State(tx): State<mpsc::UnboundedSender<(Option<String>, String)>>,
        headers: HeaderMap,
        body: String,
    ) -> &'static str {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let _ = tx.send((content_type, body));
        "ok"
    }

    let app = Router::new().route("/log", post(receive)).with_state(tx);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/log", addr), rx)
}

fn user() -> GitHubUser {
    GitHubUser {
        login: "octocat".to_string(),
        name: Some("The Octocat".to_string()),
        avatar_url: "https://avatars.example/o.png".to_string(),
        html_url: "https://github.com/octocat".to_string(),
        bio: None,
    }
}

#[tokio::test]
async fn test_recorded_entry_reaches_webhook() {
    let (url, mut rx) = spawn_webhook().await;
    let relay = WebhookRelay::new(url).unwrap();
    let log = ActivityLog::with_sink(Arc::new(MemoryStore::new()), Arc::new(relay));

    let entry = log.record(LogAction::Login, "User logged in via GitHub", Some(&user()));

    let (content_type, body) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(content_type.as_deref(), Some(RELAY_CONTENT_TYPE));

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["logEntry"]["id"], entry.id.as_str());
    assert_eq!(json["logEntry"]["action"], "LOGIN");
    assert_eq!(json["logEntry"]["user"], "octocat");
    assert_eq!(json["logEntry"]["details"], "User logged in via GitHub");
}

#[tokio::test]
async fn test_unreachable_webhook_does_not_fail_caller() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let relay = Arc::new(WebhookRelay::new(format!("http://{}/log", addr)).unwrap());
    let log = ActivityLog::with_sink(Arc::new(MemoryStore::new()), relay.clone());

    log.record(LogAction::Error, "boom", None);

    assert_eq!(log.entries().len(), 1);
    assert_eq!(log.entries()[0].action, LogAction::Error);
    assert!(relay.dispatch(&log.entries()[0]).is_ok());
}
