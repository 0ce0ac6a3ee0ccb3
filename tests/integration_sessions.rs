#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, missing_debug_implementations, unreachable_pub)]
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
mod common;

async fn fill(app: &common::TestApp, id: &str) {
    app.update_field(id, "name", "Jo").await;
    app.update_field(id, "email", "jo@x.co").await;
    app.update_field(id, "message", "Hello there, nice to meet you").await;
}

#[tokio::test]
async fn test_new_session_starts_ready_and_empty() {
    let app = common::TestApp::spawn().await;

    let resp = app.client.post(format!("{}/api/contact/sessions", app.api_url)).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert!(body["id"].is_string());
    let view = &body["view"];
    assert_eq!(view["control"], "ready");
    assert_eq!(view["notice"], Value::Null);
    assert_eq!(view["advisory"], Value::Null);
    assert_eq!(view["fieldErrors"], json!({}));
    assert_eq!(view["values"], json!({ "name": "", "email": "", "message": "" }));
}

#[tokio::test]
async fn test_blur_validates_and_change_clears() {
    let app = common::TestApp::spawn().await;
    let id = app.create_session().await;

    let view: Value = app
        .client
        .patch(format!("{}/api/contact/sessions/{id}", app.api_url))
        .json(&json!({ "field": "name", "value": "J", "event": "blur" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["fieldErrors"]["name"], "Name must be at least 2 characters");

    let view = app.update_field(&id, "name", "Jo").await;
    assert!(view["fieldErrors"].get("name").is_none(), "editing clears the field error");
    assert_eq!(view["values"]["name"], "Jo");
}

#[tokio::test]
async fn test_invalid_submit_keeps_form_idle() {
    let app = common::TestApp::spawn().await;
    let id = app.create_session().await;
    app.update_field(&id, "email", "bad").await;
    app.update_field(&id, "message", "short").await;

    let resp = app.submit(&id).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["outcome"], "invalid");
    assert_eq!(body["view"]["control"], "ready");
    assert_eq!(body["view"]["notice"], Value::Null);
    assert_eq!(
        body["view"]["fieldErrors"],
        json!({
            "name": "Name is required",
            "email": "Please enter a valid email address",
            "message": "Message must be at least 10 characters",
        })
    );
    assert!(app.upstream.sent().is_empty());
}

#[tokio::test]
async fn test_successful_submit_resets_values() {
    let app = common::TestApp::spawn().await;
    let id = app.create_session().await;
    fill(&app, &id).await;

    let body: Value = app.submit(&id).await.json().await.unwrap();

    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["view"]["notice"]["kind"], "success");
    assert_eq!(body["view"]["notice"]["message"], "Message sent successfully! I'll get back to you soon.");
    assert_eq!(body["view"]["values"], json!({ "name": "", "email": "", "message": "" }));
    assert_eq!(app.upstream.sent().len(), 1);
}

#[tokio::test]
async fn test_failed_submit_keeps_values_for_retry() {
    let app = common::TestApp::spawn().await;
    app.upstream.respond_with(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests");
    let id = app.create_session().await;
    fill(&app, &id).await;

    let body: Value = app.submit(&id).await.json().await.unwrap();

    assert_eq!(body["view"]["notice"]["kind"], "error");
    assert_eq!(body["view"]["notice"]["message"], "Too many requests. Please wait a moment and try again.");
    assert_eq!(body["view"]["values"]["name"], "Jo");

    app.upstream.respond_with(StatusCode::OK, "OK");
    let body: Value = app.submit(&id).await.json().await.unwrap();
    assert_eq!(body["view"]["notice"]["kind"], "success");
    assert_eq!(app.upstream.sent().len(), 2);
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_busy() {
    let app = common::TestApp::spawn().await;
    app.upstream.delay_relay(Duration::from_millis(500));
    let id = app.create_session().await;
    fill(&app, &id).await;

    let first = {
        let client = app.client.clone();
        let url = format!("{}/api/contact/sessions/{id}/submit", app.api_url);
        tokio::spawn(async move { client.post(url).send().await.unwrap().json::<Value>().await.unwrap() })
    };
    tokio::time::sleep(Duration::from_millis(150)).await;

    let view: Value = app
        .client
        .get(format!("{}/api/contact/sessions/{id}", app.api_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view["control"], "busy");

    let second: Value = app.submit(&id).await.json().await.unwrap();
    assert_eq!(second["outcome"], "busy");

    let first = first.await.unwrap();
    assert_eq!(first["outcome"], "completed");
    assert_eq!(app.upstream.sent().len(), 1, "only one delivery per attempt");
}

#[tokio::test]
async fn test_deleted_session_is_gone() {
    let app = common::TestApp::spawn().await;
    let id = app.create_session().await;

    let resp = app.client.delete(format!("{}/api/contact/sessions/{id}", app.api_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.client.get(format!("{}/api/contact/sessions/{id}", app.api_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Contact session not found");

    let resp = app.client.delete(format!("{}/api/contact/sessions/{id}", app.api_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = common::TestApp::spawn().await;
    let id = uuid::Uuid::new_v4();

    let resp = app.submit(&id.to_string()).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_shows_advisory_when_unconfigured() {
    let app = common::TestApp::spawn_with_config(|config| config.email.service_id = None).await;
    let id = app.create_session().await;
    fill(&app, &id).await;

    let body: Value = app.submit(&id).await.json().await.unwrap();

    assert!(body["view"]["advisory"].as_str().unwrap().contains("being configured"));
    assert_eq!(
        body["view"]["notice"]["message"],
        "Email service is currently unavailable. Please try contacting me directly via email or social media."
    );
    assert!(app.upstream.sent().is_empty());
}
