#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, missing_debug_implementations, unreachable_pub)]
use reqwest::StatusCode;
use serde_json::{Value, json};
mod common;

#[tokio::test]
async fn test_invalid_submission_reports_every_field() {
    let app = common::TestApp::spawn().await;

    let resp = app.post_contact(json!({ "name": "", "email": "bad", "message": "short" })).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(
        body["fields"],
        json!({
            "name": "Name is required",
            "email": "Please enter a valid email address",
            "message": "Message must be at least 10 characters",
        })
    );
    assert!(app.upstream.sent().is_empty(), "nothing should reach the relay");
}

#[tokio::test]
async fn test_missing_fields_are_treated_as_empty() {
    let app = common::TestApp::spawn().await;

    let resp = app.post_contact(json!({ "email": "ada@example.com" })).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["fields"]["name"], "Name is required");
    assert_eq!(body["fields"]["message"], "Message is required");
    assert!(body["fields"].get("email").is_none());
}

#[tokio::test]
async fn test_successful_delivery_sends_trimmed_template() {
    let app = common::TestApp::spawn().await;

    let resp = app
        .post_contact(json!({ "name": "  Jo  ", "email": "jo@x.co", "message": "  Hello there, nice to meet you  " }))
        .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Message sent successfully! I'll get back to you soon.");
    assert!(body.get("errorCategory").is_none());

    let sent = app.upstream.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["service_id"], "service_test");
    assert_eq!(sent[0]["template_id"], "template_test");
    assert_eq!(sent[0]["user_id"], "public_test");

    let params = &sent[0]["template_params"];
    assert_eq!(params["from_name"], "Jo");
    assert_eq!(params["from_email"], "jo@x.co");
    assert_eq!(params["reply_to"], "jo@x.co");
    assert_eq!(params["to_name"], "Turki");
    assert_eq!(params["message"], "Hello there, nice to meet you");
    assert!(params["current_date"].as_str().unwrap().contains(" at "));
}

#[tokio::test]
async fn test_throttled_relay_is_classified_as_rate_limit() {
    let app = common::TestApp::spawn().await;
    app.upstream.respond_with(StatusCode::TOO_MANY_REQUESTS, "Too Many Requests");

    let resp = app.post_contact(common::valid_message()).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["errorCategory"], "rate_limit");
    assert_eq!(body["message"], "Too many requests. Please wait a moment and try again.");
    assert_eq!(app.upstream.sent().len(), 1, "a failed attempt is never retried");
}

#[tokio::test]
async fn test_relay_statuses_map_to_categories() {
    let cases = [
        (StatusCode::NOT_FOUND, "The template ID not found", "template_missing"),
        (StatusCode::UNAUTHORIZED, "The Public Key is invalid", "unauthorized"),
        (StatusCode::BAD_REQUEST, "The user_id parameter is required", "service_misconfigured"),
        (StatusCode::INTERNAL_SERVER_ERROR, "boom", "unknown"),
        (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable", "unknown"),
        (StatusCode::BAD_GATEWAY, "upstream template render timed out", "unknown"),
    ];

    let app = common::TestApp::spawn().await;
    for (status, text, expected) in cases {
        app.upstream.respond_with(status, text);

        let resp = app.post_contact(common::valid_message()).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["errorCategory"], expected, "relay status {status}");
    }
}

#[tokio::test]
async fn test_unreachable_relay_is_a_network_error() {
    let app = common::TestApp::spawn_with_config(|config| {
        config.email.api_url = "http://127.0.0.1:1/email/send".to_string();
    })
    .await;

    let resp = app.post_contact(common::valid_message()).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errorCategory"], "network");
    assert_eq!(body["message"], "Network error. Please check your internet connection and try again.");
}

#[tokio::test]
async fn test_unconfigured_relay_short_circuits() {
    let app = common::TestApp::spawn_with_config(|config| {
        config.email.public_key = None;
    })
    .await;

    let status: Value =
        app.client.get(format!("{}/api/contact/status", app.api_url)).send().await.unwrap().json().await.unwrap();
    assert_eq!(status["available"], false);
    assert!(status["advisory"].as_str().unwrap().starts_with("Email service is currently being configured"));

    let resp = app.post_contact(common::valid_message()).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errorCategory"], "not_configured");
    assert!(app.upstream.sent().is_empty(), "no network call without credentials");
}

#[tokio::test]
async fn test_status_without_advisory_when_configured() {
    let app = common::TestApp::spawn().await;

    let status: Value =
        app.client.get(format!("{}/api/contact/status", app.api_url)).send().await.unwrap().json().await.unwrap();

    assert_eq!(status, json!({ "available": true, "advisory": null }));
}

#[tokio::test]
async fn test_slow_relay_hits_request_timeout() {
    let app = common::TestApp::spawn_with_config(|config| config.server.request_timeout_secs = 1).await;
    app.upstream.delay_relay(std::time::Duration::from_millis(1_500));

    let resp = app.post_contact(common::valid_message()).await;

    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
}
