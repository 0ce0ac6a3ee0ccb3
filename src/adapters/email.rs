use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Variables substituted into the relay's message template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub to_name: String,
    pub message: String,
    pub reply_to: String,
    pub current_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub text: String,
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Carries the numeric status only. The response body never takes part in classification.
    #[error("relay responded with status {}", .0.as_u16())]
    Status(StatusCode),
    #[error("relay failure: {0}")]
    Other(String),
}

#[async_trait]
pub trait EmailRelay: Send + Sync + std::fmt::Debug {
    /// Hands one templated message to the relay.
    ///
    /// # Errors
    /// Returns `RelayError::Network` if the relay cannot be reached.
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<RelayResponse, RelayError>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

/// REST client for the EmailJS send endpoint.
#[derive(Debug, Clone)]
pub struct EmailJsRelay {
    client: Client,
    api_url: String,
    public_key: String,
}

impl EmailJsRelay {
    /// # Errors
    /// Returns `RelayError::Network` if the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>, public_key: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_url: api_url.into(), public_key: public_key.into() })
    }
}

#[async_trait]
impl EmailRelay for EmailJsRelay {
    #[tracing::instrument(level = "debug", skip(self, params), fields(relay.url = %self.api_url))]
    async fn send(
        &self,
        service_id: &str,
        template_id: &str,
        params: &TemplateParams,
    ) -> Result<RelayResponse, RelayError> {
        let body = SendRequest { service_id, template_id, user_id: &self.public_key, template_params: params };

        let resp = self.client.post(&self.api_url).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        tracing::debug!(status = status.as_u16(), "Relay answered");
        Ok(RelayResponse { status, text })
    }
}
