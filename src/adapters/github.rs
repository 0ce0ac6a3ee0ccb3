use crate::domain::activity::FeedEvent;
use reqwest::{Client, header};
use std::time::Duration;

/// Client for the public events feed of one account.
#[derive(Debug, Clone)]
pub struct EventFeedClient {
    client: Client,
    api_url: String,
}

impl EventFeedClient {
    /// # Errors
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(user_agent).timeout(timeout).build()?;
        Ok(Self { client, api_url: api_url.into() })
    }

    /// Fetches the most recent public events of `username`.
    ///
    /// # Errors
    /// Returns `reqwest::Error` on transport failure, a non-success status, or
    /// an unparseable body.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn public_events(&self, username: &str) -> Result<Vec<FeedEvent>, reqwest::Error> {
        let url = format!("{}/users/{}/events/public", self.api_url.trim_end_matches('/'), username);
        self.client
            .get(url)
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .header(header::CACHE_CONTROL, "no-store")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}
