use crate::adapters::github::EventFeedClient;
use crate::config::ActivityConfig;
use crate::domain::activity::{ActivityItem, summarize};
use time::OffsetDateTime;

#[derive(Clone, Debug)]
pub struct ActivityService {
    client: EventFeedClient,
    username: String,
    scan_limit: usize,
    display_limit: usize,
}

impl ActivityService {
    #[must_use]
    pub fn new(client: EventFeedClient, config: &ActivityConfig) -> Self {
        Self {
            client,
            username: config.username.clone(),
            scan_limit: config.scan_limit,
            display_limit: config.display_limit,
        }
    }

    /// Recent activity ready for display. Never empty: failures and quiet
    /// accounts yield the placeholder item.
    #[tracing::instrument(skip(self), fields(username = %self.username))]
    pub async fn recent(&self) -> Vec<ActivityItem> {
        match self.client.public_events(&self.username).await {
            Ok(events) => summarize(&events, self.scan_limit, self.display_limit, OffsetDateTime::now_utc()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch activity feed");
                vec![ActivityItem::no_activity()]
            }
        }
    }
}
