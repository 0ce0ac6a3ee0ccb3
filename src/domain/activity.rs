use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityKind {
    Commit,
    Repo,
    Pr,
    Issue,
    Release,
    NoActivity,
}

/// One entry of the activity feed as shown on the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ActivityItem {
    /// Placeholder returned when no activity can be shown.
    #[must_use]
    pub fn no_activity() -> Self {
        Self {
            id: "no-activity".to_string(),
            kind: ActivityKind::NoActivity,
            title: "No recent activity found".to_string(),
            description: "This user has no recent public activity on GitHub.".to_string(),
            timestamp: "N/A".to_string(),
            url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub repo: FeedRepo,
    #[serde(default)]
    pub payload: FeedPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedRepo {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedPayload {
    pub commits: Option<Vec<serde_json::Value>>,
    pub size: Option<u64>,
    pub action: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub ref_type: Option<String>,
    pub pull_request: Option<FeedLink>,
    pub issue: Option<FeedLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedLink {
    pub html_url: Option<String>,
}

fn plural(n: i64) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Renders the distance between `then` and `now` the way the site shows it.
#[must_use]
pub fn time_ago(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let secs = (now - then).whole_seconds();
    let (value, unit) = match secs {
        s if s < 60 => return "just now".to_string(),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 2_592_000 => (s / 86_400, "day"),
        s if s < 31_536_000 => (s / 2_592_000, "month"),
        s => (s / 31_536_000, "year"),
    };
    format!("{value} {unit}{} ago", plural(value))
}

impl FeedEvent {
    fn short_repo(&self) -> &str {
        self.repo.name.split_once('/').map_or(self.repo.name.as_str(), |(_, repo)| repo)
    }

    fn repo_url(&self) -> String {
        format!("https://github.com/{}", self.repo.name)
    }

    /// Maps a raw feed event to a display item. Event types the site does not
    /// show map to `None`.
    #[must_use]
    pub fn to_item(&self, now: OffsetDateTime) -> Option<ActivityItem> {
        let repo = self.short_repo();
        let git_ref = self.payload.git_ref.as_deref().unwrap_or_default();
        let action = self.payload.action.as_deref().unwrap_or_default();

        let (kind, title, description, url) = match self.kind.as_str() {
            "PushEvent" => {
                let count = self
                    .payload
                    .commits
                    .as_ref()
                    .map_or_else(|| self.payload.size.unwrap_or(0), |c| c.len() as u64);
                let title = format!("Pushed {count} commit{}", if count > 1 { "s" } else { "" });
                (ActivityKind::Commit, title, format!("to {repo}"), Some(self.repo_url()))
            }
            "CreateEvent" => match self.payload.ref_type.as_deref() {
                Some("repository") => (
                    ActivityKind::Repo,
                    "Created new repository".to_string(),
                    repo.to_string(),
                    Some(self.repo_url()),
                ),
                Some("branch") => (
                    ActivityKind::Commit,
                    "Created new branch".to_string(),
                    format!("{git_ref} in {repo}"),
                    Some(self.repo_url()),
                ),
                _ => return None,
            },
            "PullRequestEvent" => (
                ActivityKind::Pr,
                format!("{action} pull request"),
                format!("in {repo}"),
                self.payload.pull_request.as_ref().and_then(|p| p.html_url.clone()),
            ),
            "IssuesEvent" => (
                ActivityKind::Issue,
                format!("{action} issue"),
                format!("in {repo}"),
                self.payload.issue.as_ref().and_then(|i| i.html_url.clone()),
            ),
            "ReleaseEvent" => (
                ActivityKind::Release,
                "Published release".to_string(),
                format!("in {repo}"),
                Some(format!("{}/releases", self.repo_url())),
            ),
            "ForkEvent" => {
                (ActivityKind::Repo, "Forked repository".to_string(), repo.to_string(), Some(self.repo_url()))
            }
            "WatchEvent" => {
                (ActivityKind::Repo, "Starred repository".to_string(), repo.to_string(), Some(self.repo_url()))
            }
            "DeleteEvent" => (
                ActivityKind::Commit,
                "Deleted branch".to_string(),
                format!("{git_ref} in {repo}"),
                Some(self.repo_url()),
            ),
            _ => return None,
        };

        Some(ActivityItem { id: self.id.clone(), kind, title, description, timestamp: time_ago(self.created_at, now), url })
    }
}

/// Selects the items to display from a raw feed page, falling back to the
/// placeholder when nothing survives.
#[must_use]
pub fn summarize(events: &[FeedEvent], scan_limit: usize, display_limit: usize, now: OffsetDateTime) -> Vec<ActivityItem> {
    let items: Vec<_> =
        events.iter().take(scan_limit).filter_map(|e| e.to_item(now)).take(display_limit).collect();
    if items.is_empty() { vec![ActivityItem::no_activity()] } else { items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2026-10-19 12:00 UTC);

    fn event(kind: &str, payload: serde_json::Value) -> FeedEvent {
        serde_json::from_value(serde_json::json!({
            "id": "1",
            "type": kind,
            "created_at": "2026-10-19T11:00:00Z",
            "repo": { "name": "someone/portfolio" },
            "payload": payload,
        }))
        .unwrap()
    }

    #[test]
    fn test_time_ago_buckets() {
        assert_eq!(time_ago(NOW - Duration::seconds(30), NOW), "just now");
        assert_eq!(time_ago(NOW - Duration::minutes(1), NOW), "1 minute ago");
        assert_eq!(time_ago(NOW - Duration::minutes(5), NOW), "5 minutes ago");
        assert_eq!(time_ago(NOW - Duration::hours(2), NOW), "2 hours ago");
        assert_eq!(time_ago(NOW - Duration::days(1), NOW), "1 day ago");
        assert_eq!(time_ago(NOW - Duration::days(65), NOW), "2 months ago");
        assert_eq!(time_ago(NOW - Duration::days(800), NOW), "2 years ago");
    }

    #[test]
    fn test_push_event_counts_commits() {
        let item = event("PushEvent", serde_json::json!({ "commits": [{}, {}] })).to_item(NOW).unwrap();
        assert_eq!(item.kind, ActivityKind::Commit);
        assert_eq!(item.title, "Pushed 2 commits");
        assert_eq!(item.description, "to portfolio");
        assert_eq!(item.timestamp, "1 hour ago");
        assert_eq!(item.url.as_deref(), Some("https://github.com/someone/portfolio"));

        let single = event("PushEvent", serde_json::json!({ "commits": [{}] })).to_item(NOW).unwrap();
        assert_eq!(single.title, "Pushed 1 commit");
    }

    #[test]
    fn test_create_event_depends_on_ref_type() {
        let repo = event("CreateEvent", serde_json::json!({ "ref_type": "repository" })).to_item(NOW).unwrap();
        assert_eq!(repo.title, "Created new repository");
        assert_eq!(repo.description, "portfolio");

        let branch =
            event("CreateEvent", serde_json::json!({ "ref_type": "branch", "ref": "feature" })).to_item(NOW).unwrap();
        assert_eq!(branch.title, "Created new branch");
        assert_eq!(branch.description, "feature in portfolio");

        assert!(event("CreateEvent", serde_json::json!({ "ref_type": "tag" })).to_item(NOW).is_none());
    }

    #[test]
    fn test_pull_request_uses_its_own_link() {
        let item = event(
            "PullRequestEvent",
            serde_json::json!({ "action": "opened", "pull_request": { "html_url": "https://example.test/pr/1" } }),
        )
        .to_item(NOW)
        .unwrap();
        assert_eq!(item.kind, ActivityKind::Pr);
        assert_eq!(item.title, "opened pull request");
        assert_eq!(item.url.as_deref(), Some("https://example.test/pr/1"));
    }

    #[test]
    fn test_unknown_events_are_dropped() {
        assert!(event("GollumEvent", serde_json::json!({})).to_item(NOW).is_none());
    }

    #[test]
    fn test_summarize_limits_and_fallback() {
        let mut events: Vec<_> = (0..20).map(|_| event("WatchEvent", serde_json::json!({}))).collect();
        assert_eq!(summarize(&events, 15, 3, NOW).len(), 3);

        events.iter_mut().take(15).for_each(|e| e.kind = "GollumEvent".to_string());
        assert_eq!(summarize(&events, 15, 3, NOW), vec![ActivityItem::no_activity()]);
        assert_eq!(summarize(&[], 15, 3, NOW), vec![ActivityItem::no_activity()]);
    }
}
