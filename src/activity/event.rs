//! Projection of raw GitHub events into display records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::helpers::{take_chars, time_ago};

/// The parts of a GitHub event the activity cards use
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub repo: EventRepo,
    #[serde(default)]
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventRepo {
    pub name: String,
}

/// One activity card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: String,
    pub repo: String,
    pub message: String,
    pub time_ago: String,
}

impl Activity {
    pub fn from_event(event: &GitHubEvent, now: DateTime<Utc>) -> Self {
        Self {
            kind: event.kind.clone(),
            repo: event.repo.name.clone(),
            message: activity_message(&event.kind, &event.payload),
            time_ago: time_ago(event.created_at, now),
        }
    }

    pub fn icon(&self) -> &'static str {
        type_icon(&self.kind)
    }

    pub fn label(&self) -> &str {
        type_label(&self.kind)
    }
}

fn payload_str<'a>(payload: &'a Value, pointer: &str) -> Option<&'a str> {
    payload.pointer(pointer).and_then(Value::as_str)
}

/// Short human message for an event
fn activity_message(kind: &str, payload: &Value) -> String {
    match kind {
        "PushEvent" => {
            let message = payload_str(payload, "/commits/0/message")
                .unwrap_or("No commit message");
            format!("{}...", take_chars(message, 40))
        }
        "PullRequestEvent" => format!(
            "{}了一个拉取请求: {}",
            payload_str(payload, "/action").unwrap_or_default(),
            payload_str(payload, "/pull_request/title").unwrap_or_default()
        ),
        "IssueCommentEvent" => {
            let body = payload_str(payload, "/comment/body").unwrap_or_default();
            format!("{}...", take_chars(body, 50))
        }
        "WatchEvent" => "Star了此仓库".to_string(),
        "ForkEvent" => "Fork了此仓库".to_string(),
        "CreateEvent" => format!(
            "创建了{}:{}",
            payload_str(payload, "/ref_type").unwrap_or_default(),
            payload_str(payload, "/ref").unwrap_or_default()
        ),
        "DeleteEvent" => format!(
            "删除了{}:{}",
            payload_str(payload, "/ref_type").unwrap_or_default(),
            payload_str(payload, "/ref").unwrap_or_default()
        ),
        other => format!("执行了{}操作", other),
    }
}

/// Font Awesome icon class for an event type
pub fn type_icon(kind: &str) -> &'static str {
    match kind {
        "PushEvent" => "fa-code-commit",
        "PullRequestEvent" => "fa-code-branch",
        "IssueCommentEvent" => "fa-comment",
        "WatchEvent" => "fa-star",
        "ForkEvent" => "fa-code-branch",
        "CreateEvent" => "fa-plus",
        "DeleteEvent" => "fa-trash",
        _ => "fa-question",
    }
}

/// Human label for an event type, followed by the repository name
pub fn type_label(kind: &str) -> &str {
    match kind {
        "PushEvent" => "推送了代码到仓库 ",
        "PullRequestEvent" => "发起了拉取请求在仓库 ",
        "IssueCommentEvent" => "评论了Issue在仓库 ",
        "WatchEvent" => "Star了仓库 ",
        "ForkEvent" => "Fork了仓库 ",
        "CreateEvent" => "创建了 ",
        "DeleteEvent" => "删除了 ",
        other => other,
    }
}

/// Project the first `limit` events; malformed events are skipped
pub fn recent_activities(events: &[Value], limit: usize, now: DateTime<Utc>) -> Vec<Activity> {
    events
        .iter()
        .take(limit)
        .filter_map(|raw| match GitHubEvent::deserialize(raw) {
            Ok(event) => Some(Activity::from_event(&event, now)),
            Err(e) => {
                tracing::warn!("Skipping malformed GitHub event: {}", e);
                None
            }
        })
        .collect()
}
