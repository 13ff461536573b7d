//! Fixed-interval refresh of the activity snapshot

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;

use super::{recent_activities, Activity, GitHubClient};
use crate::error::UpstreamError;

/// The latest projected activities
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySnapshot {
    pub activities: Vec<Activity>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub type SharedSnapshot = Arc<RwLock<ActivitySnapshot>>;

/// Fetch once and replace the snapshot. On failure the previous snapshot
/// stays in place.
pub async fn poll_once(
    client: &GitHubClient,
    username: &str,
    limit: usize,
    snapshot: &SharedSnapshot,
) -> Result<usize, UpstreamError> {
    let events = client.fetch_events(username).await?;
    let now = Utc::now();
    let activities = recent_activities(&events, limit, now);
    let count = activities.len();

    let mut guard = snapshot.write().await;
    guard.activities = activities;
    guard.updated_at = Some(now);

    Ok(count)
}

/// `tokio::time::interval` rejects a zero period
const MIN_INTERVAL: Duration = Duration::from_millis(100);

struct PollerHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

/// Polls the GitHub events API and publishes the projection.
///
/// There is no backoff and no in-flight dedup: a tick fires a request
/// whether or not the last one succeeded.
pub struct ActivityPoller {
    client: GitHubClient,
    username: String,
    limit: usize,
    interval: Duration,
    snapshot: SharedSnapshot,
    handle: Option<PollerHandle>,
}

impl ActivityPoller {
    pub fn new(client: GitHubClient, username: String, limit: usize, interval: Duration) -> Self {
        Self {
            client,
            username,
            limit,
            interval,
            snapshot: SharedSnapshot::default(),
            handle: None,
        }
    }

    pub fn snapshot(&self) -> SharedSnapshot {
        Arc::clone(&self.snapshot)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_polling(&self) -> bool {
        self.handle.is_some()
    }

    /// Start polling; the first fetch happens immediately. Starting twice
    /// is a no-op.
    pub fn start(&mut self) {
        if self.is_polling() {
            tracing::debug!("Activity polling already running");
            return;
        }

        let (cancel_tx, mut cancel_rx) = broadcast::channel(1);
        let client = self.client.clone();
        let username = self.username.clone();
        let limit = self.limit;
        let interval = self.interval.max(MIN_INTERVAL);
        let snapshot = Arc::clone(&self.snapshot);

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = cancel_rx.recv() => {
                        tracing::debug!("Activity poller shutdown requested");
                        break;
                    }
                    _ = ticker.tick() => {
                        match poll_once(&client, &username, limit, &snapshot).await {
                            Ok(count) => tracing::debug!(count, "Refreshed GitHub activity"),
                            Err(e) => tracing::warn!(error = %e, "Failed to refresh GitHub activity"),
                        }
                    }
                }
            }
        });

        tracing::info!("GitHub activity polling started, every {:?}", interval);
        self.handle = Some(PollerHandle { cancel_tx, join });
    }

    /// Stop polling and wait for the loop to exit. A request already in
    /// flight runs to completion first.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.cancel_tx.send(());
            if let Err(e) = handle.join.await {
                tracing::warn!("Activity poller task ended abnormally: {}", e);
            }
            tracing::info!("GitHub activity polling stopped");
        }
    }

    /// Change the delay; a running poller restarts with it
    pub async fn change_interval(&mut self, interval: Duration) {
        self.interval = interval;
        if self.is_polling() {
            self.stop().await;
            self.start();
        }
    }
}
