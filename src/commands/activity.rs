//! Print recent GitHub activity

use anyhow::Result;
use chrono::Utc;

use crate::activity::{recent_activities, GitHubClient};
use crate::Site;

/// Fetch the configured user's events once and print the projection
pub async fn run(site: &Site) -> Result<()> {
    let github = &site.config.github;
    let client = GitHubClient::new(github);

    let events = client.fetch_events(&github.username).await?;
    let activities = recent_activities(&events, github.recent_limit, Utc::now());

    if activities.is_empty() {
        println!("No recent activity for {}", github.username);
    }
    for activity in activities {
        println!(
            "  [{}] {}{}: {} ({})",
            activity.icon(),
            activity.label(),
            activity.repo,
            activity.message,
            activity.time_ago
        );
    }

    Ok(())
}
