//! GitHub activity feed: the events proxy, the four-field display
//! projection and the polling loop that keeps it fresh

mod client;
mod event;
mod poller;

pub use client::GitHubClient;
pub use event::{recent_activities, type_icon, type_label, Activity, GitHubEvent};
pub use poller::{poll_once, ActivityPoller, ActivitySnapshot, SharedSnapshot};
