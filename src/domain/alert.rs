// Alert domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Info,
    Warning,
    Danger,
}

/// A resort-wide notice. `priority` sorts ascending (lower = more urgent).
/// The `dismissible` flag is advisory: the store does not enforce it, the
/// presentation layer decides whether to offer a dismiss action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub severity: AlertSeverity,
    pub category: String,
    pub title: String,
    pub message: String,
    pub priority: u32,
    pub dismissible: bool,
    pub link: Option<String>,
    pub timestamp: DateTime<Utc>,
}
