//! Execution Log Entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One execution log record, as stored per-project by the authority and
/// rendered in the logs panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    /// "info", "warning" or "error".
    #[serde(default = "default_level")]
    pub level: String,
    pub message: String,
}

fn default_level() -> String {
    "info".to_string()
}
