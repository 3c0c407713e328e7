//! Activity log entries.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A human-readable event, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub timestamp: Timestamp,
    pub description: String,
    pub category: LogCategory,
}

/// Who or what produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogCategory {
    System,
    #[serde(rename = "User Action")]
    UserAction,
    Emergency,
}

impl LogCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::UserAction => "User Action",
            Self::Emergency => "Emergency",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}
