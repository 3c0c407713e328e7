//! Core data model for the dispatch desk.
//!
//! Emergency requests, the ambulance fleet, and the activity log.
//! Requests refer to ambulances by id only; the fleet owns the ambulances.

mod activity;
mod ambulance;
mod request;

use serde::{Deserialize, Serialize};

pub use activity::{ActivityLog, LogCategory};
pub use ambulance::{Ambulance, AmbulanceId, AmbulanceStatus};
pub use request::{
    EmergencyRequest, EmergencyType, NewRequest, RequestId, RequestStatus, RequestUpdate,
};

/// A transient message for the operator, raised by a desk action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

/// How loudly a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    /// Something was cancelled or taken out of service.
    Destructive,
}

/// Match free text against a closed set of labels.
///
/// Case, spaces, hyphens, and underscores are ignored, so `on-site`,
/// `OnSite`, and `On-site` all name the same status.
fn parse_label<T: Copy>(input: &str, all: &[T], label: impl Fn(T) -> &'static str) -> Option<T> {
    let wanted = normalize(input);
    all.iter().copied().find(|v| normalize(label(*v)) == wanted)
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
