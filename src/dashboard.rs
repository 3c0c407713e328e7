//! Dashboard aggregates derived from the desk's stores.

use serde::Serialize;

use crate::desk::Desk;
use crate::model::{ActivityLog, AmbulanceStatus, EmergencyRequest, RequestStatus};

/// Default size of the ongoing-requests panel.
pub const DEFAULT_ONGOING_LIMIT: usize = 3;

/// Non-terminal requests in store order, at most `limit`.
///
/// Store order is most-recent-first, so this is the newest live work.
/// No prioritisation beyond that.
pub fn ongoing_requests(records: &[EmergencyRequest], limit: usize) -> Vec<&EmergencyRequest> {
    records.iter().filter(|r| r.is_ongoing()).take(limit).collect()
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_requests: usize,
    pub pending: usize,
    pub ongoing: usize,
    pub resolved: usize,
    pub cancelled: usize,

    /// Units not marked unavailable.
    pub on_duty_ambulances: usize,
    pub available_ambulances: usize,
}

/// Everything the dashboard page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<'a> {
    pub summary: Summary,
    pub ongoing: Vec<&'a EmergencyRequest>,
    pub recent_activity: Vec<&'a ActivityLog>,
}

/// Counts requests by status and ambulances by availability.
pub fn summarize(desk: &Desk) -> Summary {
    let requests = desk.requests();
    let count = |status: RequestStatus| requests.iter().filter(|r| r.status == status).count();
    let ambulances = desk.ambulances();

    Summary {
        total_requests: requests.len(),
        pending: count(RequestStatus::Pending),
        ongoing: requests.iter().filter(|r| r.is_ongoing()).count(),
        resolved: count(RequestStatus::Resolved),
        cancelled: count(RequestStatus::Cancelled),
        on_duty_ambulances: ambulances.iter().filter(|a| a.is_on_duty()).count(),
        available_ambulances: ambulances
            .iter()
            .filter(|a| a.status == AmbulanceStatus::Available)
            .count(),
    }
}

/// Builds the full dashboard view.
pub fn build(desk: &Desk, ongoing_limit: usize, activity_limit: usize) -> Dashboard<'_> {
    Dashboard {
        summary: summarize(desk),
        ongoing: ongoing_requests(desk.requests(), ongoing_limit),
        recent_activity: desk.recent_logs(activity_limit),
    }
}
