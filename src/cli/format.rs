//! Output formatting for CLI display.

use jiff::Timestamp;

use crate::dashboard::Dashboard;
use crate::model::{ActivityLog, Ambulance, EmergencyRequest, Notification, Severity};

/// `2024-07-26 09:50 UTC`.
pub(super) fn format_time(ts: Timestamp) -> String {
    format!("{} UTC", ts.strftime("%Y-%m-%d %H:%M"))
}

/// Coarse age of `then` as seen at `now`: `just now`, `12m ago`, `3h ago`, `2d ago`.
pub(super) fn format_age(then: Timestamp, now: Timestamp) -> String {
    let secs = now.duration_since(then).as_secs();
    match secs {
        s if s < 60 => "just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s => format!("{}d ago", s / 86_400),
    }
}

/// One line per request: id, status, type, location, assignment.
pub(super) fn format_request_row(request: &EmergencyRequest) -> String {
    let ambulance = request
        .ambulance_id
        .as_ref()
        .map_or("unassigned", |a| a.as_str());
    format!(
        "{:<7} [{:<12}] {:<20} {}  ({ambulance})",
        request.id,
        request.status.label(),
        request.kind.label(),
        request.location,
    )
}

/// Multi-line detail view of a request.
///
/// `ambulance` is the resolved unit, if the assignment names one the fleet knows.
pub(super) fn format_request_detail(
    request: &EmergencyRequest,
    ambulance: Option<&Ambulance>,
    now: Timestamp,
) -> String {
    let assignment = match (&request.ambulance_id, ambulance) {
        (Some(_), Some(unit)) => format!("{} ({})", unit.call_sign, unit.id),
        (Some(id), None) => format!("{id} (not in fleet)"),
        (None, _) => "unassigned".to_string(),
    };
    let mut lines = vec![
        format!("Request {}", request.id),
        format!("  Status:    {}", request.status),
        format!("  Type:      {}", request.kind),
        format!("  Location:  {}", request.location),
        format!(
            "  Received:  {} ({})",
            format_time(request.time),
            format_age(request.time, now)
        ),
        format!("  Ambulance: {assignment}"),
    ];
    if let Some(patient) = &request.patient_name {
        lines.push(format!("  Patient:   {patient}"));
    }
    if let Some(notes) = &request.notes {
        lines.push(format!("  Notes:     {notes}"));
    }
    lines.join("\n")
}

/// One line per unit: id, call sign, status, location, last seen.
pub(super) fn format_ambulance_row(ambulance: &Ambulance, now: Timestamp) -> String {
    format!(
        "{:<7} {:<9} [{:<20}] {}  (seen {})",
        ambulance.id,
        ambulance.call_sign,
        ambulance.status.label(),
        ambulance.current_location,
        format_age(ambulance.last_seen, now),
    )
}

/// Multi-line detail view of a unit.
pub(super) fn format_ambulance_detail(ambulance: &Ambulance, now: Timestamp) -> String {
    let crew = if ambulance.crew_members.is_empty() {
        "none".to_string()
    } else {
        ambulance.crew_members.join(", ")
    };
    [
        format!("Ambulance {} ({})", ambulance.id, ambulance.call_sign),
        format!("  Status:    {}", ambulance.status),
        format!("  Location:  {}", ambulance.current_location),
        format!("  Crew:      {crew}"),
        format!(
            "  Last seen: {} ({})",
            format_time(ambulance.last_seen),
            format_age(ambulance.last_seen, now)
        ),
    ]
    .join("\n")
}

pub(super) fn format_log_row(log: &ActivityLog) -> String {
    format!(
        "{}  {:<11} {}",
        format_time(log.timestamp),
        log.category.label(),
        log.description
    )
}

/// A notification as a single stderr line.
pub(super) fn format_notification(notification: &Notification) -> String {
    let marker = match notification.severity {
        Severity::Info => "",
        Severity::Destructive => "! ",
    };
    format!("{marker}{}: {}", notification.title, notification.message)
}

pub(super) fn format_dashboard(dashboard: &Dashboard<'_>) -> String {
    let s = &dashboard.summary;
    let mut lines = vec![
        "Dashboard".to_string(),
        format!(
            "  Requests:   {} total, {} pending, {} ongoing, {} resolved, {} cancelled",
            s.total_requests, s.pending, s.ongoing, s.resolved, s.cancelled
        ),
        format!(
            "  Ambulances: {} on duty, {} available",
            s.on_duty_ambulances, s.available_ambulances
        ),
        String::new(),
        "Ongoing requests".to_string(),
    ];
    if dashboard.ongoing.is_empty() {
        lines.push("  none".to_string());
    }
    lines.extend(
        dashboard
            .ongoing
            .iter()
            .map(|r| format!("  {}", format_request_row(r))),
    );
    lines.push(String::new());
    lines.push("Recent activity".to_string());
    if dashboard.recent_activity.is_empty() {
        lines.push("  none".to_string());
    }
    lines.extend(
        dashboard
            .recent_activity
            .iter()
            .map(|l| format!("  {}", format_log_row(l))),
    );
    lines.join("\n")
}
