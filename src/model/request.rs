//! Emergency requests: the unit of dispatch work.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{AmbulanceId, parse_label};

/// Identifier of an emergency request (e.g. `EMR001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A call for an ambulance, tracked from intake to resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyRequest {
    pub id: RequestId,

    /// Free-text description of where the emergency is.
    pub location: String,

    /// When the request was received. Never changes after intake.
    pub time: Timestamp,

    #[serde(rename = "type")]
    pub kind: EmergencyType,

    pub status: RequestStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,

    /// Operator notes. Appended to, never replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// The assigned ambulance, looked up in the fleet by id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambulance_id: Option<AmbulanceId>,
}

impl EmergencyRequest {
    /// Whether the request still needs attention.
    pub fn is_ongoing(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// What kind of emergency was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmergencyType {
    #[serde(rename = "Cardiac Arrest")]
    CardiacArrest,
    Accident,
    Fall,
    #[serde(rename = "Breathing Difficulty")]
    BreathingDifficulty,
    Other,
}

impl EmergencyType {
    pub const ALL: [Self; 5] = [
        Self::CardiacArrest,
        Self::Accident,
        Self::Fall,
        Self::BreathingDifficulty,
        Self::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::CardiacArrest => "Cardiac Arrest",
            Self::Accident => "Accident",
            Self::Fall => "Fall",
            Self::BreathingDifficulty => "Breathing Difficulty",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for EmergencyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s, &Self::ALL, |t| t.label())
            .ok_or_else(|| format!("unknown emergency type: {s}"))
    }
}

/// Where a request stands in its lifecycle.
///
/// The forward path is `Pending → Dispatched → OnSite → Transporting → Resolved`.
/// Any live request can be cancelled. `Resolved` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Dispatched,
    #[serde(rename = "On-site")]
    OnSite,
    Transporting,
    Resolved,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Dispatched,
        Self::OnSite,
        Self::Transporting,
        Self::Resolved,
        Self::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Dispatched => "Dispatched",
            Self::OnSite => "On-site",
            Self::Transporting => "Transporting",
            Self::Resolved => "Resolved",
            Self::Cancelled => "Cancelled",
        }
    }

    /// No outgoing transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Cancelled)
    }

    /// The single forward step, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Dispatched),
            Self::Dispatched => Some(Self::OnSite),
            Self::OnSite => Some(Self::Transporting),
            Self::Transporting => Some(Self::Resolved),
            Self::Resolved | Self::Cancelled => None,
        }
    }

    /// Whether moving from `self` to `to` follows the lifecycle table.
    ///
    /// Staying in the same status is always allowed.
    pub fn can_transition_to(self, to: Self) -> bool {
        if self == to {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        to == Self::Cancelled || self.next() == Some(to)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s, &Self::ALL, |st| st.label())
            .ok_or_else(|| format!("unknown request status: {s}"))
    }
}

/// Fields supplied at intake. Everything else is assigned by the desk.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub location: String,
    pub kind: EmergencyType,
    pub patient_name: Option<String>,
    pub notes: Option<String>,
}

/// An edit to a request's status and assignment.
///
/// Both fields are applied together: `ambulance_id: None` clears the assignment.
#[derive(Debug, Clone)]
pub struct RequestUpdate {
    pub status: RequestStatus,
    pub ambulance_id: Option<AmbulanceId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use RequestStatus::{Cancelled, Dispatched, OnSite, Pending, Resolved, Transporting};

    #[test]
    fn forward_path_is_allowed() {
        assert!(Pending.can_transition_to(Dispatched));
        assert!(Dispatched.can_transition_to(OnSite));
        assert!(OnSite.can_transition_to(Transporting));
        assert!(Transporting.can_transition_to(Resolved));
    }

    #[test]
    fn live_statuses_can_be_cancelled() {
        for status in [Pending, Dispatched, OnSite, Transporting] {
            assert!(status.can_transition_to(Cancelled), "{status}");
        }
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        for from in [Resolved, Cancelled] {
            for to in RequestStatus::ALL {
                if to != from {
                    assert!(!from.can_transition_to(to), "{from} -> {to}");
                }
            }
        }
    }

    #[test]
    fn skipping_and_going_backwards_are_rejected() {
        assert!(!Pending.can_transition_to(OnSite));
        assert!(!Pending.can_transition_to(Resolved));
        assert!(!Transporting.can_transition_to(Dispatched));
        assert!(!Resolved.can_transition_to(Pending));
    }

    #[test]
    fn parse_status_accepts_label_and_kebab() {
        assert_eq!("On-site".parse::<RequestStatus>().unwrap(), OnSite);
        assert_eq!("on-site".parse::<RequestStatus>().unwrap(), OnSite);
        assert_eq!("onsite".parse::<RequestStatus>().unwrap(), OnSite);
        assert_eq!("RESOLVED".parse::<RequestStatus>().unwrap(), Resolved);
        assert!("closed".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn parse_emergency_type() {
        assert_eq!(
            "breathing-difficulty".parse::<EmergencyType>().unwrap(),
            EmergencyType::BreathingDifficulty
        );
        assert_eq!(
            "Cardiac Arrest".parse::<EmergencyType>().unwrap(),
            EmergencyType::CardiacArrest
        );
    }

    #[test]
    fn serializes_with_dashboard_labels() {
        let json = serde_json::to_string(&OnSite).unwrap();
        assert_eq!(json, "\"On-site\"");
        let json = serde_json::to_string(&EmergencyType::CardiacArrest).unwrap();
        assert_eq!(json, "\"Cardiac Arrest\"");
    }
}
