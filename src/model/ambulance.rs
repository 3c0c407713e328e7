//! Ambulance fleet types.

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::parse_label;

/// Identifier of a fleet unit (e.g. `AMB001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmbulanceId(pub String);

impl AmbulanceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AmbulanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for AmbulanceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A fleet unit and its crew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambulance {
    pub id: AmbulanceId,
    pub call_sign: String,
    pub status: AmbulanceStatus,

    /// Free-text position label. No coordinates.
    pub current_location: String,

    /// Crew names in display order.
    #[serde(default)]
    pub crew_members: Vec<String>,

    /// Last position or status report.
    pub last_seen: Timestamp,
}

impl Ambulance {
    /// Whether the unit is on duty, busy or not.
    pub fn is_on_duty(&self) -> bool {
        self.status != AmbulanceStatus::Unavailable
    }
}

/// What a unit is doing right now.
///
/// The duty cycle runs `Available → EnRouteToScene → AtScene →
/// EnRouteToHospital → AtHospital → Clearing → Available`.
/// `Unavailable` can be entered from anywhere and only leads back to `Available`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmbulanceStatus {
    Available,
    #[serde(rename = "En route to scene")]
    EnRouteToScene,
    #[serde(rename = "At scene")]
    AtScene,
    #[serde(rename = "En route to hospital")]
    EnRouteToHospital,
    #[serde(rename = "At hospital")]
    AtHospital,
    Clearing,
    Unavailable,
}

impl AmbulanceStatus {
    pub const ALL: [Self; 7] = [
        Self::Available,
        Self::EnRouteToScene,
        Self::AtScene,
        Self::EnRouteToHospital,
        Self::AtHospital,
        Self::Clearing,
        Self::Unavailable,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::EnRouteToScene => "En route to scene",
            Self::AtScene => "At scene",
            Self::EnRouteToHospital => "En route to hospital",
            Self::AtHospital => "At hospital",
            Self::Clearing => "Clearing",
            Self::Unavailable => "Unavailable",
        }
    }

    /// The next step in the duty cycle. `Unavailable` steps back to `Available`.
    pub fn next(self) -> Self {
        match self {
            Self::Available => Self::EnRouteToScene,
            Self::EnRouteToScene => Self::AtScene,
            Self::AtScene => Self::EnRouteToHospital,
            Self::EnRouteToHospital => Self::AtHospital,
            Self::AtHospital => Self::Clearing,
            Self::Clearing | Self::Unavailable => Self::Available,
        }
    }

    /// Whether moving from `self` to `to` follows the duty cycle.
    pub fn can_transition_to(self, to: Self) -> bool {
        self == to || to == Self::Unavailable || self.next() == to
    }
}

impl fmt::Display for AmbulanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for AmbulanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s, &Self::ALL, |st| st.label())
            .ok_or_else(|| format!("unknown ambulance status: {s}"))
    }
}
