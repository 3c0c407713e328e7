//! Seed data for a fresh desk.
//!
//! The built-in seed mirrors a morning shift at the reference time
//! 2024-07-26T10:00:00Z, rebased onto the session clock when a desk opens.
//! A JSON file with the same shape can replace it and is used as written:
//!
//! ```text
//! { "requests": [...], "ambulances": [...], "logs": [...] }
//! ```

use std::{fs, io, path::Path};

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

use crate::model::{
    ActivityLog, Ambulance, AmbulanceId, AmbulanceStatus, EmergencyRequest, EmergencyType,
    LogCategory, RequestId, RequestStatus,
};

/// Errors that can occur while loading a seed file.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, SeedError>;

/// Fixed clock for seeded records, so every run renders the same history.
pub const REFERENCE_TIME: Timestamp = Timestamp::constant(1_721_988_000, 0);

/// Initial contents of every store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Most recent first.
    #[serde(default)]
    pub requests: Vec<EmergencyRequest>,

    #[serde(default)]
    pub ambulances: Vec<Ambulance>,

    /// Insertion order.
    #[serde(default)]
    pub logs: Vec<ActivityLog>,
}

impl Seed {
    /// Reads a seed from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// The built-in shift: five live-board requests, four historical ones,
    /// five units, and a handful of log lines.
    pub fn builtin() -> Self {
        Self {
            requests: builtin_requests(),
            ambulances: builtin_ambulances(),
            logs: builtin_logs(),
        }
    }

    /// Shifts every timestamp so that `REFERENCE_TIME` lands on `now`.
    ///
    /// Relative ages ("25m ago") then read the same as they did at the
    /// reference time.
    pub fn rebased(mut self, now: Timestamp) -> Self {
        let offset = now.duration_since(REFERENCE_TIME);
        for request in &mut self.requests {
            request.time += offset;
        }
        for ambulance in &mut self.ambulances {
            ambulance.last_seen += offset;
        }
        for log in &mut self.logs {
            log.timestamp += offset;
        }
        self
    }
}

fn ago(minutes: i64) -> Timestamp {
    REFERENCE_TIME - SignedDuration::from_mins(minutes)
}

fn request(
    id: &str,
    location: &str,
    minutes_ago: i64,
    kind: EmergencyType,
    status: RequestStatus,
) -> EmergencyRequest {
    EmergencyRequest {
        id: RequestId::from(id),
        location: location.to_string(),
        time: ago(minutes_ago),
        kind,
        status,
        patient_name: None,
        notes: None,
        ambulance_id: None,
    }
}

fn builtin_requests() -> Vec<EmergencyRequest> {
    const DAY: i64 = 24 * 60;

    vec![
        EmergencyRequest {
            patient_name: Some("John Doe".into()),
            notes: Some("Possible head injury.".into()),
            ..request(
                "EMR001",
                "123 Elm Street, Springfield",
                10,
                EmergencyType::Accident,
                RequestStatus::Pending,
            )
        },
        EmergencyRequest {
            ambulance_id: Some(AmbulanceId::from("AMB001")),
            ..request(
                "EMR002",
                "456 Oak Avenue, Shelbyville",
                25,
                EmergencyType::CardiacArrest,
                RequestStatus::Dispatched,
            )
        },
        EmergencyRequest {
            ambulance_id: Some(AmbulanceId::from("AMB002")),
            patient_name: Some("Jane Smith".into()),
            ..request(
                "EMR003",
                "789 Pine Lane, Capital City",
                45,
                EmergencyType::Fall,
                RequestStatus::OnSite,
            )
        },
        EmergencyRequest {
            ambulance_id: Some(AmbulanceId::from("AMB003")),
            ..request(
                "EMR004",
                "101 Maple Drive, Ogdenville",
                70,
                EmergencyType::BreathingDifficulty,
                RequestStatus::Transporting,
            )
        },
        EmergencyRequest {
            ambulance_id: Some(AmbulanceId::from("AMB001")),
            notes: Some("Minor cut, treated on site.".into()),
            ..request(
                "EMR005",
                "234 Birch Road, North Haverbrook",
                120,
                EmergencyType::Other,
                RequestStatus::Resolved,
            )
        },
        EmergencyRequest {
            ambulance_id: Some(AmbulanceId::from("AMB001")),
            notes: Some("Patient transported to City General.".into()),
            ..request(
                "HST001",
                "99 Old Mill Rd",
                2 * DAY,
                EmergencyType::Accident,
                RequestStatus::Resolved,
            )
        },
        EmergencyRequest {
            ambulance_id: Some(AmbulanceId::from("AMB002")),
            notes: Some("CPR administered, vital signs stable upon arrival.".into()),
            ..request(
                "HST002",
                "50 Downtown Ave",
                3 * DAY,
                EmergencyType::CardiacArrest,
                RequestStatus::Resolved,
            )
        },
        EmergencyRequest {
            notes: Some("Caller reported false alarm.".into()),
            ..request(
                "HST003",
                "15 Suburbia Ct",
                5 * DAY,
                EmergencyType::Fall,
                RequestStatus::Cancelled,
            )
        },
        EmergencyRequest {
            ambulance_id: Some(AmbulanceId::from("AMB003")),
            notes: Some("Oxygen provided, patient advised to see GP.".into()),
            ..request(
                "HST004",
                "Industrial Park Unit 7",
                7 * DAY,
                EmergencyType::BreathingDifficulty,
                RequestStatus::Resolved,
            )
        },
    ]
}

fn builtin_ambulances() -> Vec<Ambulance> {
    let unit = |id: &str, call_sign: &str, status, location: &str, crew: &[&str], seen: i64| {
        Ambulance {
            id: AmbulanceId::from(id),
            call_sign: call_sign.to_string(),
            status,
            current_location: location.to_string(),
            crew_members: crew.iter().map(ToString::to_string).collect(),
            last_seen: ago(seen),
        }
    };

    vec![
        unit(
            "AMB001",
            "Unit 101",
            AmbulanceStatus::Available,
            "Station A, 12 Market St",
            &["EMT John Smith", "Paramedic Jane Doe"],
            2,
        ),
        unit(
            "AMB002",
            "Unit 203",
            AmbulanceStatus::EnRouteToScene,
            "Near 5th & Main",
            &["EMT Alice Brown", "Paramedic Bob Green"],
            1,
        ),
        unit(
            "AMB003",
            "Unit 305",
            AmbulanceStatus::AtScene,
            "123 Elm Street (EMR001)",
            &["EMT Charlie Black", "Paramedic Diana White"],
            0,
        ),
        Ambulance {
            last_seen: REFERENCE_TIME - SignedDuration::from_secs(30),
            ..unit(
                "AMB004",
                "Unit 102",
                AmbulanceStatus::EnRouteToHospital,
                "Highway 10, Mile 25",
                &["EMT Eve Davis", "Paramedic Frank Harris"],
                0,
            )
        },
        unit(
            "AMB005",
            "Unit 204",
            AmbulanceStatus::Unavailable,
            "Station B, Maintenance",
            &[],
            60,
        ),
    ]
}

fn builtin_logs() -> Vec<ActivityLog> {
    let entry = |id: &str, minutes_ago: i64, description: &str, category| ActivityLog {
        id: id.to_string(),
        timestamp: ago(minutes_ago),
        description: description.to_string(),
        category,
    };

    // Oldest first, so insertion order matches time.
    vec![
        entry(
            "SL003",
            48 * 60,
            "Backup completed successfully.",
            LogCategory::System,
        ),
        entry(
            "SL002",
            24 * 60,
            "User 'Dispatcher01' updated request HST002.",
            LogCategory::UserAction,
        ),
        entry("SL001", 5 * 60, "System update v2.1 applied.", LogCategory::System),
        entry(
            "LOG004",
            25,
            "Ambulance AMB001 arrived at REQ003 scene.",
            LogCategory::System,
        ),
        entry("LOG003", 10, "User 'Admin' logged in.", LogCategory::UserAction),
        entry(
            "LOG002",
            3,
            "Ambulance AMB003 dispatched to REQ002.",
            LogCategory::System,
        ),
        entry(
            "LOG001",
            2,
            "New emergency request REQ001 received.",
            LogCategory::Emergency,
        ),
    ]
}
