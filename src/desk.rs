//! The dispatch desk: owner of the request, fleet, and activity stores.
//!
//! One `Desk` per session. Every mutation goes through it, and each one
//! queues a [`Notification`] for the operator and, where it matters,
//! an [`ActivityLog`] entry.
//!
//! ```text
//! Desk
//!   requests     # most recent first
//!   ambulances   # seed order
//!   logs         # insertion order
//! ```
//!
//! Missing ids are not errors: operations on an unknown request or unit
//! return `Ok(None)` and change nothing. Errors only come from [`Policy`]
//! checks, which are off unless configured.

mod activity;
mod fleet;
mod requests;

use jiff::Timestamp;

use crate::model::{
    ActivityLog, Ambulance, AmbulanceId, AmbulanceStatus, EmergencyRequest, Notification,
    RequestId, RequestStatus,
};
use crate::seed::Seed;

/// Errors raised when a [`Policy`] check rejects an operation.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("request {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: RequestId,
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("ambulance {id} cannot move from {from} to {to}")]
    InvalidFleetTransition {
        id: AmbulanceId,
        from: AmbulanceStatus,
        to: AmbulanceStatus,
    },

    #[error("unknown ambulance: {0}")]
    UnknownAmbulance(AmbulanceId),

    #[error("ambulance {ambulance} is already assigned to request {request}")]
    AmbulanceBusy {
        ambulance: AmbulanceId,
        request: RequestId,
    },
}

pub type Result<T> = core::result::Result<T, DeskError>;

/// Which checks the desk applies to edits.
///
/// The default is fully permissive: any status may be set to any other and
/// any ambulance id is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policy {
    /// Reject status changes outside the lifecycle tables.
    pub enforce_transitions: bool,

    /// Reject assignments to unknown or already-busy ambulances.
    pub validate_assignments: bool,
}

impl Policy {
    /// Every check on.
    pub fn strict() -> Self {
        Self {
            enforce_transitions: true,
            validate_assignments: true,
        }
    }
}

/// In-memory dispatch state for one session.
pub struct Desk {
    seed: Seed,
    policy: Policy,
    operator: String,
    session_started: Timestamp,

    requests: Vec<EmergencyRequest>,
    ambulances: Vec<Ambulance>,
    logs: Vec<ActivityLog>,
    notifications: Vec<Notification>,

    /// Last number handed out for a new request id. Only ever grows.
    request_counter: u64,
    log_counter: u64,
}

impl Desk {
    /// Creates a desk loaded with `seed`.
    ///
    /// `operator` is recorded on user actions in the activity log.
    pub fn new(seed: Seed, policy: Policy, operator: impl Into<String>) -> Self {
        let mut desk = Self {
            requests: Vec::new(),
            ambulances: Vec::new(),
            logs: Vec::new(),
            notifications: Vec::new(),
            request_counter: 0,
            log_counter: 0,
            seed,
            policy,
            operator: operator.into(),
            session_started: Timestamp::now(),
        };
        desk.load_seed();
        desk
    }

    /// Discards everything that happened this session and reloads the seed.
    ///
    /// The request counter is not rewound, so ids handed out before the
    /// reset are never reused.
    pub fn reset(&mut self) {
        tracing::info!(operator = %self.operator, "resetting desk to seed");
        self.load_seed();
        self.notifications.clear();
        self.session_started = Timestamp::now();
    }

    fn load_seed(&mut self) {
        self.requests = self.seed.requests.clone();
        self.ambulances = self.seed.ambulances.clone();
        self.logs = self.seed.logs.clone();
        tracing::debug!(
            requests = self.requests.len(),
            ambulances = self.ambulances.len(),
            logs = self.logs.len(),
            "desk loaded"
        );
    }

    /// When this session began. All relative times render against it.
    pub fn session_started(&self) -> Timestamp {
        self.session_started
    }

    /// Requests, most recent first.
    pub fn requests(&self) -> &[EmergencyRequest] {
        &self.requests
    }

    /// Ambulances in fleet order.
    pub fn ambulances(&self) -> &[Ambulance] {
        &self.ambulances
    }

    /// Activity log in insertion order.
    pub fn logs(&self) -> &[ActivityLog] {
        &self.logs
    }

    /// Notifications raised since the last call, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, notification: Notification) {
        tracing::debug!(title = %notification.title, "{}", notification.message);
        self.notifications.push(notification);
    }
}
