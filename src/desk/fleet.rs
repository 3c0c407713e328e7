//! Fleet store: lookups and the ambulance duty cycle.

use jiff::Timestamp;

use crate::model::{
    Ambulance, AmbulanceId, AmbulanceStatus, LogCategory, Notification, Severity,
};

use super::{Desk, DeskError, Result};

impl Desk {
    /// Looks up an ambulance by id.
    pub fn ambulance(&self, id: &AmbulanceId) -> Option<&Ambulance> {
        self.ambulances.iter().find(|a| &a.id == id)
    }

    /// Resolves a request's assignment to a unit, if it exists in the fleet.
    ///
    /// `None` for both "unassigned" and "assigned to an id the fleet doesn't know".
    pub fn assigned_ambulance(&self, id: Option<&AmbulanceId>) -> Option<&Ambulance> {
        id.and_then(|id| self.ambulance(id))
    }

    /// Moves a unit to a new status and refreshes its last-seen time.
    ///
    /// Returns `Ok(None)` if `id` is unknown.
    pub fn set_ambulance_status(
        &mut self,
        id: &AmbulanceId,
        status: AmbulanceStatus,
    ) -> Result<Option<&Ambulance>> {
        let Some(index) = self.ambulances.iter().position(|a| &a.id == id) else {
            tracing::debug!(ambulance = %id, "status change ignored: no such ambulance");
            return Ok(None);
        };

        let from = self.ambulances[index].status;
        if self.policy.enforce_transitions && !from.can_transition_to(status) {
            tracing::warn!(ambulance = %id, %from, to = %status, "fleet transition rejected");
            return Err(DeskError::InvalidFleetTransition {
                id: id.clone(),
                from,
                to: status,
            });
        }

        let ambulance = &mut self.ambulances[index];
        ambulance.status = status;
        ambulance.last_seen = Timestamp::now();
        let call_sign = ambulance.call_sign.clone();
        tracing::info!(ambulance = %id, %from, to = %status, "ambulance status changed");

        let severity = if status == AmbulanceStatus::Unavailable {
            Severity::Destructive
        } else {
            Severity::Info
        };
        self.notify(Notification {
            title: "Ambulance Updated".into(),
            message: format!("{call_sign} ({id}) is now {status}."),
            severity,
        });
        self.append_log(
            LogCategory::System,
            format!("Ambulance {id} status changed from {from} to {status}."),
        );

        Ok(Some(&self.ambulances[index]))
    }
}
