//! Request lifecycle: intake, status and assignment edits, cancellation.

use jiff::Timestamp;

use crate::model::{
    AmbulanceId, EmergencyRequest, LogCategory, NewRequest, Notification, RequestId,
    RequestStatus, RequestUpdate, Severity,
};

use super::{Desk, DeskError, Result};

/// Appended to existing notes when a request is cancelled.
pub const CANCELLED_MARKER: &str = "(Auto-cancelled)";

/// Notes for a cancelled request that had none.
pub const CANCELLED_BY_SYSTEM: &str = "Request cancelled by system.";

const REQUEST_ID_PREFIX: &str = "EMR";

impl Desk {
    /// Looks up a request by id.
    pub fn request(&self, id: &RequestId) -> Option<&EmergencyRequest> {
        self.requests.iter().find(|r| &r.id == id)
    }

    /// Takes in a new request: `Pending`, stamped now, placed first.
    pub fn create_request(&mut self, new: NewRequest) -> &EmergencyRequest {
        let id = self.next_request_id();
        let request = EmergencyRequest {
            id: id.clone(),
            location: new.location,
            time: Timestamp::now(),
            kind: new.kind,
            status: RequestStatus::Pending,
            patient_name: new.patient_name,
            notes: new.notes,
            ambulance_id: None,
        };
        tracing::info!(
            request = %id,
            kind = %request.kind,
            location = %request.location,
            "request received"
        );

        self.notify(Notification {
            title: "New Emergency Request!".into(),
            message: format!("Request {id} received from {}.", request.location),
            severity: Severity::Info,
        });
        self.append_log(
            LogCategory::Emergency,
            format!("New emergency request {id} received."),
        );

        self.requests.insert(0, request);
        &self.requests[0]
    }

    /// Replaces a request's status and ambulance assignment.
    ///
    /// Returns `Ok(None)` without touching anything if `id` is unknown.
    /// Every other field is left as it was.
    pub fn update_request(
        &mut self,
        id: &RequestId,
        update: RequestUpdate,
    ) -> Result<Option<&EmergencyRequest>> {
        let Some(index) = self.request_index(id) else {
            tracing::debug!(request = %id, "update ignored: no such request");
            return Ok(None);
        };

        let from = self.requests[index].status;
        if self.policy.enforce_transitions && !from.can_transition_to(update.status) {
            tracing::warn!(request = %id, %from, to = %update.status, "transition rejected");
            return Err(DeskError::InvalidTransition {
                id: id.clone(),
                from,
                to: update.status,
            });
        }
        if self.policy.validate_assignments
            && let Some(ambulance) = &update.ambulance_id
        {
            self.check_assignment(id, ambulance, update.status)?;
        }

        let request = &mut self.requests[index];
        request.status = update.status;
        request.ambulance_id = update.ambulance_id;
        tracing::info!(
            request = %id,
            %from,
            to = %request.status,
            ambulance = request.ambulance_id.as_ref().map_or("-", AmbulanceId::as_str),
            "request updated"
        );

        self.notify(Notification {
            title: "Request Updated".into(),
            message: format!("Request {id} has been updated."),
            severity: Severity::Info,
        });
        self.append_log(
            LogCategory::UserAction,
            format!("User '{}' updated request {id}.", self.operator),
        );

        Ok(Some(&self.requests[index]))
    }

    /// Cancels a request and marks its notes.
    ///
    /// Cancelling an already-cancelled request changes nothing and raises no
    /// notification. Returns `Ok(None)` if `id` is unknown.
    pub fn cancel_request(&mut self, id: &RequestId) -> Result<Option<&EmergencyRequest>> {
        let Some(index) = self.request_index(id) else {
            tracing::debug!(request = %id, "cancel ignored: no such request");
            return Ok(None);
        };

        let from = self.requests[index].status;
        if from == RequestStatus::Cancelled {
            return Ok(Some(&self.requests[index]));
        }
        if self.policy.enforce_transitions && !from.can_transition_to(RequestStatus::Cancelled) {
            tracing::warn!(request = %id, %from, "cancellation rejected");
            return Err(DeskError::InvalidTransition {
                id: id.clone(),
                from,
                to: RequestStatus::Cancelled,
            });
        }

        let request = &mut self.requests[index];
        request.status = RequestStatus::Cancelled;
        request.notes = Some(match request.notes.take() {
            Some(notes) => format!("{notes} {CANCELLED_MARKER}"),
            None => CANCELLED_BY_SYSTEM.to_string(),
        });
        tracing::info!(request = %id, %from, "request cancelled");

        self.notify(Notification {
            title: "Request Cancelled".into(),
            message: format!("Request {id} has been cancelled."),
            severity: Severity::Destructive,
        });
        self.append_log(
            LogCategory::UserAction,
            format!("User '{}' cancelled request {id}.", self.operator),
        );

        Ok(Some(&self.requests[index]))
    }

    fn request_index(&self, id: &RequestId) -> Option<usize> {
        self.requests.iter().position(|r| &r.id == id)
    }

    /// Next free `EMR###` id.
    ///
    /// Counts up from the last id handed out, skipping any already in the store.
    fn next_request_id(&mut self) -> RequestId {
        loop {
            self.request_counter += 1;
            let id = RequestId(format!("{REQUEST_ID_PREFIX}{:03}", self.request_counter));
            if self.request(&id).is_none() {
                return id;
            }
        }
    }

    /// An assignment must name a fleet unit. A request that stays live also
    /// needs the unit to be free of every other live request.
    fn check_assignment(
        &self,
        id: &RequestId,
        ambulance: &AmbulanceId,
        status: RequestStatus,
    ) -> Result<()> {
        if self.ambulance(ambulance).is_none() {
            tracing::warn!(request = %id, %ambulance, "assignment rejected: unknown ambulance");
            return Err(DeskError::UnknownAmbulance(ambulance.clone()));
        }
        if status.is_terminal() {
            return Ok(());
        }
        let holder = self.requests.iter().find(|r| {
            &r.id != id && r.is_ongoing() && r.ambulance_id.as_ref() == Some(ambulance)
        });
        if let Some(holder) = holder {
            tracing::warn!(
                request = %id,
                %ambulance,
                holder = %holder.id,
                "assignment rejected: ambulance busy"
            );
            return Err(DeskError::AmbulanceBusy {
                ambulance: ambulance.clone(),
                request: holder.id.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use crate::desk::Policy;
    use crate::desk::tests::test_desk;
    use crate::model::EmergencyType;
    use crate::seed::Seed;

    fn new_request(location: &str) -> NewRequest {
        NewRequest {
            location: location.into(),
            kind: EmergencyType::Accident,
            patient_name: Some("New Patient".into()),
            notes: Some("This is a simulated request.".into()),
        }
    }

    fn desk_with(requests: Vec<EmergencyRequest>, policy: Policy) -> Desk {
        let seed = Seed {
            requests,
            ..Seed::builtin()
        };
        Desk::new(seed, policy, "dispatcher01")
    }

    fn bare_request(id: &str, status: RequestStatus) -> EmergencyRequest {
        EmergencyRequest {
            id: RequestId::from(id),
            location: "1 Test St".into(),
            time: crate::seed::REFERENCE_TIME,
            kind: EmergencyType::Other,
            status,
            patient_name: None,
            notes: None,
            ambulance_id: None,
        }
    }

    fn update(status: RequestStatus, ambulance: Option<&str>) -> RequestUpdate {
        RequestUpdate {
            status,
            ambulance_id: ambulance.map(AmbulanceId::from),
        }
    }

    // ── create ──

    #[test]
    fn create_is_pending_and_first() {
        let mut desk = test_desk(Policy::default());
        let before = desk.requests().len();

        let id = desk.create_request(new_request("Random Street")).id.clone();

        assert_eq!(desk.requests().len(), before + 1);
        let first = &desk.requests()[0];
        assert_eq!(first.id, id);
        assert_eq!(first.status, RequestStatus::Pending);
        assert_eq!(first.location, "Random Street");
        assert!(first.ambulance_id.is_none());
    }

    #[test]
    fn create_never_collides_with_existing_ids() {
        let mut desk = test_desk(Policy::default());
        for i in 0..20 {
            let existing: HashSet<RequestId> =
                desk.requests().iter().map(|r| r.id.clone()).collect();
            let id = desk.create_request(new_request(&format!("{i} Main St"))).id.clone();
            assert!(!existing.contains(&id), "{id} reused");
        }
    }

    #[test]
    fn create_skips_ids_already_in_store() {
        // Two records, so a length-derived id would be EMR003 and collide.
        let mut desk = desk_with(
            vec![
                bare_request("EMR003", RequestStatus::Pending),
                bare_request("EMR001", RequestStatus::Cancelled),
            ],
            Policy::default(),
        );

        let first = desk.create_request(new_request("x")).id.clone();
        let second = desk.create_request(new_request("y")).id.clone();
        assert_eq!(first, RequestId::from("EMR002"));
        assert_eq!(second, RequestId::from("EMR004"));
    }

    #[test]
    fn create_notifies_and_logs() {
        let mut desk = test_desk(Policy::default());
        let logs_before = desk.logs().len();
        let id = desk.create_request(new_request("Random Street")).id.clone();

        let notes = desk.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "New Emergency Request!");
        assert_eq!(
            notes[0].message,
            format!("Request {id} received from Random Street.")
        );

        assert_eq!(desk.logs().len(), logs_before + 1);
        let last = desk.logs().last().unwrap();
        assert_eq!(last.category, LogCategory::Emergency);
        assert_eq!(last.description, format!("New emergency request {id} received."));
    }

    // ── update ──

    #[test]
    fn update_changes_only_status_and_assignment() {
        let mut desk = test_desk(Policy::default());
        let id = RequestId::from("EMR001");
        let before = desk.request(&id).unwrap().clone();

        let after = desk
            .update_request(&id, update(RequestStatus::Dispatched, Some("AMB001")))
            .unwrap()
            .unwrap()
            .clone();

        assert_eq!(after.status, RequestStatus::Dispatched);
        assert_eq!(after.ambulance_id, Some(AmbulanceId::from("AMB001")));
        assert_eq!(
            EmergencyRequest {
                status: before.status,
                ambulance_id: before.ambulance_id.clone(),
                ..after
            },
            before
        );
    }

    #[test]
    fn update_with_no_ambulance_clears_assignment() {
        let mut desk = test_desk(Policy::default());
        let id = RequestId::from("EMR002");

        let after = desk
            .update_request(&id, update(RequestStatus::Dispatched, None))
            .unwrap()
            .unwrap();
        assert!(after.ambulance_id.is_none());
    }

    #[test]
    fn update_unknown_id_is_silent_noop() {
        let mut desk = test_desk(Policy::strict());
        let before = desk.requests().to_vec();
        let logs_before = desk.logs().len();

        let result = desk
            .update_request(&RequestId::from("EMR999"), update(RequestStatus::Resolved, None))
            .unwrap();

        assert!(result.is_none());
        assert_eq!(desk.requests(), before.as_slice());
        assert_eq!(desk.logs().len(), logs_before);
        assert!(desk.take_notifications().is_empty());
    }

    #[test]
    fn permissive_update_allows_backwards_moves() {
        let mut desk = test_desk(Policy::default());
        let id = RequestId::from("EMR005");

        let after = desk
            .update_request(&id, update(RequestStatus::Pending, None))
            .unwrap()
            .unwrap();
        assert_eq!(after.status, RequestStatus::Pending);
    }

    #[test]
    fn permissive_update_accepts_unknown_ambulance() {
        let mut desk = test_desk(Policy::default());
        let after = desk
            .update_request(
                &RequestId::from("EMR001"),
                update(RequestStatus::Dispatched, Some("AMB999")),
            )
            .unwrap()
            .unwrap();
        assert_eq!(after.ambulance_id, Some(AmbulanceId::from("AMB999")));
    }

    #[test]
    fn enforced_update_rejects_backwards_moves() {
        let mut desk = test_desk(Policy::strict());
        let id = RequestId::from("EMR005");

        let err = desk
            .update_request(&id, update(RequestStatus::Pending, None))
            .unwrap_err();

        assert!(matches!(
            err,
            DeskError::InvalidTransition {
                from: RequestStatus::Resolved,
                to: RequestStatus::Pending,
                ..
            }
        ));
        assert_eq!(desk.request(&id).unwrap().status, RequestStatus::Resolved);
        assert!(desk.take_notifications().is_empty());
    }

    #[test]
    fn enforced_update_follows_forward_path() {
        let mut desk = test_desk(Policy {
            enforce_transitions: true,
            validate_assignments: false,
        });
        let id = RequestId::from("EMR001");

        for status in [
            RequestStatus::Dispatched,
            RequestStatus::OnSite,
            RequestStatus::Transporting,
            RequestStatus::Resolved,
        ] {
            let after = desk
                .update_request(&id, update(status, Some("AMB001")))
                .unwrap()
                .unwrap();
            assert_eq!(after.status, status);
        }
    }

    #[test]
    fn validated_update_rejects_unknown_ambulance() {
        let mut desk = test_desk(Policy::strict());
        let err = desk
            .update_request(
                &RequestId::from("EMR001"),
                update(RequestStatus::Dispatched, Some("AMB999")),
            )
            .unwrap_err();
        assert!(matches!(err, DeskError::UnknownAmbulance(_)));
    }

    #[test]
    fn validated_update_rejects_busy_ambulance() {
        let mut desk = test_desk(Policy::strict());
        // EMR002 (Dispatched) already holds AMB001.
        let err = desk
            .update_request(
                &RequestId::from("EMR001"),
                update(RequestStatus::Dispatched, Some("AMB001")),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DeskError::AmbulanceBusy { ref request, .. } if request == &RequestId::from("EMR002")
        ));
    }

    #[test]
    fn validated_update_allows_ambulance_freed_by_resolution() {
        let mut desk = test_desk(Policy::strict());
        // EMR002 keeps its own unit. Resolved EMR005 also lists AMB001 but no longer holds it.
        desk.update_request(
            &RequestId::from("EMR002"),
            update(RequestStatus::OnSite, Some("AMB001")),
        )
        .unwrap()
        .unwrap();
    }

    #[test]
    fn validated_update_of_closed_request_keeps_its_unit() {
        let mut desk = test_desk(Policy::strict());
        // EMR002 holds AMB001 live, but a resolved request only records it.
        let request = desk
            .update_request(
                &RequestId::from("EMR005"),
                update(RequestStatus::Resolved, Some("AMB001")),
            )
            .unwrap()
            .unwrap();
        assert_eq!(request.ambulance_id, Some(AmbulanceId::from("AMB001")));

        let err = desk
            .update_request(
                &RequestId::from("EMR005"),
                update(RequestStatus::Resolved, Some("AMB999")),
            )
            .unwrap_err();
        assert!(matches!(err, DeskError::UnknownAmbulance(_)));
    }

    #[test]
    fn update_logs_operator() {
        let mut desk = test_desk(Policy::default());
        desk.update_request(
            &RequestId::from("EMR001"),
            update(RequestStatus::Dispatched, Some("AMB001")),
        )
        .unwrap();

        let last = desk.logs().last().unwrap();
        assert_eq!(last.category, LogCategory::UserAction);
        assert_eq!(
            last.description,
            "User 'dispatcher01' updated request EMR001."
        );
    }

    // ── cancel ──

    #[test]
    fn cancel_pending_request_marks_notes() {
        let mut desk = desk_with(
            vec![EmergencyRequest {
                notes: Some("Possible head injury.".into()),
                ..bare_request("EMR001", RequestStatus::Pending)
            }],
            Policy::default(),
        );

        let after = desk
            .cancel_request(&RequestId::from("EMR001"))
            .unwrap()
            .unwrap();

        assert_eq!(after.status, RequestStatus::Cancelled);
        let notes = after.notes.as_deref().unwrap();
        assert!(notes.contains(CANCELLED_MARKER));
        assert!(notes.starts_with("Possible head injury."));
    }

    #[test]
    fn cancel_without_notes_creates_them() {
        let mut desk = desk_with(
            vec![bare_request("EMR001", RequestStatus::Dispatched)],
            Policy::default(),
        );

        let after = desk
            .cancel_request(&RequestId::from("EMR001"))
            .unwrap()
            .unwrap();
        assert_eq!(after.notes.as_deref(), Some(CANCELLED_BY_SYSTEM));
    }

    #[test]
    fn cancel_twice_has_single_effect() {
        let mut desk = test_desk(Policy::default());
        let id = RequestId::from("EMR001");

        let once = desk.cancel_request(&id).unwrap().unwrap().clone();
        let logs_after_once = desk.logs().len();
        desk.take_notifications();

        let twice = desk.cancel_request(&id).unwrap().unwrap().clone();

        assert_eq!(once, twice);
        assert_eq!(twice.notes.unwrap().matches(CANCELLED_MARKER).count(), 1);
        assert_eq!(desk.logs().len(), logs_after_once);
        assert!(desk.take_notifications().is_empty());
    }

    #[test]
    fn cancel_unknown_id_is_silent_noop() {
        let mut desk = test_desk(Policy::default());
        let result = desk.cancel_request(&RequestId::from("EMR999")).unwrap();
        assert!(result.is_none());
        assert!(desk.take_notifications().is_empty());
    }

    #[test]
    fn permissive_cancel_of_resolved_request_is_allowed() {
        let mut desk = test_desk(Policy::default());
        let after = desk
            .cancel_request(&RequestId::from("EMR005"))
            .unwrap()
            .unwrap();
        assert_eq!(after.status, RequestStatus::Cancelled);
    }

    #[test]
    fn enforced_cancel_of_resolved_request_is_rejected() {
        let mut desk = test_desk(Policy::strict());
        let id = RequestId::from("EMR005");
        let err = desk.cancel_request(&id).unwrap_err();

        assert!(matches!(err, DeskError::InvalidTransition { .. }));
        assert_eq!(desk.request(&id).unwrap().status, RequestStatus::Resolved);
    }

    #[test]
    fn cancel_raises_destructive_notification() {
        let mut desk = test_desk(Policy::default());
        desk.cancel_request(&RequestId::from("EMR003")).unwrap();

        let notes = desk.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Request Cancelled");
        assert_eq!(notes[0].severity, Severity::Destructive);
    }
}
