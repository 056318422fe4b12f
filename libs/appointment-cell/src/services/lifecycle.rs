// libs/appointment-cell/src/services/lifecycle.rs
use chrono::NaiveDate;
use tracing::{debug, warn};

use shared_models::UserRole;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};

/// The appointment state machine.
///
/// Pure: callers pass "today" explicitly and persist the returned record
/// themselves, re-checking the stored status before committing.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// All statuses the given actor may move an appointment to from
    /// `current`. Terminal statuses allow nothing, for every role.
    pub fn valid_transitions(
        &self,
        current: AppointmentStatus,
        role: UserRole,
    ) -> Vec<AppointmentStatus> {
        match (current, role) {
            (AppointmentStatus::Pending, UserRole::Doctor) => vec![
                AppointmentStatus::Confirmed,
                AppointmentStatus::Rejected,
            ],
            (AppointmentStatus::Pending, UserRole::Patient) => vec![
                AppointmentStatus::Cancelled,
            ],
            (AppointmentStatus::Pending, UserRole::Admin) => vec![
                AppointmentStatus::Confirmed,
                AppointmentStatus::Rejected,
                AppointmentStatus::Cancelled,
            ],
            (AppointmentStatus::Confirmed, UserRole::Doctor) => vec![
                AppointmentStatus::Completed,
            ],
            (AppointmentStatus::Confirmed, UserRole::Patient) => vec![
                AppointmentStatus::Cancelled,
            ],
            (AppointmentStatus::Confirmed, UserRole::Admin) => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            // Terminal states - no transitions allowed
            (AppointmentStatus::Rejected, _)
            | (AppointmentStatus::Cancelled, _)
            | (AppointmentStatus::Completed, _) => vec![],
        }
    }

    /// Validate that `role` may move an appointment on `appointment_date`
    /// from `current` to `target`.
    ///
    /// Completion is additionally date-gated: an appointment whose date is
    /// still in the future relative to `today` cannot be completed by any
    /// role. Re-requesting the current status is never a no-op success.
    pub fn validate_transition(
        &self,
        current: AppointmentStatus,
        target: AppointmentStatus,
        role: UserRole,
        appointment_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), AppointmentError> {
        debug!(
            "Validating status transition {} -> {} by {}",
            current, target, role
        );

        if !self.valid_transitions(current, role).contains(&target) {
            warn!(
                "Invalid status transition attempted by {}: {} -> {}",
                role, current, target
            );
            return Err(AppointmentError::InvalidTransition {
                from: current,
                to: target,
                role,
            });
        }

        if target == AppointmentStatus::Completed && appointment_date > today {
            warn!(
                "Attempt to complete future appointment dated {} (today {})",
                appointment_date, today
            );
            return Err(AppointmentError::InvalidTransition {
                from: current,
                to: target,
                role,
            });
        }

        Ok(())
    }

    /// Apply a validated transition, returning a copy of the appointment
    /// with only the status overwritten. Persisting the result (and guarding
    /// against a concurrent status change) is the caller's responsibility.
    pub fn apply_transition(
        &self,
        appointment: &Appointment,
        target: AppointmentStatus,
        role: UserRole,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        self.validate_transition(appointment.status, target, role, appointment.date, today)?;

        debug!(
            "Appointment {} transitioning {} -> {} by {}",
            appointment.id, appointment.status, target, role
        );

        let mut updated = appointment.clone();
        updated.status = target;
        Ok(updated)
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
