// libs/appointment-cell/src/services/store.rs
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError, AppointmentStatus};

/// Persistence seam for appointments.
///
/// Appointments are inserted once and then mutated only through
/// `compare_and_update`, which re-checks the stored status against the one
/// the caller read before committing. Records are never deleted; terminal
/// appointments are retained for history.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, appointment: Appointment) -> Result<(), AppointmentError>;

    async fn get(&self, id: Uuid) -> Result<Appointment, AppointmentError>;

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>, AppointmentError>;

    async fn list_for_patient(&self, patient_id: Uuid)
        -> Result<Vec<Appointment>, AppointmentError>;

    /// Overwrite the stored record only if its status still equals
    /// `expected`. A mismatch fails with `ConcurrentModification` and leaves
    /// the stored record untouched; the caller retries by refetching.
    async fn compare_and_update(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        updated: Appointment,
    ) -> Result<Appointment, AppointmentError>;
}

/// In-memory store used by tests and single-process deployments.
pub struct InMemoryAppointmentStore {
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self {
            appointments: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryAppointmentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn insert(&self, appointment: Appointment) -> Result<(), AppointmentError> {
        debug!("Storing appointment {}", appointment.id);
        let mut appointments = self.appointments.write().await;
        appointments.insert(appointment.id, appointment);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Appointment, AppointmentError> {
        let appointments = self.appointments.read().await;
        appointments.get(&id).cloned().ok_or(AppointmentError::NotFound)
    }

    async fn list_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self.appointments.read().await;
        let mut result: Vec<Appointment> = appointments
            .values()
            .filter(|apt| apt.doctor_id == doctor_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));
        Ok(result)
    }

    async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let appointments = self.appointments.read().await;
        let mut result: Vec<Appointment> = appointments
            .values()
            .filter(|apt| apt.patient_id == patient_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));
        Ok(result)
    }

    async fn compare_and_update(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        updated: Appointment,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointments = self.appointments.write().await;
        let current = appointments.get(&id).ok_or(AppointmentError::NotFound)?;

        if current.status != expected {
            return Err(AppointmentError::ConcurrentModification {
                expected,
                found: current.status,
            });
        }

        appointments.insert(id, updated.clone());
        debug!("Appointment {} updated to {}", id, updated.status);
        Ok(updated)
    }
}
