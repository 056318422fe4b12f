// libs/appointment-cell/src/services/prescriptions.rs
use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, IssuePrescriptionRequest, Prescription,
};

/// Issues prescriptions against completed appointments.
///
/// Completion gates the capability; the state machine itself never creates
/// prescriptions. Persistence of the returned record is the caller's job.
pub struct PrescriptionService;

impl PrescriptionService {
    pub fn new() -> Self {
        Self
    }

    pub fn issue(
        &self,
        appointment: &Appointment,
        request: IssuePrescriptionRequest,
    ) -> Result<Prescription, AppointmentError> {
        debug!("Issuing prescription for appointment {}", appointment.id);

        if appointment.status != AppointmentStatus::Completed {
            warn!(
                "Prescription refused for appointment {} in status {}",
                appointment.id, appointment.status
            );
            return Err(AppointmentError::PrescriptionNotAllowed(appointment.status));
        }

        if request.medications.trim().is_empty() {
            return Err(AppointmentError::ValidationError(
                "Medications are required".to_string(),
            ));
        }

        Ok(Prescription {
            id: Uuid::new_v4(),
            appointment_id: appointment.id,
            patient_id: appointment.patient_id,
            doctor_id: appointment.doctor_id,
            patient_name: appointment.patient_name.clone(),
            doctor_name: appointment.doctor_name.clone(),
            medications: request.medications,
            instructions: request.instructions,
            created_at: Utc::now(),
        })
    }
}

impl Default for PrescriptionService {
    fn default() -> Self {
        Self::new()
    }
}
