// libs/appointment-cell/src/services/booking.rs
use chrono::{NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::models::Doctor;
use doctor_cell::services::AvailabilityService;
use shared_models::UserRole;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, BookAppointmentRequest,
};
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::store::AppointmentStore;

pub struct AppointmentBookingService {
    store: Arc<dyn AppointmentStore>,
    availability_service: AvailabilityService,
    lifecycle_service: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self {
            store,
            availability_service: AvailabilityService::new(),
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    /// Book a new appointment in `Pending` status on one of the doctor's
    /// open slots.
    ///
    /// The requested (date, time) must fall inside the computed booking
    /// window and must not already hold a pending or confirmed appointment
    /// with this doctor.
    pub async fn book_appointment(
        &self,
        doctor: &Doctor,
        request: BookAppointmentRequest,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        debug!(
            "Booking request for doctor {} on {} at {}",
            doctor.id, request.date, request.time
        );

        if !doctor.is_active {
            return Err(AppointmentError::DoctorNotAvailable);
        }

        if request.reason.trim().is_empty() {
            return Err(AppointmentError::ValidationError(
                "Reason for visit is required".to_string(),
            ));
        }

        if !self
            .availability_service
            .is_slot_available(doctor, today, request.date, request.time)
        {
            warn!(
                "Requested slot {} {} is outside doctor {}'s availability",
                request.date, request.time, doctor.id
            );
            return Err(AppointmentError::SlotNotAvailable);
        }

        self.check_slot_not_taken(doctor.id, request.date, request.time)
            .await?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            doctor_id: doctor.id,
            patient_name: request.patient_name,
            doctor_name: doctor.full_name.clone(),
            doctor_specialization: doctor.specialization.clone(),
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Pending,
            reason: request.reason,
            created_at: Utc::now(),
        };

        self.store.insert(appointment.clone()).await?;
        info!(
            "Appointment {} booked for doctor {} on {} at {}",
            appointment.id, doctor.id, appointment.date, appointment.time
        );

        Ok(appointment)
    }

    /// Move an appointment through the state machine and persist the result.
    ///
    /// The stored status is re-checked at commit time; a transition raced by
    /// another actor surfaces as `ConcurrentModification` and the caller
    /// retries by refetching.
    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        target: AppointmentStatus,
        role: UserRole,
        today: NaiveDate,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self.store.get(appointment_id).await?;

        let updated = self
            .lifecycle_service
            .apply_transition(&appointment, target, role, today)?;

        let committed = self
            .store
            .compare_and_update(appointment_id, appointment.status, updated)
            .await?;

        info!(
            "Appointment {} moved from {} to {} by {}",
            appointment_id, appointment.status, committed.status, role
        );
        Ok(committed)
    }

    /// A doctor's appointments, optionally narrowed to one status. The list
    /// pages filter by status client-side in exactly this shape.
    pub async fn appointments_for_doctor(
        &self,
        doctor_id: Uuid,
        status_filter: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut appointments = self.store.list_for_doctor(doctor_id).await?;
        if let Some(status) = status_filter {
            appointments.retain(|apt| apt.status == status);
        }
        Ok(appointments)
    }

    /// A patient's appointments, optionally narrowed to one status.
    pub async fn appointments_for_patient(
        &self,
        patient_id: Uuid,
        status_filter: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut appointments = self.store.list_for_patient(patient_id).await?;
        if let Some(status) = status_filter {
            appointments.retain(|apt| apt.status == status);
        }
        Ok(appointments)
    }

    /// Reject a booking when the slot already holds a live appointment.
    /// Rejected and cancelled appointments release their slot.
    async fn check_slot_not_taken(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<(), AppointmentError> {
        let existing = self.store.list_for_doctor(doctor_id).await?;

        let taken = existing.iter().any(|apt| {
            apt.date == date
                && apt.time == time
                && matches!(
                    apt.status,
                    AppointmentStatus::Pending | AppointmentStatus::Confirmed
                )
        });

        if taken {
            warn!(
                "Slot {} {} for doctor {} already has a live appointment",
                date, time, doctor_id
            );
            return Err(AppointmentError::SlotNotAvailable);
        }

        Ok(())
    }
}
