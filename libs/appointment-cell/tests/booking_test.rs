// libs/appointment-cell/tests/booking_test.rs
use assert_matches::assert_matches;
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use std::sync::Arc;
use uuid::Uuid;

use appointment_cell::models::{
    AppointmentError, AppointmentStatus, BookAppointmentRequest,
};
use appointment_cell::services::{
    AppointmentBookingService, AppointmentStore, InMemoryAppointmentStore,
};
use doctor_cell::models::{DayOfWeek, Doctor, WeeklySlot};
use shared_models::UserRole;

// ==============================================================================
// TEST FIXTURES
// ==============================================================================

struct TestSetup {
    service: AppointmentBookingService,
    store: Arc<InMemoryAppointmentStore>,
    doctor: Doctor,
    today: NaiveDate,
}

impl TestSetup {
    fn new() -> Self {
        let store = Arc::new(InMemoryAppointmentStore::new());
        let service = AppointmentBookingService::new(store.clone());

        // Saturday, so the first bookable Monday is 2025-06-16
        let today = NaiveDate::from_ymd_opt(2025, 6, 14).unwrap();
        assert_eq!(today.weekday(), Weekday::Sat);

        let doctor = Doctor {
            id: Uuid::new_v4(),
            full_name: "Dr. Sarah Chen".to_string(),
            specialization: "Cardiology".to_string(),
            years_experience: 12,
            weekly_slots: vec![WeeklySlot {
                day: DayOfWeek::Monday,
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            }],
            leave_days: vec![],
            is_active: true,
        };

        Self {
            service,
            store,
            doctor,
            today,
        }
    }

    fn request(&self) -> BookAppointmentRequest {
        BookAppointmentRequest {
            patient_id: Uuid::new_v4(),
            patient_name: "Alex Rivera".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 16).unwrap(),
            time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            reason: "Chest pain follow-up".to_string(),
        }
    }
}

// ==============================================================================
// BOOKING
// ==============================================================================

#[tokio::test]
async fn booking_an_open_slot_creates_pending_appointment() {
    let setup = TestSetup::new();
    let request = setup.request();
    let patient_id = request.patient_id;

    let appointment = setup
        .service
        .book_appointment(&setup.doctor, request, setup.today)
        .await
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.doctor_id, setup.doctor.id);
    assert_eq!(appointment.doctor_name, "Dr. Sarah Chen");
    assert_eq!(appointment.doctor_specialization, "Cardiology");

    let stored = setup.store.get(appointment.id).await.unwrap();
    assert_eq!(stored.patient_id, patient_id);
    assert_eq!(stored.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn booking_outside_availability_fails() {
    let setup = TestSetup::new();

    // Tuesday carries no weekly slot
    let mut request = setup.request();
    request.date = NaiveDate::from_ymd_opt(2025, 6, 17).unwrap();

    let result = setup
        .service
        .book_appointment(&setup.doctor, request, setup.today)
        .await;
    assert_matches!(result, Err(AppointmentError::SlotNotAvailable));

    // Right day, but 11:00 is the exclusive end of the range
    let mut request = setup.request();
    request.time = NaiveTime::from_hms_opt(11, 0, 0).unwrap();

    let result = setup
        .service
        .book_appointment(&setup.doctor, request, setup.today)
        .await;
    assert_matches!(result, Err(AppointmentError::SlotNotAvailable));
}

#[tokio::test]
async fn booking_with_inactive_doctor_fails() {
    let setup = TestSetup::new();
    let mut doctor = setup.doctor.clone();
    doctor.is_active = false;

    let result = setup
        .service
        .book_appointment(&doctor, setup.request(), setup.today)
        .await;
    assert_matches!(result, Err(AppointmentError::DoctorNotAvailable));
}

#[tokio::test]
async fn booking_requires_a_reason() {
    let setup = TestSetup::new();
    let mut request = setup.request();
    request.reason = "   ".to_string();

    let result = setup
        .service
        .book_appointment(&setup.doctor, request, setup.today)
        .await;
    assert_matches!(result, Err(AppointmentError::ValidationError(_)));
}

#[tokio::test]
async fn double_booking_the_same_slot_fails() {
    let setup = TestSetup::new();

    setup
        .service
        .book_appointment(&setup.doctor, setup.request(), setup.today)
        .await
        .unwrap();

    let result = setup
        .service
        .book_appointment(&setup.doctor, setup.request(), setup.today)
        .await;
    assert_matches!(result, Err(AppointmentError::SlotNotAvailable));
}

#[tokio::test]
async fn cancelled_slot_can_be_rebooked() {
    let setup = TestSetup::new();

    let first = setup
        .service
        .book_appointment(&setup.doctor, setup.request(), setup.today)
        .await
        .unwrap();

    setup
        .service
        .update_status(
            first.id,
            AppointmentStatus::Cancelled,
            UserRole::Patient,
            setup.today,
        )
        .await
        .unwrap();

    let second = setup
        .service
        .book_appointment(&setup.doctor, setup.request(), setup.today)
        .await
        .unwrap();
    assert_eq!(second.status, AppointmentStatus::Pending);
}

// ==============================================================================
// STATUS UPDATES THROUGH THE STORE
// ==============================================================================

#[tokio::test]
async fn confirm_then_complete_after_the_visit_date() {
    let setup = TestSetup::new();

    let appointment = setup
        .service
        .book_appointment(&setup.doctor, setup.request(), setup.today)
        .await
        .unwrap();

    let confirmed = setup
        .service
        .update_status(
            appointment.id,
            AppointmentStatus::Confirmed,
            UserRole::Doctor,
            setup.today,
        )
        .await
        .unwrap();
    assert_eq!(confirmed.status, AppointmentStatus::Confirmed);

    // Completion is date-gated until the visit day
    let premature = setup
        .service
        .update_status(
            appointment.id,
            AppointmentStatus::Completed,
            UserRole::Doctor,
            setup.today,
        )
        .await;
    assert_matches!(premature, Err(AppointmentError::InvalidTransition { .. }));

    let visit_day = appointment.date;
    let completed = setup
        .service
        .update_status(
            appointment.id,
            AppointmentStatus::Completed,
            UserRole::Doctor,
            visit_day,
        )
        .await
        .unwrap();
    assert_eq!(completed.status, AppointmentStatus::Completed);
}

#[tokio::test]
async fn update_status_on_unknown_appointment_fails() {
    let setup = TestSetup::new();

    let result = setup
        .service
        .update_status(
            Uuid::new_v4(),
            AppointmentStatus::Confirmed,
            UserRole::Doctor,
            setup.today,
        )
        .await;
    assert_matches!(result, Err(AppointmentError::NotFound));
}

// ==============================================================================
// LIST VIEWS
// ==============================================================================

#[tokio::test]
async fn list_views_filter_by_status() {
    let setup = TestSetup::new();
    let patient_id = Uuid::new_v4();

    let mut first = setup.request();
    first.patient_id = patient_id;
    let first = setup
        .service
        .book_appointment(&setup.doctor, first, setup.today)
        .await
        .unwrap();

    let mut second = setup.request();
    second.patient_id = patient_id;
    second.time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
    setup
        .service
        .book_appointment(&setup.doctor, second, setup.today)
        .await
        .unwrap();

    setup
        .service
        .update_status(
            first.id,
            AppointmentStatus::Confirmed,
            UserRole::Doctor,
            setup.today,
        )
        .await
        .unwrap();

    let all = setup
        .service
        .appointments_for_doctor(setup.doctor.id, None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let pending = setup
        .service
        .appointments_for_patient(patient_id, Some(AppointmentStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());

    let confirmed = setup
        .service
        .appointments_for_doctor(setup.doctor.id, Some(AppointmentStatus::Confirmed))
        .await
        .unwrap();
    assert_eq!(confirmed.len(), 1);
    assert_eq!(confirmed[0].id, first.id);
}
