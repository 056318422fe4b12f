pub mod booking;
pub mod lifecycle;
pub mod prescriptions;
pub mod store;

pub use booking::AppointmentBookingService;
pub use lifecycle::AppointmentLifecycleService;
pub use prescriptions::PrescriptionService;
pub use store::{AppointmentStore, InMemoryAppointmentStore};
