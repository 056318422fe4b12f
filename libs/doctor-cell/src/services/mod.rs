pub mod availability;

pub use availability::AvailabilityService;
pub use availability::{BOOKING_WINDOW_DAYS, SLOT_GRANULARITY_MINUTES};
