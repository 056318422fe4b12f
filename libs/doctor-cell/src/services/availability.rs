// libs/doctor-cell/src/services/availability.rs

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use tracing::debug;

use crate::models::{CandidateSlot, DayOfWeek, Doctor, WeeklySlot};

/// How far ahead of "today" the booking window extends, in calendar days.
/// Today itself is excluded: booking is always for a future day.
pub const BOOKING_WINDOW_DAYS: i64 = 14;

/// Candidate times are aligned to half-hour boundaries.
pub const SLOT_GRANULARITY_MINUTES: i64 = 30;

/// Computes bookable slots from a doctor's weekly schedule minus leave days.
///
/// Pure and deterministic: "today" is always an explicit parameter so the
/// calculator never reads the system clock.
pub struct AvailabilityService;

impl AvailabilityService {
    pub fn new() -> Self {
        Self
    }

    /// Calculate every bookable slot within `window_days` calendar days
    /// strictly after `today`, sorted ascending by (date, time).
    ///
    /// An inactive doctor yields an empty sequence, not an error. Weekends
    /// and leave days are skipped. Exact duplicate (date, time) pairs from
    /// overlapping same-day slots are collapsed to one entry.
    pub fn compute_available_slots(
        &self,
        doctor: &Doctor,
        today: NaiveDate,
        window_days: i64,
    ) -> Vec<CandidateSlot> {
        if !doctor.is_active {
            debug!("Doctor {} is inactive, no availability", doctor.id);
            return Vec::new();
        }

        let mut slots = Vec::new();

        for offset in 1..=window_days {
            let date = today + Duration::days(offset);
            let day = DayOfWeek::from_weekday(date.weekday());

            if day.is_weekend() {
                continue;
            }
            if doctor.is_on_leave(date) {
                debug!("Doctor {} on leave {}, skipping", doctor.id, date);
                continue;
            }

            for slot in doctor.weekly_slots.iter().filter(|s| s.day == day) {
                self.enumerate_slot_times(slot, date, &mut slots);
            }
        }

        slots.sort();
        slots.dedup();

        debug!(
            "Found {} available slots for doctor {} in the {} days after {}",
            slots.len(),
            doctor.id,
            window_days,
            today
        );
        slots
    }

    /// Distinct dates with at least one bookable slot, in ascending order.
    /// The booking form renders its date picker from this.
    pub fn available_dates(
        &self,
        doctor: &Doctor,
        today: NaiveDate,
        window_days: i64,
    ) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .compute_available_slots(doctor, today, window_days)
            .into_iter()
            .map(|slot| slot.date)
            .collect();
        dates.dedup();
        dates
    }

    /// Whether a requested (date, time) pair is bookable within the default
    /// window. The booking service validates every request through this.
    pub fn is_slot_available(
        &self,
        doctor: &Doctor,
        today: NaiveDate,
        date: NaiveDate,
        time: NaiveTime,
    ) -> bool {
        self.compute_available_slots(doctor, today, BOOKING_WINDOW_DAYS)
            .into_iter()
            .any(|slot| slot.date == date && slot.time == time)
    }

    /// Enumerate half-hour time points within one weekly slot on `date`.
    ///
    /// A time point is emitted only when a full granularity interval fits
    /// before `end_time`, so a dangling remainder shorter than 30 minutes is
    /// dropped and a range narrower than the granularity contributes nothing.
    /// A slot with `start_time >= end_time` contributes nothing either.
    fn enumerate_slot_times(&self, slot: &WeeklySlot, date: NaiveDate, out: &mut Vec<CandidateSlot>) {
        let granularity = Duration::minutes(SLOT_GRANULARITY_MINUTES);
        let mut current = slot.start_time;

        loop {
            let (next, wrapped) = current.overflowing_add_signed(granularity);
            if wrapped != 0 || next > slot.end_time {
                break;
            }
            out.push(CandidateSlot { date, time: current });
            current = next;
        }
    }
}

impl Default for AvailabilityService {
    fn default() -> Self {
        Self::new()
    }
}
