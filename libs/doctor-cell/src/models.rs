// libs/doctor-cell/src/models.rs
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Day-of-week names as the portal stores them ("Monday", "Tuesday", ...).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }

    /// Weekends are never bookable. Fixed clinic policy, not configurable.
    pub fn is_weekend(&self) -> bool {
        matches!(self, DayOfWeek::Saturday | DayOfWeek::Sunday)
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        };
        write!(f, "{}", name)
    }
}

/// One recurring availability window in a doctor's weekly schedule.
///
/// `start_time < end_time` is expected; a slot violating that simply
/// contributes no candidate times (weekly-slot data is validated at the
/// admin boundary before it reaches this cell).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklySlot {
    pub day: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub full_name: String,
    pub specialization: String,
    pub years_experience: i32,
    /// Order irrelevant; zero or more slots per day, overlaps permitted.
    pub weekly_slots: Vec<WeeklySlot>,
    /// Calendar dates on which no slot is offered regardless of the
    /// weekly schedule.
    pub leave_days: Vec<NaiveDate>,
    pub is_active: bool,
}

impl Doctor {
    pub fn is_on_leave(&self, date: NaiveDate) -> bool {
        self.leave_days.contains(&date)
    }
}

/// One bookable (date, time) pair. Computed fresh per query, never persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct CandidateSlot {
    pub date: NaiveDate,
    pub time: NaiveTime,
}
