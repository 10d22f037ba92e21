use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::AvailabilityError;

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Day of the week as used throughout the availability engine.
///
/// Stored reception hours tag their weekday with the ISO index (Monday = 1 .. Sunday = 7),
/// while weekday arithmetic on concrete dates counts from Sunday (Sunday = 0 .. Saturday = 6).
/// Both numberings go through this enum; never compare the raw integers directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Monday = 1 .. Sunday = 7.
    pub fn to_iso_index(self) -> i32 {
        match self {
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
            Weekday::Sunday => 7,
        }
    }

    pub fn from_iso_index(index: i32) -> Result<Self, AvailabilityError> {
        match index {
            1 => Ok(Weekday::Monday),
            2 => Ok(Weekday::Tuesday),
            3 => Ok(Weekday::Wednesday),
            4 => Ok(Weekday::Thursday),
            5 => Ok(Weekday::Friday),
            6 => Ok(Weekday::Saturday),
            7 => Ok(Weekday::Sunday),
            other => Err(AvailabilityError::InvalidWeekday(other)),
        }
    }

    /// Sunday = 0 .. Saturday = 6.
    pub fn to_sunday_first_index(self) -> i32 {
        match self {
            Weekday::Sunday => 0,
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }

    pub fn from_sunday_first_index(index: i32) -> Result<Self, AvailabilityError> {
        match index {
            0 => Ok(Weekday::Sunday),
            1 => Ok(Weekday::Monday),
            2 => Ok(Weekday::Tuesday),
            3 => Ok(Weekday::Wednesday),
            4 => Ok(Weekday::Thursday),
            5 => Ok(Weekday::Friday),
            6 => Ok(Weekday::Saturday),
            other => Err(AvailabilityError::InvalidWeekday(other)),
        }
    }

    pub fn of_date(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

/// Parse a stored "HH:MM" or "HH:MM:SS" time. Seconds default to zero.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime, AvailabilityError> {
    let trimmed = text.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();

    let well_formed = matches!(parts.len(), 2 | 3)
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        return Err(AvailabilityError::MalformedTime(text.to_string()));
    }

    let field = |index: usize| -> u32 {
        parts
            .get(index)
            .and_then(|part| part.parse().ok())
            .unwrap_or(0)
    };

    NaiveTime::from_hms_opt(field(0), field(1), field(2))
        .ok_or_else(|| AvailabilityError::MalformedTime(text.to_string()))
}

pub fn minutes_of_day(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

/// Minutes from `start` to `end` within one day.
///
/// An `end` of 00:00 means end of day (24:00). Returns 0 when `end` does not come after `start`.
pub fn minutes_between(start: NaiveTime, end: NaiveTime) -> i64 {
    let end_minutes = if end == NaiveTime::MIN {
        MINUTES_PER_DAY
    } else {
        minutes_of_day(end)
    };

    (end_minutes - minutes_of_day(start)).max(0)
}
