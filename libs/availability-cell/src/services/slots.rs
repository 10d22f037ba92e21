use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::calendar::minutes_between;
use crate::models::ReceptionWindow;

/// Candidate start times for one window on `day`.
///
/// Slots sit on the grid `window.start + k * duration` for every whole duration that fits.
/// Nothing at or before `now` is produced. When `day` is today and the window has already
/// opened, grid points earlier than `now + grace` are dropped as well.
pub fn window_slots(
    day: NaiveDate,
    window: &ReceptionWindow,
    duration_minutes: i64,
    now: DateTime<Utc>,
    grace: Duration,
) -> Vec<DateTime<Utc>> {
    if duration_minutes <= 0 {
        return Vec::new();
    }

    let slot_count = minutes_between(window.start_time, window.end_time) / duration_minutes;
    let window_start = day.and_time(window.start_time).and_utc();

    let earliest = if day == now.date_naive() && window_start <= now {
        now + grace
    } else {
        window_start
    };

    (0..slot_count)
        .map(|k| window_start + Duration::minutes(k * duration_minutes))
        .filter(|slot| *slot > now && *slot >= earliest)
        .collect()
}

/// Candidate start times for all of a day's windows, concatenated in window order.
pub fn generate_candidate_slots(
    day: NaiveDate,
    windows: &[ReceptionWindow],
    duration_minutes: i64,
    now: DateTime<Utc>,
    grace: Duration,
) -> Vec<DateTime<Utc>> {
    windows
        .iter()
        .flat_map(|window| window_slots(day, window, duration_minutes, now, grace))
        .collect()
}
