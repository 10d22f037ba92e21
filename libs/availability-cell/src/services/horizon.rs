use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Utc};

use crate::models::{AvailabilityError, AvailabilityFilter};

/// Number of days after today covered by [`AvailabilityFilter::WithinThreeDays`].
pub const WITHIN_DAYS_SPAN: i64 = 3;

/// The latest instant a slot may start at, `horizon_months` calendar months after `now`.
pub fn horizon_end(now: DateTime<Utc>, horizon_months: u32) -> DateTime<Utc> {
    now.checked_add_months(Months::new(horizon_months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn days_through(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    first.iter_days().take_while(|day| *day <= last).collect()
}

/// Every day from today through the horizon's date.
pub fn rolling_days(now: DateTime<Utc>, horizon: DateTime<Utc>) -> Vec<NaiveDate> {
    days_through(now.date_naive(), horizon.date_naive())
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Days of a requested month, given zero-based (`0` = January).
///
/// With no month the rolling horizon is used. The current month starts today; any other month
/// refers to its next occurrence and starts on the 1st. Days past the horizon are cut off.
pub fn month_days(
    now: DateTime<Utc>,
    month: Option<u32>,
    horizon: DateTime<Utc>,
) -> Result<Vec<NaiveDate>, AvailabilityError> {
    let Some(month) = month else {
        return Ok(rolling_days(now, horizon));
    };
    if month > 11 {
        return Err(AvailabilityError::InvalidMonth(month));
    }

    let today = now.date_naive();
    let target_month = month + 1;
    let (year, first) = if target_month == today.month() {
        (today.year(), Some(today))
    } else if target_month > today.month() {
        (today.year(), NaiveDate::from_ymd_opt(today.year(), target_month, 1))
    } else {
        (today.year() + 1, NaiveDate::from_ymd_opt(today.year() + 1, target_month, 1))
    };

    let (Some(first), Some(month_end)) = (first, last_day_of_month(year, target_month)) else {
        return Ok(Vec::new());
    };
    let last = month_end.min(horizon.date_naive());

    Ok(days_through(first, last))
}

/// Days selected by an existence filter.
pub fn filter_days(
    now: DateTime<Utc>,
    filter: AvailabilityFilter,
    horizon: DateTime<Utc>,
) -> Vec<NaiveDate> {
    let today = now.date_naive();
    match filter {
        AvailabilityFilter::Today => days_through(today, today.min(horizon.date_naive())),
        AvailabilityFilter::WithinThreeDays => {
            let last = (today + Duration::days(WITHIN_DAYS_SPAN)).min(horizon.date_naive());
            days_through(today + Duration::days(1), last)
        }
        AvailabilityFilter::Whenever => rolling_days(now, horizon),
    }
}
