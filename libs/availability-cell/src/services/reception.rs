use std::collections::BTreeMap;

use tracing::warn;

use crate::calendar::{parse_time_of_day, Weekday};
use crate::models::{AvailabilityError, ReceptionHourRecord, ReceptionWindow};

/// A vet's recurring reception windows, grouped by weekday and sorted by start time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    by_weekday: BTreeMap<Weekday, Vec<ReceptionWindow>>,
}

impl WeeklySchedule {
    /// Windows for `weekday` in ascending start order; empty when the vet does not receive that day.
    pub fn windows_for(&self, weekday: Weekday) -> &[ReceptionWindow] {
        self.by_weekday
            .get(&weekday)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.by_weekday.values().all(Vec::is_empty)
    }

    pub fn window_count(&self) -> usize {
        self.by_weekday.values().map(Vec::len).sum()
    }
}

/// Group raw windows by weekday. Overlaps are not merged; windows are kept as given, sorted by start.
pub fn group_windows_by_weekday(windows: &[ReceptionWindow]) -> WeeklySchedule {
    let mut by_weekday: BTreeMap<Weekday, Vec<ReceptionWindow>> = BTreeMap::new();

    for window in windows {
        by_weekday.entry(window.weekday).or_default().push(*window);
    }

    for day_windows in by_weekday.values_mut() {
        day_windows.sort_by_key(|window| window.start_time);
    }

    WeeklySchedule { by_weekday }
}

pub fn window_from_record(record: &ReceptionHourRecord) -> Result<ReceptionWindow, AvailabilityError> {
    let weekday = Weekday::from_iso_index(record.day_of_week)?;
    let start_time = parse_time_of_day(&record.hour_from)?;
    let end_time = parse_time_of_day(&record.hour_to)?;

    Ok(ReceptionWindow::new(weekday, start_time, end_time))
}

/// Convert stored rows into windows, skipping (and logging) any row that cannot be read.
pub fn windows_from_records(records: &[ReceptionHourRecord]) -> Vec<ReceptionWindow> {
    records
        .iter()
        .filter_map(|record| match window_from_record(record) {
            Ok(window) => Some(window),
            Err(e) => {
                warn!("Skipping reception hour {:?}: {}", record.id, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveTime;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record(day_of_week: i32, from: &str, to: &str) -> ReceptionHourRecord {
        ReceptionHourRecord {
            id: None,
            day_of_week,
            hour_from: from.to_string(),
            hour_to: to.to_string(),
        }
    }

    #[test]
    fn groups_and_sorts_windows_per_weekday() {
        let windows = vec![
            ReceptionWindow::new(Weekday::Monday, time(14, 0), time(18, 0)),
            ReceptionWindow::new(Weekday::Friday, time(8, 0), time(12, 0)),
            ReceptionWindow::new(Weekday::Monday, time(9, 0), time(13, 0)),
        ];

        let schedule = group_windows_by_weekday(&windows);

        let monday = schedule.windows_for(Weekday::Monday);
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].start_time, time(9, 0));
        assert_eq!(monday[1].start_time, time(14, 0));
        assert_eq!(schedule.windows_for(Weekday::Friday).len(), 1);
        assert_eq!(schedule.window_count(), 3);
    }

    #[test]
    fn weekday_without_windows_is_empty_group() {
        let schedule = group_windows_by_weekday(&[]);
        assert!(schedule.windows_for(Weekday::Sunday).is_empty());
        assert!(schedule.is_empty());
    }

    #[test]
    fn overlapping_windows_are_not_merged() {
        let windows = vec![
            ReceptionWindow::new(Weekday::Tuesday, time(10, 0), time(12, 0)),
            ReceptionWindow::new(Weekday::Tuesday, time(9, 0), time(11, 0)),
        ];
        let schedule = group_windows_by_weekday(&windows);
        assert_eq!(schedule.windows_for(Weekday::Tuesday).len(), 2);
    }

    #[test]
    fn record_uses_iso_weekday_tag() {
        let window = window_from_record(&record(7, "10:00", "12:00:00")).unwrap();
        assert_eq!(window.weekday, Weekday::Sunday);
        assert_eq!(window.end_time, time(12, 0));
    }

    #[test]
    fn bad_record_is_rejected() {
        assert_matches!(
            window_from_record(&record(1, "nine", "12:00")),
            Err(AvailabilityError::MalformedTime(_))
        );
        assert_matches!(
            window_from_record(&record(0, "09:00", "12:00")),
            Err(AvailabilityError::InvalidWeekday(0))
        );
    }

    #[test]
    fn bad_records_are_skipped_not_fatal() {
        let records = vec![
            record(1, "09:00", "13:00"),
            record(1, "9h", "13:00"),
            record(9, "09:00", "13:00"),
            record(3, "14:00", "00:00"),
        ];

        let windows = windows_from_records(&records);

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].weekday, Weekday::Monday);
        assert_eq!(windows[1].weekday, Weekday::Wednesday);
    }
}
