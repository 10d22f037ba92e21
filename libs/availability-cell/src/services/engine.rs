use chrono::{DateTime, Duration, NaiveDate, Utc};

use shared_config::AvailabilitySettings;

use crate::calendar::Weekday;
use crate::models::{AvailabilityResult, ExistingAppointment, ReceptionWindow};
use crate::services::conflict::filter_available;
use crate::services::horizon::horizon_end;
use crate::services::reception::WeeklySchedule;
use crate::services::slots::{generate_candidate_slots, window_slots};

/// Everything a single availability query needs, fetched once and frozen at `now`.
///
/// Whole days go through `generate_candidate_slots`; find-first and existence checks walk the
/// same windows one at a time. Both apply the same horizon and booking filter, so every mode
/// agrees on which slots are free.
#[derive(Debug, Clone)]
pub struct AvailabilitySnapshot {
    schedule: WeeklySchedule,
    bookings: Vec<ExistingAppointment>,
    duration_minutes: i64,
    now: DateTime<Utc>,
    grace: Duration,
    horizon: DateTime<Utc>,
}

impl AvailabilitySnapshot {
    pub fn new(
        schedule: WeeklySchedule,
        bookings: Vec<ExistingAppointment>,
        duration_minutes: i64,
        now: DateTime<Utc>,
        settings: &AvailabilitySettings,
    ) -> Self {
        let settings = settings.clamped();
        Self {
            schedule,
            bookings,
            duration_minutes,
            now,
            grace: Duration::try_minutes(settings.grace_buffer_minutes).unwrap_or_else(Duration::zero),
            horizon: horizon_end(now, settings.horizon_months),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn horizon(&self) -> DateTime<Utc> {
        self.horizon
    }

    fn free_slots(&self, mut candidates: Vec<DateTime<Utc>>) -> Vec<DateTime<Utc>> {
        candidates.retain(|slot| *slot <= self.horizon);
        filter_available(candidates, self.duration_minutes, &self.bookings)
    }

    fn free_slots_in_window(&self, day: NaiveDate, window: &ReceptionWindow) -> Vec<DateTime<Utc>> {
        self.free_slots(window_slots(day, window, self.duration_minutes, self.now, self.grace))
    }

    /// All free slots on `day`, or `None` when there are none.
    pub fn day_result(&self, day: NaiveDate) -> Option<AvailabilityResult> {
        let weekday = Weekday::of_date(day);
        let candidates = generate_candidate_slots(
            day,
            self.schedule.windows_for(weekday),
            self.duration_minutes,
            self.now,
            self.grace,
        );
        let slots = self.free_slots(candidates);

        if slots.is_empty() {
            None
        } else {
            Some(AvailabilityResult { date: day, weekday, slots })
        }
    }

    /// One result per day with at least one free slot, in day order.
    pub fn enumerate(&self, days: &[NaiveDate]) -> Vec<AvailabilityResult> {
        days.iter().filter_map(|day| self.day_result(*day)).collect()
    }

    /// The first day with a free slot, with that day's full slot list.
    ///
    /// Stops at the first window that yields a slot; only the remaining windows of that same
    /// day are evaluated afterwards.
    pub fn find_first(&self, days: &[NaiveDate]) -> Option<AvailabilityResult> {
        for day in days {
            let weekday = Weekday::of_date(*day);
            let windows = self.schedule.windows_for(weekday);

            for (index, window) in windows.iter().enumerate() {
                let mut slots = self.free_slots_in_window(*day, window);
                if slots.is_empty() {
                    continue;
                }

                for later in &windows[index + 1..] {
                    slots.extend(self.free_slots_in_window(*day, later));
                }
                return Some(AvailabilityResult { date: *day, weekday, slots });
            }
        }

        None
    }

    /// Whether any day in `days` has a free slot.
    pub fn any_available(&self, days: &[NaiveDate]) -> bool {
        days.iter().any(|day| {
            self.schedule
                .windows_for(Weekday::of_date(*day))
                .iter()
                .any(|window| !self.free_slots_in_window(*day, window).is_empty())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::horizon::{filter_days, month_days, rolling_days};
    use crate::services::reception::group_windows_by_weekday;
    use crate::models::AvailabilityFilter;
    use chrono::{NaiveTime, TimeZone};

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn monday_morning() -> WeeklySchedule {
        group_windows_by_weekday(&[ReceptionWindow::new(Weekday::Monday, time(9, 0), time(13, 0))])
    }

    fn snapshot(schedule: WeeklySchedule, bookings: Vec<ExistingAppointment>, now: DateTime<Utc>) -> AvailabilitySnapshot {
        AvailabilitySnapshot::new(schedule, bookings, 30, now, &AvailabilitySettings::default())
    }

    // 2024-03-05 is a Tuesday; the next Monday is 2024-03-11.
    fn tuesday_noon() -> DateTime<Utc> {
        at(2024, 3, 5, 12, 0)
    }

    #[test]
    fn monday_window_seen_from_tuesday() {
        let snap = snapshot(monday_morning(), vec![], tuesday_noon());
        let days = month_days(snap.now(), None, snap.horizon()).unwrap();

        let results = snap.enumerate(&days);

        let first = &results[0];
        assert_eq!(first.weekday, Weekday::Monday);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(first.slots.len(), 8);
        assert_eq!(first.slots[0], at(2024, 3, 11, 9, 0));
        assert_eq!(first.slots[7], at(2024, 3, 11, 12, 30));
        assert!(results.iter().all(|result| result.weekday == Weekday::Monday));
    }

    #[test]
    fn booked_slot_is_absent() {
        let bookings = vec![ExistingAppointment::new(at(2024, 3, 11, 10, 0), 30)];
        let snap = snapshot(monday_morning(), bookings, tuesday_noon());
        let days = month_days(snap.now(), None, snap.horizon()).unwrap();

        let first = snap.enumerate(&days).remove(0);

        assert_eq!(first.slots.len(), 7);
        assert!(!first.slots.contains(&at(2024, 3, 11, 10, 0)));
    }

    #[test]
    fn query_during_the_window_applies_grace() {
        let snap = snapshot(monday_morning(), vec![], at(2024, 3, 11, 9, 5));

        let today = snap.day_result(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()).unwrap();

        assert_eq!(today.slots[0], at(2024, 3, 11, 9, 30));
        assert!(today.slots.iter().all(|slot| *slot > at(2024, 3, 11, 9, 15)));
    }

    #[test]
    fn find_first_matches_first_enumerated_day() {
        let schedule = group_windows_by_weekday(&[
            ReceptionWindow::new(Weekday::Monday, time(9, 0), time(10, 0)),
            ReceptionWindow::new(Weekday::Monday, time(14, 0), time(16, 0)),
            ReceptionWindow::new(Weekday::Thursday, time(8, 0), time(9, 0)),
        ]);
        // Thursday fully booked, so the first free day is the Monday.
        let bookings = vec![ExistingAppointment::new(at(2024, 3, 7, 8, 0), 60)];
        let snap = snapshot(schedule, bookings, tuesday_noon());
        let days = rolling_days(snap.now(), snap.horizon());

        let enumerated = snap.enumerate(&days);
        let first = snap.find_first(&days).unwrap();

        assert_eq!(first, enumerated[0]);
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(first.slots.len(), 6);
    }

    #[test]
    fn find_first_includes_later_windows_when_early_window_is_full() {
        let schedule = group_windows_by_weekday(&[
            ReceptionWindow::new(Weekday::Monday, time(9, 0), time(9, 30)),
            ReceptionWindow::new(Weekday::Monday, time(10, 0), time(11, 0)),
            ReceptionWindow::new(Weekday::Monday, time(12, 0), time(12, 30)),
        ]);
        let bookings = vec![ExistingAppointment::new(at(2024, 3, 11, 9, 0), 30)];
        let snap = snapshot(schedule, bookings, tuesday_noon());
        let days = rolling_days(snap.now(), snap.horizon());

        let first = snap.find_first(&days).unwrap();

        assert_eq!(
            first.slots,
            vec![at(2024, 3, 11, 10, 0), at(2024, 3, 11, 10, 30), at(2024, 3, 11, 12, 0)]
        );
        assert_eq!(Some(first), snap.enumerate(&days).into_iter().next());
    }

    #[test]
    fn whenever_agrees_with_enumeration() {
        let snap = snapshot(monday_morning(), vec![], tuesday_noon());
        let horizon = snap.horizon();

        let whenever = filter_days(snap.now(), AvailabilityFilter::Whenever, horizon);
        let month = month_days(snap.now(), None, horizon).unwrap();

        assert_eq!(snap.any_available(&whenever), !snap.enumerate(&month).is_empty());
        assert!(snap.any_available(&whenever));
    }

    #[test]
    fn today_and_within_three_days_filters() {
        let snap = snapshot(monday_morning(), vec![], tuesday_noon());
        let horizon = snap.horizon();

        assert!(!snap.any_available(&filter_days(snap.now(), AvailabilityFilter::Today, horizon)));
        // Wednesday to Friday: no Monday in range.
        assert!(!snap.any_available(&filter_days(snap.now(), AvailabilityFilter::WithinThreeDays, horizon)));

        // From Saturday the Monday is within three days.
        let saturday = snapshot(monday_morning(), vec![], at(2024, 3, 9, 8, 0));
        assert!(saturday.any_available(&filter_days(saturday.now(), AvailabilityFilter::WithinThreeDays, saturday.horizon())));
    }

    #[test]
    fn empty_schedule_has_no_availability() {
        let snap = snapshot(WeeklySchedule::default(), vec![], tuesday_noon());
        let days = rolling_days(snap.now(), snap.horizon());

        assert!(snap.enumerate(&days).is_empty());
        assert!(snap.find_first(&days).is_none());
        assert!(!snap.any_available(&days));
    }

    #[test]
    fn no_slot_past_now_or_horizon() {
        let schedule = group_windows_by_weekday(
            &Weekday::ALL
                .iter()
                .map(|weekday| ReceptionWindow::new(*weekday, time(8, 0), time(0, 0)))
                .collect::<Vec<_>>(),
        );
        let now = at(2024, 3, 5, 12, 7);
        let snap = snapshot(schedule, vec![], now);
        let days = rolling_days(now, snap.horizon());

        let results = snap.enumerate(&days);

        let all_slots: Vec<_> = results.iter().flat_map(|r| r.slots.iter()).collect();
        assert!(all_slots.iter().all(|slot| **slot > now));
        assert!(all_slots.iter().all(|slot| **slot <= at(2024, 4, 5, 12, 7)));
        assert_eq!(**all_slots.last().unwrap(), at(2024, 4, 5, 12, 0));
    }

    #[test]
    fn out_of_range_settings_are_clamped() {
        let now = at(2024, 3, 11, 9, 5);
        let wild = AvailabilitySettings { grace_buffer_minutes: i64::MAX, horizon_months: u32::MAX };

        let snap = AvailabilitySnapshot::new(monday_morning(), vec![], 30, now, &wild);

        assert_eq!(snap.horizon(), at(2025, 3, 11, 9, 5));
        assert_eq!(rolling_days(now, snap.horizon()).len(), 366);
        // A full-day grace leaves nothing in today's already-open window.
        assert!(snap.day_result(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()).is_none());
    }

    #[test]
    fn negative_grace_counts_as_none() {
        let now = at(2024, 3, 11, 9, 5);
        let settings = AvailabilitySettings { grace_buffer_minutes: -60, horizon_months: 1 };

        let snap = AvailabilitySnapshot::new(monday_morning(), vec![], 30, now, &settings);

        let today = snap.day_result(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()).unwrap();
        assert_eq!(today.slots[0], at(2024, 3, 11, 9, 30));
    }
}
