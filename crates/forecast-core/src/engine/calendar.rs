//! Workday derivation
//!
//! A date is a workday when it falls on Monday-Friday, is not a resolved
//! holiday and is not a vacation day. Resolved holidays are the region's
//! public holidays plus manual additions, minus manual removals; the manual
//! overrides always win over the region lookup.

use super::holidays::HolidaySource;
use crate::models::{CalendarConfig, DateInterval};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
use tracing::debug;

/// Overlap of two closed intervals
pub fn intersection(a: &DateInterval, b: &DateInterval) -> Option<DateInterval> {
    a.intersection(b)
}

/// Monday..=Friday
pub fn is_weekday(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() < 5
}

/// Region holidays for the years of `period`, with manual overrides applied
pub fn resolve_holidays(
    period: &DateInterval,
    region: &str,
    source: &dyn HolidaySource,
    holiday_add: &BTreeSet<NaiveDate>,
    holiday_remove: &BTreeSet<NaiveDate>,
) -> BTreeSet<NaiveDate> {
    let mut holidays = source.holidays(region, period.years());
    holidays.extend(holiday_add.iter().copied());
    holidays.retain(|d| !holiday_remove.contains(d));
    holidays
}

/// Ascending workdays in `period`
pub fn workdays_in_period(
    period: &DateInterval,
    region: &str,
    source: &dyn HolidaySource,
    holiday_add: &BTreeSet<NaiveDate>,
    holiday_remove: &BTreeSet<NaiveDate>,
    vacations: &BTreeSet<NaiveDate>,
) -> Vec<NaiveDate> {
    let holidays = resolve_holidays(period, region, source, holiday_add, holiday_remove);
    WorkCalendar {
        holidays,
        vacations: vacations.clone(),
    }
    .workdays(period)
}

/// Holidays and vacations resolved once for a planning period
///
/// Sub-periods (project cuts) reuse the same resolution instead of asking
/// the holiday source again.
#[derive(Debug, Clone, Default)]
pub struct WorkCalendar {
    holidays: BTreeSet<NaiveDate>,
    vacations: BTreeSet<NaiveDate>,
}

impl WorkCalendar {
    pub fn resolve(
        period: &DateInterval,
        region: &str,
        source: &dyn HolidaySource,
        calendar: &CalendarConfig,
    ) -> Self {
        let holidays = resolve_holidays(
            period,
            region,
            source,
            &calendar.holiday_add,
            &calendar.holiday_remove,
        );
        debug!(
            region,
            holidays = holidays.len(),
            vacations = calendar.vacation_days.len(),
            "Resolved work calendar"
        );
        Self {
            holidays,
            vacations: calendar.vacation_days.clone(),
        }
    }

    pub fn is_workday(&self, date: NaiveDate) -> bool {
        is_weekday(date) && !self.holidays.contains(&date) && !self.vacations.contains(&date)
    }

    /// Ascending, duplicate-free workdays in `period`; may be empty
    pub fn workdays(&self, period: &DateInterval) -> Vec<NaiveDate> {
        period.days().filter(|d| self.is_workday(*d)).collect()
    }

    pub fn holidays(&self) -> &BTreeSet<NaiveDate> {
        &self.holidays
    }

    /// Resolved holidays in `period` that fall on a weekday
    pub fn weekday_holidays_in(&self, period: &DateInterval) -> Vec<NaiveDate> {
        self.holidays
            .range(period.start..=period.end)
            .copied()
            .filter(|d| is_weekday(*d))
            .collect()
    }

    /// Vacation days in `period`, including those on weekends or holidays
    pub fn vacations_in(&self, period: &DateInterval) -> Vec<NaiveDate> {
        self.vacations
            .range(period.start..=period.end)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::holidays::{GermanHolidays, NoHolidays};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn set(dates: &[NaiveDate]) -> BTreeSet<NaiveDate> {
        dates.iter().copied().collect()
    }

    #[test]
    fn test_full_week_yields_five_weekdays() {
        // 2025-01-06 is a Monday
        let week = DateInterval::new(d(2025, 1, 6), d(2025, 1, 12)).unwrap();
        let empty = BTreeSet::new();
        let days = workdays_in_period(&week, "", &NoHolidays, &empty, &empty, &empty);
        assert_eq!(
            days,
            vec![
                d(2025, 1, 6),
                d(2025, 1, 7),
                d(2025, 1, 8),
                d(2025, 1, 9),
                d(2025, 1, 10)
            ]
        );
    }

    #[test]
    fn test_overrides_beat_region_lookup() {
        // Easter week 2025 in NI: Good Friday 18th and Easter Monday 21st
        let period = DateInterval::new(d(2025, 4, 14), d(2025, 4, 25)).unwrap();
        let add = set(&[d(2025, 4, 23)]);
        let remove = set(&[d(2025, 4, 18)]);
        let vacations = set(&[d(2025, 4, 24)]);

        let days = workdays_in_period(&period, "NI", &GermanHolidays, &add, &remove, &vacations);

        assert!(days.contains(&d(2025, 4, 18)), "removed holiday is a workday");
        assert!(!days.contains(&d(2025, 4, 21)), "Easter Monday stays a holiday");
        assert!(!days.contains(&d(2025, 4, 23)), "added holiday is excluded");
        assert!(!days.contains(&d(2025, 4, 24)), "vacation is excluded");
        assert_eq!(days.len(), 7);
    }

    #[test]
    fn test_vacation_on_removed_holiday_still_excluded() {
        let day = d(2025, 4, 18);
        let period = DateInterval::day(day);
        let remove = set(&[day]);
        let days = workdays_in_period(
            &period,
            "NI",
            &GermanHolidays,
            &BTreeSet::new(),
            &remove,
            &set(&[day]),
        );
        assert!(days.is_empty());
    }

    #[test]
    fn test_weekend_only_period_is_empty() {
        let weekend = DateInterval::new(d(2025, 1, 11), d(2025, 1, 12)).unwrap();
        let calendar = WorkCalendar::default();
        assert!(calendar.workdays(&weekend).is_empty());
    }

    #[test]
    fn test_work_calendar_listings() {
        let period = DateInterval::new(d(2025, 12, 1), d(2025, 12, 31)).unwrap();
        let config = CalendarConfig {
            vacation_days: set(&[d(2025, 12, 27), d(2025, 12, 29)]),
            holiday_add: set(&[d(2025, 12, 24), d(2025, 12, 31)]),
            holiday_remove: BTreeSet::new(),
        };
        let calendar = WorkCalendar::resolve(&period, "NI", &GermanHolidays, &config);

        // 24th (Wed), 25th (Thu), 26th (Fri), 31st (Wed)
        assert_eq!(calendar.weekday_holidays_in(&period).len(), 4);
        assert_eq!(calendar.vacations_in(&period).len(), 2);
        // 23 weekdays in Dec 2025, minus 4 holidays, minus the vacation on the 29th
        assert_eq!(calendar.workdays(&period).len(), 18);
    }

    #[test]
    fn test_intersection_commutes() {
        let a = DateInterval::new(d(2025, 1, 1), d(2025, 3, 31)).unwrap();
        let b = DateInterval::new(d(2025, 3, 15), d(2025, 6, 30)).unwrap();
        assert_eq!(intersection(&a, &b), intersection(&b, &a));
        assert_eq!(
            intersection(&a, &b),
            DateInterval::new(d(2025, 3, 15), d(2025, 3, 31))
        );
    }
}
