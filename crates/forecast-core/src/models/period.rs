//! Closed date intervals

use super::MonthKey;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Inclusive `(start, end)` pair of calendar dates
///
/// Constructed through [`DateInterval::new`], which rejects `start > end`.
/// Deserialized values are checked by the config validation instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Single-day interval
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Overlap of two closed intervals, `None` if they are disjoint
    pub fn intersection(&self, other: &DateInterval) -> Option<DateInterval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        DateInterval::new(start, end)
    }

    /// Every calendar date in the interval, ascending
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Every month touched by the interval, ascending
    pub fn months(&self) -> Vec<MonthKey> {
        let last = MonthKey::of(self.end);
        let mut month = MonthKey::of(self.start);
        let mut months = vec![month];
        while month < last {
            month = month.succ();
            months.push(month);
        }
        months
    }

    /// Calendar years spanned
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }
}

impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} – {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_new_rejects_inverted() {
        assert!(DateInterval::new(d(2025, 1, 2), d(2025, 1, 1)).is_none());
        assert!(DateInterval::new(d(2025, 1, 1), d(2025, 1, 1)).is_some());
    }

    #[test]
    fn test_days_inclusive() {
        let iv = DateInterval::new(d(2025, 1, 30), d(2025, 2, 2)).unwrap();
        let days: Vec<_> = iv.days().collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days.first(), Some(&d(2025, 1, 30)));
        assert_eq!(days.last(), Some(&d(2025, 2, 2)));
    }

    #[test]
    fn test_months_cross_year() {
        let iv = DateInterval::new(d(2024, 11, 15), d(2025, 2, 1)).unwrap();
        let months: Vec<String> = iv.months().iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2024-11", "2024-12", "2025-01", "2025-02"]);
        assert_eq!(iv.years(), 2024..=2025);
    }

    #[test]
    fn test_intersection_disjoint_and_touching() {
        let a = DateInterval::new(d(2025, 1, 1), d(2025, 1, 31)).unwrap();
        let b = DateInterval::new(d(2025, 2, 1), d(2025, 2, 28)).unwrap();
        assert_eq!(a.intersection(&b), None);

        let c = DateInterval::new(d(2025, 1, 31), d(2025, 3, 1)).unwrap();
        assert_eq!(a.intersection(&c), Some(DateInterval::day(d(2025, 1, 31))));
    }
}
