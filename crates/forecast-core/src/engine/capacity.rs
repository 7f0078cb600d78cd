//! Capacity per workday and per month

use crate::models::{IntervalOverride, MonthKey, WeekdayProfile};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Hours available on each workday (non-workdays are absent)
pub type CapacityByDate = BTreeMap<NaiveDate, f64>;

/// Summed hours per month
pub type CapacityByMonth = BTreeMap<MonthKey, f64>;

/// Per-workday capacity: weekday baseline, then overrides, then sickness
///
/// Overrides are applied in list order and overwrite (never add) the value
/// of dates already present in `workdays`, so a later override wins where
/// ranges overlap. They never introduce new dates. A positive
/// `sick_probability` scales every value by `1 - p`, rounded to 6 decimals.
pub fn compute_capacity_by_date(
    workdays: &[NaiveDate],
    profile: &WeekdayProfile,
    overrides: &[IntervalOverride],
    sick_probability: f64,
) -> CapacityByDate {
    let mut capacity: CapacityByDate = workdays
        .iter()
        .map(|d| (*d, profile.hours(d.weekday())))
        .collect();

    for o in overrides {
        if o.end < o.start {
            continue;
        }
        for (_, hours) in capacity.range_mut(o.start..=o.end) {
            *hours = o.hours_per_day;
        }
    }

    if sick_probability > 0.0 {
        let factor = (1.0 - sick_probability).max(0.0);
        for hours in capacity.values_mut() {
            *hours = round_decimals(*hours * factor, 6);
        }
    }

    capacity
}

/// Sum capacity by month
pub fn aggregate_capacity_by_month(capacity: &CapacityByDate) -> CapacityByMonth {
    let mut by_month = CapacityByMonth::new();
    for (date, hours) in capacity {
        *by_month.entry(MonthKey::of(*date)).or_insert(0.0) += hours;
    }
    by_month
}

fn round_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
