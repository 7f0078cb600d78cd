//! Forecast configuration models
//!
//! Deserialized from the YAML config file and checked by
//! [`ForecastConfig::validate`] before anything is computed.

use super::{DateInterval, Project, WeekdayProfile};
use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Complete, validated forecast configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    pub settings: Settings,

    #[serde(default)]
    pub capacity: CapacityConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub sickness: SicknessConfig,

    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Number formatting locale for rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    /// `1.234,56`
    #[default]
    #[serde(rename = "de-DE", alias = "de")]
    German,
    /// `1,234.56`
    #[serde(rename = "en-US", alias = "en")]
    English,
}

impl Locale {
    pub fn decimal_separator(&self) -> char {
        match self {
            Locale::German => ',',
            Locale::English => '.',
        }
    }

    pub fn thousands_separator(&self) -> char {
        match self {
            Locale::German => '.',
            Locale::English => ',',
        }
    }
}

/// Global settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Region code for the public holiday lookup (e.g. "NI")
    #[serde(default = "default_region", alias = "state")]
    pub region: String,

    /// Required daily hours are rounded to a multiple of this
    #[serde(default = "default_round_hours")]
    pub round_hours: f64,

    #[serde(default)]
    pub locale: Locale,

    pub planning_period: DateInterval,
}

fn default_region() -> String {
    "NI".to_string()
}

fn default_round_hours() -> f64 {
    0.15
}

/// Weekday baseline plus date-range overrides
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CapacityConfig {
    #[serde(default)]
    pub per_weekday: WeekdayProfile,

    /// Applied in list order; later entries win on overlap
    #[serde(default)]
    pub interval_overrides: Vec<IntervalOverride>,
}

/// Fixed hours per day for every date in a range
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntervalOverride {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub hours_per_day: f64,
}

impl IntervalOverride {
    pub fn span(&self) -> DateInterval {
        DateInterval {
            start: self.start,
            end: self.end,
        }
    }
}

/// Vacations and manual holiday corrections
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "RawCalendarConfig")]
pub struct CalendarConfig {
    pub vacation_days: BTreeSet<NaiveDate>,
    pub holiday_add: BTreeSet<NaiveDate>,
    pub holiday_remove: BTreeSet<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCalendarConfig {
    #[serde(default)]
    vacation_days: Vec<VacationEntry>,
    #[serde(default)]
    holiday_overrides: HolidayOverrides,
}

#[derive(Debug, Default, Deserialize)]
struct HolidayOverrides {
    #[serde(default)]
    add: Vec<NaiveDate>,
    #[serde(default)]
    remove: Vec<NaiveDate>,
}

/// A vacation entry: bare date, `{ date }`, or `{ start, end }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum VacationEntry {
    Day(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
    Single { date: NaiveDate },
}

impl TryFrom<RawCalendarConfig> for CalendarConfig {
    type Error = String;

    fn try_from(raw: RawCalendarConfig) -> std::result::Result<Self, Self::Error> {
        let mut vacation_days = BTreeSet::new();
        for (idx, entry) in raw.vacation_days.into_iter().enumerate() {
            match entry {
                VacationEntry::Day(date) | VacationEntry::Single { date } => {
                    vacation_days.insert(date);
                }
                VacationEntry::Range { start, end } => {
                    let range = DateInterval::new(start, end).ok_or_else(|| {
                        format!("calendar.vacation_days[{}]: end {} is before start {}", idx, end, start)
                    })?;
                    vacation_days.extend(range.days());
                }
            }
        }

        Ok(Self {
            vacation_days,
            holiday_add: raw.holiday_overrides.add.into_iter().collect(),
            holiday_remove: raw.holiday_overrides.remove.into_iter().collect(),
        })
    }
}

/// Expected sickness attrition
#[derive(Debug, Clone, Deserialize)]
pub struct SicknessConfig {
    #[serde(default = "default_sick_probability")]
    pub prob_per_workday: f64,
}

impl Default for SicknessConfig {
    fn default() -> Self {
        Self {
            prob_per_workday: default_sick_probability(),
        }
    }
}

fn default_sick_probability() -> f64 {
    0.02
}

impl ForecastConfig {
    /// Check structural correctness: ranges, signs, domains, uniqueness
    pub fn validate(&self) -> Result<()> {
        let settings = &self.settings;
        if !settings.planning_period.is_valid() {
            return Err(ForecastError::invalid_config(
                "settings.planning_period.end is before start",
            ));
        }
        if settings.round_hours.is_nan() || settings.round_hours <= 0.0 {
            return Err(ForecastError::invalid_config(format!(
                "settings.round_hours must be > 0 (got {})",
                settings.round_hours
            )));
        }

        for (key, hours) in self.capacity.per_weekday.entries() {
            if !non_negative(hours) {
                return Err(ForecastError::invalid_config(format!(
                    "capacity.per_weekday.{} must not be negative (got {})",
                    key, hours
                )));
            }
        }
        for (idx, o) in self.capacity.interval_overrides.iter().enumerate() {
            if !o.span().is_valid() {
                return Err(ForecastError::invalid_config(format!(
                    "capacity.interval_overrides[{}]: end is before start",
                    idx
                )));
            }
            if !non_negative(o.hours_per_day) {
                return Err(ForecastError::invalid_config(format!(
                    "capacity.interval_overrides[{}]: hours_per_day must not be negative",
                    idx
                )));
            }
        }

        let p = self.sickness.prob_per_workday;
        if !(0.0..=1.0).contains(&p) {
            return Err(ForecastError::invalid_config(format!(
                "sickness.prob_per_workday must be between 0 and 1 (got {})",
                p
            )));
        }

        if self.projects.is_empty() {
            return Err(ForecastError::invalid_config(
                "at least one project must be defined in projects",
            ));
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            validate_project(project)?;
            if !seen.insert(project.name.as_str()) {
                return Err(ForecastError::invalid_config(format!(
                    "duplicate project name '{}'",
                    project.name
                )));
            }
        }

        Ok(())
    }
}

fn validate_project(project: &Project) -> Result<()> {
    let name = &project.name;
    if !project.span().is_valid() {
        return Err(ForecastError::invalid_config(format!(
            "project {}: end is before start",
            name
        )));
    }
    if !non_negative(project.rest_budget_hours) {
        return Err(ForecastError::invalid_config(format!(
            "project {}: rest_budget_hours must not be negative",
            name
        )));
    }
    if !non_negative(project.rate_per_hour) {
        return Err(ForecastError::invalid_config(format!(
            "project {}: rate_per_hour must not be negative",
            name
        )));
    }
    for (month, weight) in &project.weights_by_month {
        if !(0.0..=100.0).contains(weight) {
            return Err(ForecastError::invalid_config(format!(
                "project {}: weight {} for {} outside 0-100",
                name, weight, month
            )));
        }
    }
    for (month, limit) in &project.limits_by_month {
        if !non_negative(*limit) {
            return Err(ForecastError::invalid_config(format!(
                "project {}: limit {} for {} must not be negative",
                name, limit, month
            )));
        }
    }
    Ok(())
}

/// `false` for negatives and NaN
fn non_negative(value: f64) -> bool {
    value >= 0.0
}
