//! Per-project results: required pace, utilization, revenue

use super::allocation::Assignment;
use crate::models::{DateInterval, MonthKey, Project, ProjectId};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Workdays of each project inside its cut of the planning period
pub type WorkdaysByProject = BTreeMap<ProjectId, Vec<NaiveDate>>;

/// Share of the rest budget a target aims to bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompletionTarget {
    #[serde(rename = "100%")]
    Full,
    #[serde(rename = "90%")]
    Ninety,
    #[serde(rename = "80%")]
    Eighty,
}

impl CompletionTarget {
    pub const ALL: [CompletionTarget; 3] = [Self::Full, Self::Ninety, Self::Eighty];

    pub fn fraction(&self) -> f64 {
        match self {
            Self::Full => 1.0,
            Self::Ninety => 0.9,
            Self::Eighty => 0.8,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Full => "100%",
            Self::Ninety => "90%",
            Self::Eighty => "80%",
        }
    }
}

/// One value per completion target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetValues<T> {
    #[serde(rename = "100")]
    pub full: T,
    #[serde(rename = "90")]
    pub ninety: T,
    #[serde(rename = "80")]
    pub eighty: T,
}

impl<T> TargetValues<T> {
    pub fn from_fn(mut f: impl FnMut(CompletionTarget) -> T) -> Self {
        Self {
            full: f(CompletionTarget::Full),
            ninety: f(CompletionTarget::Ninety),
            eighty: f(CompletionTarget::Eighty),
        }
    }

    pub fn get(&self, target: CompletionTarget) -> &T {
        match target {
            CompletionTarget::Full => &self.full,
            CompletionTarget::Ninety => &self.ninety,
            CompletionTarget::Eighty => &self.eighty,
        }
    }

    /// `(target, value)` pairs from 100% down to 80%
    pub fn iter(&self) -> impl Iterator<Item = (CompletionTarget, &T)> {
        CompletionTarget::ALL.into_iter().map(move |t| (t, self.get(t)))
    }
}

/// Computed figures for one project active in the planning window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectResult {
    pub name: ProjectId,

    /// Project span cut to the planning period
    pub period: DateInterval,
    pub workdays: usize,
    pub rest_budget_hours: f64,
    pub rate_per_hour: f64,

    /// Hours per workday needed to bill each target, rounded
    pub required_per_day: TargetValues<f64>,

    pub assigned_capacity_hours: f64,
    pub assigned_avg_per_day: f64,

    /// `required / assigned_avg`; `None` when nothing was assigned
    pub utilization: TargetValues<Option<f64>>,

    /// Billable amount of each target, independent of capacity
    pub revenue: TargetValues<f64>,
}

impl ProjectResult {
    /// Whether any capacity at all reached the project
    pub fn has_capacity(&self) -> bool {
        self.assigned_avg_per_day > 0.0
    }

    /// Targets whose required pace exceeds the assigned daily average
    pub fn targets_over_capacity(&self) -> Vec<CompletionTarget> {
        if !self.has_capacity() {
            return Vec::new();
        }
        self.required_per_day
            .iter()
            .filter(|(_, required)| **required > self.assigned_avg_per_day)
            .map(|(target, _)| target)
            .collect()
    }
}

/// Round half up to the nearest multiple of `multiple`
///
/// `multiple <= 0` disables rounding.
pub fn round_to_multiple(value: f64, multiple: f64) -> f64 {
    if multiple <= 0.0 {
        return value;
    }
    multiple * (value / multiple + 0.5).floor()
}

/// Workday count per month for one project
pub fn workdays_per_month(workdays: &[NaiveDate]) -> BTreeMap<MonthKey, usize> {
    let mut counts = BTreeMap::new();
    for day in workdays {
        *counts.entry(MonthKey::of(*day)).or_insert(0) += 1;
    }
    counts
}

/// One result per project active in the window, in input order
///
/// Projects outside the planning period or without workdays in their cut
/// are omitted.
pub fn compute_results(
    planning_period: &DateInterval,
    projects: &[Project],
    workdays_by_project: &WorkdaysByProject,
    assignment: &Assignment,
    round_hours: f64,
) -> Vec<ProjectResult> {
    let mut results = Vec::with_capacity(projects.len());

    for project in projects {
        let Some(cut) = planning_period.intersection(&project.span()) else {
            continue;
        };
        let workdays = workdays_by_project
            .get(&project.name)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if workdays.is_empty() {
            continue;
        }
        let count = workdays.len();

        // Each month's assignment is spread over the project's own workdays
        // in that month, so summing per-day shares gives back the monthly sums.
        let per_month = workdays_per_month(workdays);
        let assigned_total: f64 = workdays
            .iter()
            .map(|day| {
                let month = MonthKey::of(*day);
                let days = per_month.get(&month).copied().unwrap_or(1);
                assignment.get(&project.name, month) / days as f64
            })
            .sum();
        let assigned_avg = assigned_total / count as f64;

        let rest = project.rest_budget_hours;
        let required_per_day = TargetValues::from_fn(|t| {
            round_to_multiple(t.fraction() * rest / count as f64, round_hours)
        });
        let utilization = TargetValues::from_fn(|t| {
            (assigned_avg > 0.0).then(|| required_per_day.get(t) / assigned_avg)
        });
        let revenue = TargetValues::from_fn(|t| t.fraction() * rest * project.rate_per_hour);

        results.push(ProjectResult {
            name: project.name.clone(),
            period: cut,
            workdays: count,
            rest_budget_hours: rest,
            rate_per_hour: project.rate_per_hour,
            required_per_day,
            assigned_capacity_hours: assigned_total,
            assigned_avg_per_day: assigned_avg,
            utilization,
            revenue,
        });
    }

    debug!(
        projects = projects.len(),
        results = results.len(),
        "Computed project results"
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn project(name: &str, start: NaiveDate, end: NaiveDate, budget: f64) -> Project {
        Project {
            name: ProjectId::from(name),
            start,
            end,
            rest_budget_hours: budget,
            rate_per_hour: 100.0,
            weights_by_month: BTreeMap::new(),
            limits_by_month: BTreeMap::new(),
        }
    }

    /// The 20 weekdays of June 2025 (Mon 2nd .. Fri 27th)
    fn june_workdays() -> Vec<NaiveDate> {
        DateInterval::new(d(2025, 6, 2), d(2025, 6, 27))
            .unwrap()
            .days()
            .filter(|day| crate::engine::calendar::is_weekday(*day))
            .collect()
    }

    #[test]
    fn test_round_to_multiple() {
        assert_eq!(round_to_multiple(7.0, 1.0), 7.0);
        assert_eq!(round_to_multiple(7.5, 1.0), 8.0);
        assert_eq!(round_to_multiple(7.49, 1.0), 7.0);
        assert!((round_to_multiple(1.0, 0.15) - 1.05).abs() < 1e-9);
        assert_eq!(round_to_multiple(3.14159, 0.0), 3.14159);
        assert_eq!(round_to_multiple(3.14159, -1.0), 3.14159);
    }

    #[test]
    fn test_round_to_multiple_idempotent() {
        for r in [0.15, 0.25, 0.5, 1.0, 2.0] {
            for x in [0.0, 0.07, 1.234, 7.5, 29.99, 1000.01] {
                let once = round_to_multiple(x, r);
                let twice = round_to_multiple(once, r);
                assert!((once - twice).abs() < 1e-9, "x={x} r={r}");
            }
        }
    }

    #[test]
    fn test_required_pace_and_utilization() {
        let period = DateInterval::new(d(2025, 6, 1), d(2025, 6, 30)).unwrap();
        let p = project("A", period.start, period.end, 600.0);
        let workdays: WorkdaysByProject = [(p.name.clone(), june_workdays())].into_iter().collect();
        let mut assignment = Assignment::new();
        assignment.insert(p.name.clone(), MonthKey::new(2025, 6).unwrap(), 60.0);

        let results = compute_results(&period, &[p], &workdays, &assignment, 1.0);
        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.workdays, 20);
        assert_eq!(r.required_per_day.full, 30.0);
        assert_eq!(r.required_per_day.ninety, 27.0);
        assert_eq!(r.required_per_day.eighty, 24.0);
        assert!((r.assigned_capacity_hours - 60.0).abs() < 1e-9);
        assert!((r.assigned_avg_per_day - 3.0).abs() < 1e-9);
        assert!((r.utilization.full.unwrap() - 10.0).abs() < 1e-9);
        assert!((r.revenue.full - 60_000.0).abs() < 1e-6);
        assert!((r.revenue.eighty - 48_000.0).abs() < 1e-6);
        assert_eq!(
            r.targets_over_capacity(),
            vec![
                CompletionTarget::Full,
                CompletionTarget::Ninety,
                CompletionTarget::Eighty
            ]
        );
    }

    #[test]
    fn test_zero_budget() {
        let period = DateInterval::new(d(2025, 6, 1), d(2025, 6, 30)).unwrap();
        let p = project("A", period.start, period.end, 0.0);
        let workdays: WorkdaysByProject = [(p.name.clone(), june_workdays())].into_iter().collect();

        let empty = compute_results(&period, &[p.clone()], &workdays, &Assignment::new(), 0.15);
        assert_eq!(empty[0].required_per_day.full, 0.0);
        assert_eq!(empty[0].utilization.full, None);
        assert_eq!(empty[0].revenue.full, 0.0);

        let mut assignment = Assignment::new();
        assignment.insert(p.name.clone(), MonthKey::new(2025, 6).unwrap(), 40.0);
        let assigned = compute_results(&period, &[p], &workdays, &assignment, 0.15);
        assert_eq!(assigned[0].utilization.full, Some(0.0));
        assert!(assigned[0].targets_over_capacity().is_empty());
    }

    #[test]
    fn test_inactive_projects_omitted() {
        let period = DateInterval::new(d(2025, 6, 1), d(2025, 6, 30)).unwrap();
        let outside = project("Outside", d(2025, 8, 1), d(2025, 8, 31), 10.0);
        let weekend = project("Weekend", d(2025, 6, 7), d(2025, 6, 8), 10.0);
        let inside = project("Inside", d(2025, 5, 1), d(2025, 6, 30), 10.0);
        let workdays: WorkdaysByProject = [
            (weekend.name.clone(), Vec::new()),
            (inside.name.clone(), june_workdays()),
        ]
        .into_iter()
        .collect();

        let results = compute_results(
            &period,
            &[outside, weekend, inside],
            &workdays,
            &Assignment::new(),
            0.15,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name.as_str(), "Inside");
        assert_eq!(results[0].period.start, d(2025, 6, 1));
        assert!(!results[0].has_capacity());
    }

    #[test]
    fn test_assigned_spread_over_own_workdays() {
        // 2 workdays in January, 3 in February
        let period = DateInterval::new(d(2025, 1, 30), d(2025, 2, 5)).unwrap();
        let p = project("A", period.start, period.end, 50.0);
        let days = vec![
            d(2025, 1, 30),
            d(2025, 1, 31),
            d(2025, 2, 3),
            d(2025, 2, 4),
            d(2025, 2, 5),
        ];
        let workdays: WorkdaysByProject = [(p.name.clone(), days)].into_iter().collect();
        let mut assignment = Assignment::new();
        assignment.insert(p.name.clone(), MonthKey::new(2025, 1).unwrap(), 10.0);
        assignment.insert(p.name.clone(), MonthKey::new(2025, 2).unwrap(), 30.0);

        let results = compute_results(&period, &[p], &workdays, &assignment, 0.15);
        assert!((results[0].assigned_capacity_hours - 40.0).abs() < 1e-9);
        assert!((results[0].assigned_avg_per_day - 8.0).abs() < 1e-9);
    }
}
