//! Weight resolution and capacity allocation
//!
//! Each month's capacity is split across the projects active that month.
//! Without explicit weights the split is equal; with explicit weights the
//! values are taken as given and must not exceed 100% in total.

use super::capacity::CapacityByMonth;
use crate::error::{ForecastError, Result};
use crate::models::{MonthKey, ProjectId};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Tolerance for the 100% weight ceiling
pub const WEIGHT_EPSILON: f64 = 1e-9;

/// Explicit month weights (percent) per project
pub type WeightTable = BTreeMap<ProjectId, BTreeMap<MonthKey, f64>>;

/// Projects active in each month
pub type ProjectsByMonth = BTreeMap<MonthKey, Vec<ProjectId>>;

/// Resolved weight (percent) per active project for one month
///
/// - zero active projects: empty
/// - explicit weights sum to exactly 0: equal split, `100 / count` each
/// - otherwise: explicit values, missing entries count as 0;
///   a sum above `100 + WEIGHT_EPSILON` is a validation error
pub fn compute_month_weights(
    active: &[ProjectId],
    explicit: &WeightTable,
    month: MonthKey,
) -> Result<BTreeMap<ProjectId, f64>> {
    if active.is_empty() {
        return Ok(BTreeMap::new());
    }

    let weights: BTreeMap<ProjectId, f64> = active
        .iter()
        .map(|p| {
            let w = explicit
                .get(p)
                .and_then(|by_month| by_month.get(&month))
                .copied()
                .unwrap_or(0.0);
            (p.clone(), w)
        })
        .collect();
    let total: f64 = weights.values().sum();

    if total == 0.0 {
        let equal = 100.0 / active.len() as f64;
        return Ok(active.iter().map(|p| (p.clone(), equal)).collect());
    }
    if total > 100.0 + WEIGHT_EPSILON {
        return Err(ForecastError::WeightsExceeded { month, total });
    }

    Ok(weights)
}

/// Assigned hours per (project, month)
///
/// Absent entries mean zero: months without capacity or without active
/// projects produce nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Assignment {
    #[serde(serialize_with = "serialize_hours")]
    hours: BTreeMap<(ProjectId, MonthKey), f64>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, project: ProjectId, month: MonthKey, hours: f64) {
        self.hours.insert((project, month), hours);
    }

    /// Assigned hours, 0 when nothing was assigned
    pub fn get(&self, project: &ProjectId, month: MonthKey) -> f64 {
        self.hours
            .get(&(project.clone(), month))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProjectId, MonthKey, f64)> {
        self.hours.iter().map(|((p, m), h)| (p, *m, *h))
    }

    /// Total assigned hours across all projects in `month`
    pub fn month_total(&self, month: MonthKey) -> f64 {
        self.iter().filter(|(_, m, _)| *m == month).map(|(_, _, h)| h).sum()
    }
}

/// `{ "project": { "YYYY-MM": hours } }` instead of tuple keys
fn serialize_hours<S: serde::Serializer>(
    hours: &BTreeMap<(ProjectId, MonthKey), f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut nested: BTreeMap<&ProjectId, BTreeMap<MonthKey, f64>> = BTreeMap::new();
    for ((project, month), h) in hours {
        nested.entry(project).or_default().insert(*month, *h);
    }
    nested.serialize(serializer)
}

/// Distribute each month's capacity over its active projects by weight
pub fn assign_capacity_by_project_month(
    capacity_by_month: &CapacityByMonth,
    projects_by_month: &ProjectsByMonth,
    explicit: &WeightTable,
) -> Result<Assignment> {
    let mut assignment = Assignment::new();

    for (month, capacity) in capacity_by_month {
        let Some(active) = projects_by_month.get(month) else {
            continue;
        };
        if active.is_empty() || *capacity <= 0.0 {
            continue;
        }

        let weights = compute_month_weights(active, explicit, *month)?;
        for project in active {
            let weight = weights.get(project).copied().unwrap_or(0.0);
            assignment.insert(project.clone(), *month, capacity * weight / 100.0);
        }
        debug!(
            %month,
            capacity,
            assigned = assignment.month_total(*month),
            "Assigned month"
        );
    }

    debug!(entries = assignment.len(), "Assigned capacity");
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(y: i32, month: u32) -> MonthKey {
        MonthKey::new(y, month).unwrap()
    }

    fn ids(names: &[&str]) -> Vec<ProjectId> {
        names.iter().map(|n| ProjectId::from(*n)).collect()
    }

    fn weights(entries: &[(&str, MonthKey, f64)]) -> WeightTable {
        let mut table = WeightTable::new();
        for (name, month, w) in entries {
            table
                .entry(ProjectId::from(*name))
                .or_default()
                .insert(*month, *w);
        }
        table
    }

    #[test]
    fn test_equal_split_without_weights() {
        let active = ids(&["A", "B", "C"]);
        let w = compute_month_weights(&active, &WeightTable::new(), m(2025, 1)).unwrap();
        assert_eq!(w.len(), 3);
        let total: f64 = w.values().sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_active_projects() {
        let w = compute_month_weights(&[], &WeightTable::new(), m(2025, 1)).unwrap();
        assert!(w.is_empty());
    }

    #[test]
    fn test_explicit_weights_used_as_is() {
        let jan = m(2025, 1);
        let active = ids(&["A", "B"]);
        let table = weights(&[("A", jan, 30.0)]);
        let w = compute_month_weights(&active, &table, jan).unwrap();
        assert_eq!(w[&ProjectId::from("A")], 30.0);
        assert_eq!(w[&ProjectId::from("B")], 0.0);
    }

    #[test]
    fn test_weights_for_other_months_ignored() {
        let jan = m(2025, 1);
        let feb = m(2025, 2);
        let active = ids(&["A", "B"]);
        let table = weights(&[("A", feb, 80.0)]);
        let w = compute_month_weights(&active, &table, jan).unwrap();
        assert_eq!(w[&ProjectId::from("A")], 50.0);
    }

    #[test]
    fn test_weights_over_100_rejected() {
        let jan = m(2025, 1);
        let active = ids(&["A", "B"]);
        let table = weights(&[("A", jan, 60.0), ("B", jan, 50.0)]);
        let err = compute_month_weights(&active, &table, jan).unwrap_err();
        assert!(matches!(err, ForecastError::WeightsExceeded { total, .. } if total == 110.0));

        let exact = weights(&[("A", jan, 60.0), ("B", jan, 40.0)]);
        assert!(compute_month_weights(&active, &exact, jan).is_ok());
    }

    #[test]
    fn test_weight_ceiling_tolerance() {
        let jan = m(2025, 1);
        let three = ids(&["A", "B", "C"]);
        let thirds = weights(&[("A", jan, 33.3), ("B", jan, 33.3), ("C", jan, 33.4)]);
        let w = compute_month_weights(&three, &thirds, jan).unwrap();
        assert!((w.values().sum::<f64>() - 100.0).abs() <= WEIGHT_EPSILON);

        let active = ids(&["A", "B"]);
        let within = weights(&[("A", jan, 50.0), ("B", jan, 50.0 + 1e-10)]);
        let w = compute_month_weights(&active, &within, jan).unwrap();
        assert!(w.values().sum::<f64>() > 100.0);

        let over = weights(&[("A", jan, 60.0), ("B", jan, 40.0 + 1e-6)]);
        let err = compute_month_weights(&active, &over, jan).unwrap_err();
        assert!(matches!(err, ForecastError::WeightsExceeded { month, .. } if month == jan));
    }

    #[test]
    fn test_two_projects_share_month_equally() {
        let jan = m(2025, 1);
        let capacity: CapacityByMonth = [(jan, 160.0)].into_iter().collect();
        let by_month: ProjectsByMonth = [(jan, ids(&["A", "B"]))].into_iter().collect();
        let assignment =
            assign_capacity_by_project_month(&capacity, &by_month, &WeightTable::new()).unwrap();
        assert_eq!(assignment.get(&ProjectId::from("A"), jan), 80.0);
        assert_eq!(assignment.get(&ProjectId::from("B"), jan), 80.0);
        assert_eq!(assignment.month_total(jan), 160.0);
    }

    #[test]
    fn test_zero_capacity_and_idle_months_produce_no_entries() {
        let jan = m(2025, 1);
        let feb = m(2025, 2);
        let mar = m(2025, 3);
        let capacity: CapacityByMonth = [(jan, 0.0), (feb, 100.0), (mar, 50.0)]
            .into_iter()
            .collect();
        let by_month: ProjectsByMonth = [(jan, ids(&["A"])), (mar, ids(&["A"]))]
            .into_iter()
            .collect();
        let assignment =
            assign_capacity_by_project_month(&capacity, &by_month, &WeightTable::new()).unwrap();
        assert_eq!(assignment.len(), 1);
        assert!(assignment.iter().all(|(_, month, _)| month != jan));
        assert_eq!(assignment.get(&ProjectId::from("A"), mar), 50.0);
    }

    #[test]
    fn test_explicit_weight_allocation() {
        let jan = m(2025, 1);
        let capacity: CapacityByMonth = [(jan, 100.0)].into_iter().collect();
        let by_month: ProjectsByMonth = [(jan, ids(&["A"]))].into_iter().collect();
        let table = weights(&[("A", jan, 60.0)]);
        let assignment = assign_capacity_by_project_month(&capacity, &by_month, &table).unwrap();
        assert_eq!(assignment.get(&ProjectId::from("A"), jan), 60.0);
    }
}
