//! Sequential budget consumption per project
//!
//! Months are walked in chronological order. Each month uses
//! `min(assigned, limit, remaining)` and the remainder carries forward, so
//! the order of months changes the outcome.

use crate::models::MonthKey;
use serde::Serialize;
use std::collections::BTreeMap;

/// Remaining budget at or below this counts as used up
pub const BUDGET_EPSILON: f64 = 1e-9;

/// Tolerance between total used hours and the original budget
pub const EXACT_TOLERANCE: f64 = 1e-6;

/// How a project's budget ended after all months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetStatus {
    /// Used up in the project's last active month
    Exact,
    /// Budget left after the last month
    Leftover,
    /// Used up before the last active month
    EarlyExhausted,
}

impl BudgetStatus {
    pub fn css_class(&self) -> &'static str {
        match self {
            BudgetStatus::Exact => "status-ok",
            BudgetStatus::Leftover => "status-warn",
            BudgetStatus::EarlyExhausted => "status-error",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::Exact => "exact",
            BudgetStatus::Leftover => "leftover",
            BudgetStatus::EarlyExhausted => "early-exhausted",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BudgetStatus::Exact => "budget used up exactly at project end",
            BudgetStatus::Leftover => "budget not fully used",
            BudgetStatus::EarlyExhausted => "budget exhausted before project end",
        }
    }
}

/// Input for one month of a project
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthAllocation {
    pub month: MonthKey,
    pub assigned: f64,

    /// Usage cap, `None` is unbounded
    pub limit: Option<f64>,

    /// Whether the project has workdays in this month
    pub active: bool,
}

/// Outcome of walking one project's months
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetConsumption {
    pub used: BTreeMap<MonthKey, f64>,
    pub total_used: f64,
    pub remaining: f64,

    /// First month in which the remaining budget reached zero
    pub exhausted_in: Option<MonthKey>,
    pub status: BudgetStatus,
}

impl BudgetConsumption {
    /// Used hours in `month`, 0 for months not walked
    pub fn used_in(&self, month: MonthKey) -> f64 {
        self.used.get(&month).copied().unwrap_or(0.0)
    }
}

/// Deplete `rest_budget_hours` month by month
///
/// `months` may come in any order; they are processed ascending.
pub fn sequence_budget(rest_budget_hours: f64, months: &[MonthAllocation]) -> BudgetConsumption {
    let mut ordered = months.to_vec();
    ordered.sort_by_key(|m| m.month);

    let budget = rest_budget_hours.max(0.0);
    let mut remaining = budget;
    let mut used = BTreeMap::new();
    let mut exhausted_in = None;

    for m in &ordered {
        let cap = m.limit.unwrap_or(f64::INFINITY);
        let consume = m.assigned.min(cap).min(remaining).max(0.0);
        remaining = (remaining - consume).max(0.0);
        used.insert(m.month, consume);

        if exhausted_in.is_none() && consume > 0.0 && remaining <= BUDGET_EPSILON {
            exhausted_in = Some(m.month);
        }
    }

    let total_used: f64 = used.values().sum();
    let last_active = ordered.iter().rev().find(|m| m.active).map(|m| m.month);

    let status = if remaining > BUDGET_EPSILON {
        BudgetStatus::Leftover
    } else if budget <= BUDGET_EPSILON {
        // Nothing to consume: used equals budget trivially
        BudgetStatus::Exact
    } else if exhausted_in.is_some()
        && exhausted_in == last_active
        && (total_used - budget).abs() <= EXACT_TOLERANCE
    {
        BudgetStatus::Exact
    } else {
        BudgetStatus::EarlyExhausted
    };

    BudgetConsumption {
        used,
        total_used,
        remaining,
        exhausted_in,
        status,
    }
}
