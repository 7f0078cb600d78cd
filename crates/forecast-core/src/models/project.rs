//! Project model

use super::{DateInterval, MonthKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

/// Newtype for project names - the unique project key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for ProjectId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Deref for ProjectId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A time-boxed project drawing on the shared capacity pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: ProjectId,
    pub start: NaiveDate,
    pub end: NaiveDate,

    /// Remaining billable hours owed to the project (>= 0)
    pub rest_budget_hours: f64,

    /// Billing rate (>= 0)
    #[serde(alias = "rate_eur_per_h")]
    pub rate_per_hour: f64,

    /// Share of each month's capacity in percent, 0..=100
    #[serde(default)]
    pub weights_by_month: BTreeMap<MonthKey, f64>,

    /// Optional cap on used hours per month; absent months are unbounded
    #[serde(default)]
    pub limits_by_month: BTreeMap<MonthKey, f64>,
}

impl Project {
    pub fn span(&self) -> DateInterval {
        DateInterval {
            start: self.start,
            end: self.end,
        }
    }

    pub fn limit(&self, month: MonthKey) -> Option<f64> {
        self.limits_by_month.get(&month).copied()
    }
}
