//! Forecast computation pipeline
//!
//! Calendar → capacity → weights/allocation → results → budget. Every stage
//! is a pure function returning a fresh value; nothing is cached between runs.

pub mod allocation;
pub mod budget;
pub mod calendar;
pub mod capacity;
pub mod holidays;
pub mod results;

pub use allocation::{
    assign_capacity_by_project_month, compute_month_weights, Assignment, ProjectsByMonth,
    WeightTable, WEIGHT_EPSILON,
};
pub use budget::{sequence_budget, BudgetConsumption, BudgetStatus, MonthAllocation};
pub use calendar::{intersection, is_weekday, resolve_holidays, workdays_in_period, WorkCalendar};
pub use capacity::{
    aggregate_capacity_by_month, compute_capacity_by_date, CapacityByDate, CapacityByMonth,
};
pub use holidays::{easter_sunday, GermanHolidays, GermanState, HolidaySource, NoHolidays};
pub use results::{
    compute_results, round_to_multiple, workdays_per_month, CompletionTarget, ProjectResult,
    TargetValues, WorkdaysByProject,
};
