//! Report assembly: runs the pipeline and shapes its output into tables
//!
//! [`Forecast::compute`] is the single entry point used by the CLI and the
//! live preview. The resulting [`ForecastReport`] holds typed figures and
//! builds [`ReportTable`]s on demand.

mod table;

pub use table::{Cell, ReportTable, TableRow};

use crate::engine::{
    aggregate_capacity_by_month, assign_capacity_by_project_month, compute_capacity_by_date,
    compute_results, sequence_budget, workdays_per_month, BudgetConsumption, CapacityByMonth,
    HolidaySource, MonthAllocation, ProjectResult, ProjectsByMonth, WeightTable, WorkCalendar,
    WorkdaysByProject,
};
use crate::error::Result;
use crate::models::{DateInterval, ForecastConfig, Locale, MonthKey, Project, ProjectId};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Figures of one project in one month of the report axis
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MonthFigures {
    /// Project workdays in the month
    pub workdays: usize,
    pub assigned: f64,
    pub assigned_per_day: f64,

    /// Daily pace that bills the full budget, with the budget spread over
    /// months in proportion to their share of the assigned total
    pub required_per_day: f64,
    pub used: f64,
    pub unused: f64,
    pub used_per_day: f64,
}

/// Result, month breakdown and budget outcome of one project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectReport {
    #[serde(flatten)]
    pub result: ProjectResult,
    pub months: BTreeMap<MonthKey, MonthFigures>,
    pub budget: BudgetConsumption,
    pub notes: Vec<String>,
}

impl ProjectReport {
    /// Figures for `month`, zero when the project has nothing there
    pub fn month(&self, month: MonthKey) -> MonthFigures {
        self.months.get(&month).copied().unwrap_or_default()
    }
}

/// Headline numbers for the planning period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub planning_period: DateInterval,
    pub vacation_days: usize,
    pub weekday_holidays: usize,
    pub total_capacity_hours: f64,
    pub project_count: usize,
}

/// Everything the renderers need
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub locale: Locale,
    pub overview: Overview,

    /// Vacation days inside the planning period, ascending
    pub vacations: Vec<NaiveDate>,

    /// Months with at least one project workday, ascending
    pub months: Vec<MonthKey>,
    pub capacity_by_month: CapacityByMonth,
    pub projects: Vec<ProjectReport>,
}

/// Forecast pipeline entry point
pub struct Forecast;

impl Forecast {
    /// Run the full pipeline over a validated configuration
    ///
    /// Fails only on arithmetic invariants (month weights above 100%).
    pub fn compute(config: &ForecastConfig, holidays: &dyn HolidaySource) -> Result<ForecastReport> {
        let settings = &config.settings;
        let planning = settings.planning_period;

        let calendar = WorkCalendar::resolve(&planning, &settings.region, holidays, &config.calendar);
        let all_workdays = calendar.workdays(&planning);
        let capacity_by_date = compute_capacity_by_date(
            &all_workdays,
            &config.capacity.per_weekday,
            &config.capacity.interval_overrides,
            config.sickness.prob_per_workday,
        );
        let capacity_by_month = aggregate_capacity_by_month(&capacity_by_date);
        debug!(
            workdays = all_workdays.len(),
            months = capacity_by_month.len(),
            "Computed capacity"
        );

        let mut included: Vec<&Project> = Vec::new();
        let mut projects_by_month = ProjectsByMonth::new();
        let mut weights = WeightTable::new();
        let mut workdays_by_project = WorkdaysByProject::new();

        for project in &config.projects {
            let Some(cut) = planning.intersection(&project.span()) else {
                warn!(project = %project.name, "Project outside planning period, omitted");
                continue;
            };
            let workdays = calendar.workdays(&cut);
            if workdays.is_empty() {
                warn!(project = %project.name, "Project has no workdays in planning period, omitted");
                continue;
            }

            for month in cut.months() {
                projects_by_month
                    .entry(month)
                    .or_default()
                    .push(project.name.clone());
            }
            weights.insert(project.name.clone(), project.weights_by_month.clone());
            workdays_by_project.insert(project.name.clone(), workdays);
            included.push(project);
        }

        let assignment =
            assign_capacity_by_project_month(&capacity_by_month, &projects_by_month, &weights)?;
        let included_projects: Vec<Project> = included.iter().map(|p| (*p).clone()).collect();
        let results = compute_results(
            &planning,
            &included_projects,
            &workdays_by_project,
            &assignment,
            settings.round_hours,
        );

        let months: Vec<MonthKey> = workdays_by_project
            .values()
            .flatten()
            .map(|d| MonthKey::of(*d))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let by_name: BTreeMap<&ProjectId, &Project> =
            included.iter().copied().map(|p| (&p.name, p)).collect();

        let projects = results
            .into_iter()
            .map(|result| {
                let workdays = workdays_by_project
                    .get(&result.name)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let project = by_name.get(&result.name).copied();
                let assigned: BTreeMap<MonthKey, f64> = months
                    .iter()
                    .map(|m| (*m, assignment.get(&result.name, *m)))
                    .collect();
                build_project_report(result, &months, workdays, &assigned, project)
            })
            .collect::<Vec<_>>();

        let overview = Overview {
            planning_period: planning,
            vacation_days: calendar.vacations_in(&planning).len(),
            weekday_holidays: calendar.weekday_holidays_in(&planning).len(),
            total_capacity_hours: capacity_by_date.values().sum(),
            project_count: projects.len(),
        };

        debug!(
            projects = projects.len(),
            months = months.len(),
            "Assembled forecast report"
        );

        Ok(ForecastReport {
            locale: settings.locale,
            overview,
            vacations: calendar.vacations_in(&planning),
            months,
            capacity_by_month,
            projects,
        })
    }
}

fn build_project_report(
    result: ProjectResult,
    months: &[MonthKey],
    workdays: &[NaiveDate],
    assigned: &BTreeMap<MonthKey, f64>,
    project: Option<&Project>,
) -> ProjectReport {
    let days_per_month = workdays_per_month(workdays);
    let days_in = |m: &MonthKey| days_per_month.get(m).copied().unwrap_or(0);
    let assigned_in = |m: &MonthKey| assigned.get(m).copied().unwrap_or(0.0);

    let allocations: Vec<MonthAllocation> = months
        .iter()
        .map(|m| MonthAllocation {
            month: *m,
            assigned: assigned_in(m),
            limit: project.and_then(|p| p.limit(*m)),
            active: days_in(m) > 0,
        })
        .collect();
    let budget = sequence_budget(result.rest_budget_hours, &allocations);

    let total_assigned: f64 = months.iter().map(assigned_in).sum();
    let per_day = |hours: f64, days: usize| if days > 0 { hours / days as f64 } else { 0.0 };

    let figures = months
        .iter()
        .map(|m| {
            let days = days_in(m);
            let assigned = assigned_in(m);
            let used = budget.used_in(*m);
            let required_per_day = if total_assigned > 0.0 && days > 0 {
                result.rest_budget_hours * (assigned / total_assigned) / days as f64
            } else {
                0.0
            };
            let figures = MonthFigures {
                workdays: days,
                assigned,
                assigned_per_day: per_day(assigned, days),
                required_per_day,
                used,
                unused: (assigned - used).max(0.0),
                used_per_day: per_day(used, days),
            };
            (*m, figures)
        })
        .collect();

    let notes = project_notes(&result);
    ProjectReport {
        result,
        months: figures,
        budget,
        notes,
    }
}

fn project_notes(result: &ProjectResult) -> Vec<String> {
    if !result.has_capacity() {
        return vec!["no capacity assigned".to_string()];
    }
    result
        .targets_over_capacity()
        .into_iter()
        .map(|t| format!("{} target > capacity/day", t.label()))
        .collect()
}

// ============================================================================
// Tables
// ============================================================================

impl ForecastReport {
    pub fn project(&self, name: &str) -> Option<&ProjectReport> {
        self.projects.iter().find(|p| p.result.name.as_str() == name)
    }

    pub fn overview_table(&self) -> ReportTable {
        let o = &self.overview;
        let mut table = ReportTable::new("Overview", vec!["Name".into(), "Value".into()]);
        let rows = [
            ("Planning period", Cell::text(o.planning_period.to_string())),
            ("Σ Vacation days", Cell::Count(o.vacation_days)),
            ("Σ Holidays", Cell::Count(o.weekday_holidays)),
            ("Σ Capacity (h)", Cell::number(o.total_capacity_hours)),
            ("Σ Projects", Cell::Count(o.project_count)),
        ];
        for (label, value) in rows {
            table.push(TableRow::new(vec![Cell::text(label), value]));
        }
        table
    }

    /// Period, days, capacity, revenue and notes per project
    pub fn summary_table(&self) -> ReportTable {
        let headers = [
            "Project",
            "Period",
            "Days",
            "Capacity (h)",
            "Revenue 100%",
            "Revenue 90%",
            "Revenue 80%",
            "Notes",
        ];
        let mut table = ReportTable::new("Projects", owned(&headers));
        for p in &self.projects {
            let r = &p.result;
            table.push(TableRow::new(vec![
                Cell::text(r.name.as_str()),
                Cell::text(r.period.to_string()),
                Cell::Count(r.workdays),
                Cell::number(r.assigned_capacity_hours),
                Cell::currency(r.revenue.full),
                Cell::currency(r.revenue.ninety),
                Cell::currency(r.revenue.eighty),
                Cell::text(p.notes.join(", ")),
            ]));
        }
        table
    }

    /// Every computed result column, for terminal output
    pub fn results_table(&self) -> ReportTable {
        let headers = [
            "Project",
            "Period",
            "Days",
            "Capacity (h)",
            "Avg cap/day",
            "h/day 100%",
            "h/day 90%",
            "h/day 80%",
            "Util 100%",
            "Util 90%",
            "Util 80%",
            "Revenue 100%",
            "Revenue 90%",
            "Revenue 80%",
        ];
        let mut table = ReportTable::new("Results", owned(&headers));
        for p in &self.projects {
            let r = &p.result;
            let mut cells = vec![
                Cell::text(r.name.as_str()),
                Cell::text(r.period.to_string()),
                Cell::Count(r.workdays),
                Cell::number(r.assigned_capacity_hours),
                Cell::number(r.assigned_avg_per_day),
            ];
            cells.extend(r.required_per_day.iter().map(|(_, v)| Cell::number(*v)));
            cells.extend(r.utilization.iter().map(|(_, v)| Cell::number(*v)));
            cells.extend(r.revenue.iter().map(|(_, v)| Cell::currency(*v)));
            table.push(TableRow::new(cells));
        }
        table
    }

    pub fn assigned_table(&self) -> ReportTable {
        self.monthly_table("Assigned capacity (h)", |f| f.assigned)
    }

    pub fn assigned_per_day_table(&self) -> ReportTable {
        self.monthly_table("Assigned h/workday", |f| f.assigned_per_day)
    }

    pub fn required_per_day_table(&self) -> ReportTable {
        self.monthly_table("Required h/workday (100%)", |f| f.required_per_day)
    }

    pub fn used_table(&self) -> ReportTable {
        self.monthly_table("Used hours", |f| f.used)
    }

    pub fn unused_table(&self) -> ReportTable {
        self.monthly_table("Unused hours", |f| f.unused)
    }

    pub fn used_per_day_table(&self) -> ReportTable {
        self.monthly_table("Used h/workday", |f| f.used_per_day)
    }

    /// Used hours per month, remaining budget and status per project
    pub fn budget_table(&self) -> ReportTable {
        let mut headers = self.month_headers();
        headers.push("Remaining budget (h)".into());
        headers.push("Status".into());
        let mut table = ReportTable::new("Budget consumption (h)", headers);

        for p in &self.projects {
            let mut cells = vec![Cell::text(p.result.name.as_str())];
            cells.extend(self.months.iter().map(|m| Cell::number(p.budget.used_in(*m))));
            cells.push(Cell::number(p.budget.remaining));
            cells.push(Cell::text(p.budget.status.description()));
            table.push(TableRow::new(cells).with_class(p.budget.status.css_class()));
        }
        table
    }

    fn month_headers(&self) -> Vec<String> {
        std::iter::once("Project".to_string())
            .chain(self.months.iter().map(MonthKey::to_string))
            .collect()
    }

    fn monthly_table(&self, title: &str, value: impl Fn(&MonthFigures) -> f64) -> ReportTable {
        let mut table = ReportTable::new(title, self.month_headers());
        for p in &self.projects {
            let mut cells = vec![Cell::text(p.result.name.as_str())];
            cells.extend(self.months.iter().map(|m| Cell::number(value(&p.month(*m)))));
            table.push(TableRow::new(cells));
        }
        table
    }
}

fn owned(headers: &[&str]) -> Vec<String> {
    headers.iter().map(|h| h.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BudgetStatus, NoHolidays};
    use crate::parsers::ConfigParser;

    const TWO_PROJECTS: &str = r#"
settings:
  state: ""
  round_hours: 0.25
  planning_period: { start: 2025-01-01, end: 2025-02-28 }
sickness:
  prob_per_workday: 0
projects:
  - name: A
    start: 2025-01-01
    end: 2025-02-28
    rest_budget_hours: 100
    rate_eur_per_h: 100
  - name: B
    start: 2025-02-01
    end: 2025-02-28
    rest_budget_hours: 500
    rate_eur_per_h: 80
    limits_by_month: { "2025-02": 40 }
  - name: Later
    start: 2025-06-01
    end: 2025-06-30
    rest_budget_hours: 10
    rate_eur_per_h: 80
"#;

    fn report() -> ForecastReport {
        let config = ConfigParser::parse_str(TWO_PROJECTS).unwrap();
        Forecast::compute(&config, &NoHolidays).unwrap()
    }

    #[test]
    fn test_months_and_overview() {
        let r = report();
        let months: Vec<String> = r.months.iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2025-01", "2025-02"]);
        // 23 weekdays in January, 20 in February
        assert_eq!(r.overview.total_capacity_hours, 43.0 * 8.0);
        assert_eq!(r.overview.project_count, 2);
        assert!(r.project("Later").is_none());
    }

    #[test]
    fn test_shared_month_split_and_budget() {
        let r = report();
        let feb = MonthKey::new(2025, 2).unwrap();
        let jan = MonthKey::new(2025, 1).unwrap();

        let a = r.project("A").unwrap();
        assert_eq!(a.month(jan).assigned, 184.0);
        assert_eq!(a.month(feb).assigned, 80.0);
        // 100h budget used up in January already
        assert_eq!(a.month(jan).used, 100.0);
        assert_eq!(a.month(feb).used, 0.0);
        assert_eq!(a.month(feb).unused, 80.0);
        assert_eq!(a.budget.status, BudgetStatus::EarlyExhausted);

        let b = r.project("B").unwrap();
        assert_eq!(b.month(jan), MonthFigures::default());
        assert_eq!(b.month(feb).used, 40.0);
        assert_eq!(b.month(feb).used_per_day, 2.0);
        assert_eq!(b.budget.remaining, 460.0);
        assert_eq!(b.budget.status, BudgetStatus::Leftover);
        assert_eq!(b.notes.len(), 3);
    }

    #[test]
    fn test_required_per_day_proportional() {
        let r = report();
        let a = r.project("A").unwrap();
        let jan = MonthKey::new(2025, 1).unwrap();
        // 184 of 264 assigned hours fall into January's 23 days
        let expected = 100.0 * (184.0 / 264.0) / 23.0;
        assert!((a.month(jan).required_per_day - expected).abs() < 1e-9);
    }

    #[test]
    fn test_tables() {
        let r = report();

        let budget = r.budget_table();
        assert_eq!(
            budget.headers,
            vec!["Project", "2025-01", "2025-02", "Remaining budget (h)", "Status"]
        );
        assert_eq!(budget.rows[0].class, Some("status-error"));
        assert_eq!(budget.rows[1].class, Some("status-warn"));
        assert_eq!(
            budget.lookup("B", "Remaining budget (h)").and_then(Cell::as_f64),
            Some(460.0)
        );

        let summary = r.summary_table();
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.lookup("A", "Days"), Some(&Cell::Count(43)));
        assert_eq!(
            summary.lookup("B", "Revenue 100%").and_then(Cell::as_f64),
            Some(40_000.0)
        );

        let results = r.results_table();
        assert_eq!(results.headers.len(), 14);
        assert_eq!(
            results.lookup("A", "Capacity (h)").and_then(Cell::as_f64),
            Some(264.0)
        );

        let overview = r.overview_table();
        assert_eq!(overview.rows.len(), 5);
        assert_eq!(r.assigned_table().rows.len(), 2);
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["months"][0], "2025-01");
        assert_eq!(json["projects"][0]["name"], "A");
        assert_eq!(json["projects"][0]["budget"]["status"], "early-exhausted");
        assert_eq!(json["projects"][1]["months"]["2025-02"]["used"], 40.0);
    }
}
