//! forecast-core - Capacity-vs-demand forecasting for time-boxed projects
//!
//! Loads a YAML configuration, derives workdays and capacity, distributes
//! capacity across concurrently active projects by monthly weights, and
//! computes required pace, utilization, revenue and budget consumption.

pub mod engine;
pub mod error;
pub mod export;
pub mod format;
pub mod models;
pub mod parsers;
pub mod report;

pub use engine::{GermanHolidays, HolidaySource, NoHolidays};
pub use error::{ErrorKind, ForecastError, Result};
pub use export::{export_report_to_html, export_table_to_csv, render_csv, render_html};
pub use models::{ForecastConfig, Locale, MonthKey, ProjectId};
pub use parsers::{ConfigOverrides, ConfigParser};
pub use report::{Forecast, ForecastReport};
