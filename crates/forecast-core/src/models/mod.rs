//! Data models for forecast

pub mod config;
pub mod month;
pub mod period;
pub mod project;
pub mod weekday;

pub use config::{
    CalendarConfig, CapacityConfig, ForecastConfig, IntervalOverride, Locale, Settings,
    SicknessConfig,
};
pub use month::{MonthKey, ParseMonthError};
pub use period::DateInterval;
pub use project::{Project, ProjectId};
pub use weekday::WeekdayProfile;
