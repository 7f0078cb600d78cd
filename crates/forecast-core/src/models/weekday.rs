//! Per-weekday baseline hours

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Hours-per-day baseline for each weekday
///
/// Missing keys in the config fall back to the defaults: 8h Mon-Fri, 0 on
/// the weekend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekdayProfile {
    pub mon: f64,
    pub tue: f64,
    pub wed: f64,
    pub thu: f64,
    pub fri: f64,
    pub sat: f64,
    pub sun: f64,
}

impl Default for WeekdayProfile {
    fn default() -> Self {
        Self {
            mon: 8.0,
            tue: 8.0,
            wed: 8.0,
            thu: 8.0,
            fri: 8.0,
            sat: 0.0,
            sun: 0.0,
        }
    }
}

impl WeekdayProfile {
    /// Same hours on every day of the week
    #[cfg(test)]
    pub(crate) fn uniform(hours: f64) -> Self {
        Self {
            mon: hours,
            tue: hours,
            wed: hours,
            thu: hours,
            fri: hours,
            sat: hours,
            sun: hours,
        }
    }

    pub fn hours(&self, weekday: Weekday) -> f64 {
        match weekday {
            Weekday::Mon => self.mon,
            Weekday::Tue => self.tue,
            Weekday::Wed => self.wed,
            Weekday::Thu => self.thu,
            Weekday::Fri => self.fri,
            Weekday::Sat => self.sat,
            Weekday::Sun => self.sun,
        }
    }

    pub(crate) fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("mon", self.mon),
            ("tue", self.tue),
            ("wed", self.wed),
            ("thu", self.thu),
            ("fri", self.fri),
            ("sat", self.sat),
            ("sun", self.sun),
        ]
    }
}
