//! Calendar month value type

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month (year + month)
///
/// Orders chronologically (year first, then month) and always renders
/// zero-padded as `YYYY-MM`, so string and value ordering agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key, `None` if `month` is not in 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (0..=9999).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// Month containing `date`
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month (December rolls over into January)
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Error for month strings not shaped like `YYYY-MM`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMonthError(String);

impl fmt::Display for ParseMonthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid month '{}' (expected YYYY-MM)", self.0)
    }
}

impl std::error::Error for ParseMonthError {}

impl FromStr for MonthKey {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthError(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(err());
        }
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        MonthKey::new(year, month).ok_or_else(err)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(MonthKey::new(2024, 9).unwrap().to_string(), "2024-09");
        assert_eq!(MonthKey::new(812, 1).unwrap().to_string(), "0812-01");
    }

    #[test]
    fn test_ordering_across_year_boundary() {
        let dec = MonthKey::new(2024, 12).unwrap();
        let jan = MonthKey::new(2025, 1).unwrap();
        let sep = MonthKey::new(2024, 9).unwrap();
        let oct = MonthKey::new(2024, 10).unwrap();
        assert!(dec < jan);
        assert!(sep < oct);
        assert_eq!(dec.succ(), jan);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "2025-03".parse::<MonthKey>().unwrap(),
            MonthKey::new(2025, 3).unwrap()
        );
        assert_eq!(
            "2025-3".parse::<MonthKey>().unwrap(),
            MonthKey::new(2025, 3).unwrap()
        );
        assert!("2025-13".parse::<MonthKey>().is_err());
        assert!("2025".parse::<MonthKey>().is_err());
        assert!("25-01".parse::<MonthKey>().is_err());
        assert!("2025-01-01".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_of_date() {
        let d = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        let m = MonthKey::of(d);
        assert_eq!(m.to_string(), "2025-02");
    }
}
