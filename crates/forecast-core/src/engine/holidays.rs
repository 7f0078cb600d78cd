//! Region holiday lookup
//!
//! Holiday data is best-effort: a source that does not know a region returns
//! an empty set and the computation carries on without it.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

/// Provider of public holidays for a region and a span of years
pub trait HolidaySource: Send + Sync {
    /// Public holidays of `region` in every year of `years`
    ///
    /// Must not fail: unknown regions yield an empty set.
    fn holidays(&self, region: &str, years: RangeInclusive<i32>) -> BTreeSet<NaiveDate>;
}

/// Null source: no public holidays anywhere
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHolidays;

impl HolidaySource for NoHolidays {
    fn holidays(&self, _region: &str, _years: RangeInclusive<i32>) -> BTreeSet<NaiveDate> {
        BTreeSet::new()
    }
}

/// German federal states, by their two-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GermanState {
    BW,
    BY,
    BE,
    BB,
    HB,
    HH,
    HE,
    MV,
    NI,
    NW,
    RP,
    SL,
    SN,
    ST,
    SH,
    TH,
}

impl GermanState {
    /// Parse `NI`, `ni` or `DE-NI`
    pub fn from_code(code: &str) -> Option<Self> {
        let upper = code.trim().to_ascii_uppercase();
        let code = upper.strip_prefix("DE-").unwrap_or(&upper);
        let state = match code {
            "BW" => Self::BW,
            "BY" => Self::BY,
            "BE" => Self::BE,
            "BB" => Self::BB,
            "HB" => Self::HB,
            "HH" => Self::HH,
            "HE" => Self::HE,
            "MV" => Self::MV,
            "NI" => Self::NI,
            "NW" => Self::NW,
            "RP" => Self::RP,
            "SL" => Self::SL,
            "SN" => Self::SN,
            "ST" => Self::ST,
            "SH" => Self::SH,
            "TH" => Self::TH,
            _ => return None,
        };
        Some(state)
    }
}

/// Computed German public holidays (federal plus per-state)
#[derive(Debug, Clone, Copy, Default)]
pub struct GermanHolidays;

impl GermanHolidays {
    /// Holidays of one state in one year
    pub fn for_year(state: GermanState, year: i32) -> BTreeSet<NaiveDate> {
        use GermanState::*;

        let mut days = BTreeSet::new();
        let Some(easter) = easter_sunday(year) else {
            return days;
        };
        let fixed = |month: u32, day: u32| NaiveDate::from_ymd_opt(year, month, day);

        // Federal holidays
        days.extend(fixed(1, 1));
        days.insert(easter - Duration::days(2)); // Good Friday
        days.insert(easter + Duration::days(1)); // Easter Monday
        days.extend(fixed(5, 1));
        days.insert(easter + Duration::days(39)); // Ascension
        days.insert(easter + Duration::days(50)); // Whit Monday
        if year >= 1990 {
            days.extend(fixed(10, 3));
        }
        days.extend(fixed(12, 25));
        days.extend(fixed(12, 26));

        if matches!(state, BW | BY | ST) {
            days.extend(fixed(1, 6));
        }
        if (state == BE && year >= 2019) || (state == MV && year >= 2023) {
            days.extend(fixed(3, 8));
        }
        if state == BB {
            days.insert(easter);
            days.insert(easter + Duration::days(49));
        }
        if matches!(state, BW | BY | HE | NW | RP | SL) {
            days.insert(easter + Duration::days(60)); // Corpus Christi
        }
        if state == SL {
            days.extend(fixed(8, 15));
        }
        if state == TH && year >= 2019 {
            days.extend(fixed(9, 20));
        }
        let reformation = matches!(state, BB | MV | SN | ST | TH)
            || (matches!(state, HB | HH | NI | SH) && year >= 2018)
            || year == 2017;
        if reformation {
            days.extend(fixed(10, 31));
        }
        if matches!(state, BW | BY | NW | RP | SL) {
            days.extend(fixed(11, 1));
        }
        if state == SN {
            days.extend(repentance_day(year));
        }

        days
    }
}

impl HolidaySource for GermanHolidays {
    fn holidays(&self, region: &str, years: RangeInclusive<i32>) -> BTreeSet<NaiveDate> {
        if region.trim().is_empty() {
            debug!("No region configured, skipping holiday lookup");
            return BTreeSet::new();
        }
        let Some(state) = GermanState::from_code(region) else {
            warn!(region, "Unknown holiday region, continuing without public holidays");
            return BTreeSet::new();
        };
        years
            .flat_map(|year| Self::for_year(state, year))
            .collect()
    }
}

/// Easter Sunday (anonymous Gregorian algorithm)
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Wednesday before November 23rd
fn repentance_day(year: i32) -> Option<NaiveDate> {
    let mut day = NaiveDate::from_ymd_opt(year, 11, 22)?;
    while day.weekday() != Weekday::Wed {
        day = day.pred_opt()?;
    }
    Some(day)
}
