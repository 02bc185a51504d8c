//! ISO-8601 week arithmetic.
//!
//! A [`WeekKey`] identifies one calendar week in `YYYY-Www` form (week 1 is
//! the week containing the first Thursday of the year). All functions here
//! are pure; storage never leaks into this module.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday as ChronoWeekday};
use serde::{Deserialize, Serialize};

use crate::errors::{AtelierError, AtelierResult};

/// A validated ISO week identifier.
///
/// Construction always goes through [`WeekKey::new`] or [`FromStr`], so a
/// value of this type is guaranteed to name an existing ISO week (weeks 1-52,
/// or 1-53 in long years).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    pub fn new(year: i32, week: u32) -> AtelierResult<Self> {
        if week == 0 || week > iso_weeks_in_year(year) {
            return Err(AtelierError::InvalidWeekKey(format!(
                "week {week} is out of range for year {year}"
            )));
        }
        Ok(Self { year, week })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u32 {
        self.week
    }

    /// The week containing `now`, the safe fallback for invalid input.
    pub fn current(now: DateTime<Utc>) -> Self {
        Self::containing(now.date_naive())
    }

    /// The week containing the given date.
    pub fn containing(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Monday of this week.
    pub fn monday(&self) -> NaiveDate {
        // The week number is validated on construction, so the ISO date
        // always resolves.
        NaiveDate::from_isoywd_opt(self.year, self.week, ChronoWeekday::Mon)
            .expect("week number validated on construction")
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = AtelierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || AtelierError::InvalidWeekKey(s.to_string());

        let (year_part, week_part) = s.split_once("-W").ok_or_else(malformed)?;
        if year_part.len() != 4
            || week_part.len() != 2
            || !year_part.bytes().all(|b| b.is_ascii_digit())
            || !week_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let year: i32 = year_part.parse().map_err(|_| malformed())?;
        let week: u32 = week_part.parse().map_err(|_| malformed())?;
        Self::new(year, week)
    }
}

impl TryFrom<String> for WeekKey {
    type Error = AtelierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}

/// Number of ISO weeks in a year: 52, or 53 for long years (e.g. 2020).
pub fn iso_weeks_in_year(year: i32) -> u32 {
    if NaiveDate::from_isoywd_opt(year, 53, ChronoWeekday::Mon).is_some() {
        53
    } else {
        52
    }
}

/// The seven dates of a week, Monday first.
pub fn week_dates(key: WeekKey) -> [NaiveDate; 7] {
    let monday = key.monday();
    std::array::from_fn(|i| monday + Duration::days(i as i64))
}

/// The week exactly 7 days before, rolling over year boundaries.
pub fn previous_week(key: WeekKey) -> WeekKey {
    WeekKey::containing(key.monday() - Duration::weeks(1))
}

/// The week exactly 7 days after, rolling over year boundaries.
pub fn next_week(key: WeekKey) -> WeekKey {
    WeekKey::containing(key.monday() + Duration::weeks(1))
}
