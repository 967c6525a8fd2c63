// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar month arithmetic shared by the engine, the store and the CLI.

use crate::errors::BudgetError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self, BudgetError> {
        // NaiveDate bounds the year as well as the month.
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(BudgetError::InvalidPeriod(format!("{}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// Parses a `YYYY-MM` period key.
    pub fn parse(s: &str) -> Result<Self, BudgetError> {
        let raw = s.trim();
        let invalid = || BudgetError::InvalidPeriod(raw.to_string());
        let (y, m) = raw.split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

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

    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(&self) -> Self {
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

    pub fn days_in_month(&self) -> u32 {
        match self.month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            _ => {
                if NaiveDate::from_ymd_opt(self.year, 2, 29).is_some() {
                    29
                } else {
                    28
                }
            }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        self.day(1)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.day(self.days_in_month())
    }

    /// The given day of this month, clamped to the month's last day.
    pub fn day(&self, day: u32) -> NaiveDate {
        let d = day.clamp(1, self.days_in_month());
        // year/month were validated on construction and d is clamped into range
        NaiveDate::from_ymd_opt(self.year, self.month, d).unwrap_or(NaiveDate::MIN)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn months_of_year(year: i32) -> Vec<Self> {
        (1..=12).map(|month| Self { year, month }).collect()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_rolls_over_year() {
        let p = Period::parse("2024-01").unwrap();
        assert_eq!(p.previous().key(), "2023-12");
        assert_eq!(Period::parse("2023-12").unwrap().next().key(), "2024-01");
    }

    #[test]
    fn february_length_follows_leap_years() {
        assert_eq!(Period::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(Period::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(Period::new(1900, 2).unwrap().days_in_month(), 28);
        assert_eq!(Period::new(2000, 2).unwrap().days_in_month(), 29);
    }

    #[test]
    fn day_clamps_to_month_end() {
        let april = Period::new(2024, 4).unwrap();
        assert_eq!(april.day(31), NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
        assert_eq!(april.day(0), NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }

    #[test]
    fn rejects_malformed_keys() {
        for bad in ["2024-13", "2024-00", "24-06", "2024-6", "2024/06", "", "default"] {
            assert!(Period::parse(bad).is_err(), "{bad} should not parse");
        }
        assert_eq!(Period::parse(" 2024-06 ").unwrap().key(), "2024-06");
    }

    #[test]
    fn ordering_is_chronological() {
        let a = Period::parse("2023-12").unwrap();
        let b = Period::parse("2024-01").unwrap();
        assert!(a < b);
        assert!(b.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert!(!a.contains(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()));
    }
}
