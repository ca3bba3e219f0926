//! Bi-weekly period ("quincena") resolution.
//!
//! A year is split into 24 fixed periods, two per calendar month: days 1-15
//! form the odd period, days 16 to month-end the even one. Periods are
//! identified by a short token (`"Q1"`..`"Q24"`). Because the split is a
//! day-of-month threshold, month length never needs special-casing: Q4 ends
//! on Feb 28 or 29, Q8 on Apr 30, and so on.

use crate::error::{DashboardError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const PERIODS_PER_YEAR: u32 = 24;

const MONTHS_SHORT: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];
const MONTHS_FULL: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Identifier of one bi-weekly period.
///
/// Wraps the raw token from the source data so that unrecognized values
/// (a typo in an explicit period column) still group consistently and
/// degrade to a passthrough label instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodId(String);

impl PeriodId {
    /// Wraps a raw token verbatim (trimmed). Used where the source column is
    /// authoritative even when empty, e.g. budget rows.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    /// Lenient parse: trims, rejects only empty input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Strict constructor for callers building period ids programmatically.
    pub fn from_index(ordinal: u32) -> Result<Self> {
        if !(1..=PERIODS_PER_YEAR).contains(&ordinal) {
            return Err(DashboardError::PeriodOutOfRange(ordinal));
        }
        Ok(Self(format!("Q{}", ordinal)))
    }

    /// Maps a calendar date to its period: day <= 15 resolves to the odd
    /// period of the month, day > 15 to the even one.
    pub fn from_date(date: NaiveDate) -> Self {
        let half = if date.day() <= 15 { 0 } else { 1 };
        Self(format!("Q{}", date.month0() * 2 + half + 1))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix of the token, or `None` when the token does not carry
    /// one (`"Q7"` -> 7, `""` or `"enero"` -> `None`). No range check: the
    /// label lookup decides what is in range.
    pub fn index(&self) -> Option<u32> {
        self.0.strip_prefix('Q')?.parse().ok()
    }

    /// Human-readable label for this period. Tokens outside `Q1..Q24`
    /// degrade to a passthrough label carrying the raw token.
    pub fn label(&self) -> PeriodLabel {
        match self.index() {
            Some(ordinal) if (1..=PERIODS_PER_YEAR).contains(&ordinal) => {
                let zero_based = ordinal - 1;
                let month_index = zero_based / 2;
                let half = (zero_based % 2) as u8 + 1;
                let days = if half == 2 { "16-31" } else { "1-15" };
                PeriodLabel {
                    short: format!("{} {}", MONTHS_SHORT[month_index as usize], days),
                    month: MONTHS_FULL[month_index as usize].to_string(),
                    half,
                    month_index,
                    ordinal,
                }
            }
            _ => PeriodLabel {
                short: self.0.clone(),
                month: String::new(),
                half: 1,
                month_index: 0,
                ordinal: 0,
            },
        }
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inverse of the date-to-period mapping, for display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodLabel {
    /// e.g. "Ene 1-15"
    pub short: String,
    /// Full month name, empty for degraded labels.
    pub month: String,
    /// 1 for days 1-15, 2 for days 16 to month-end.
    pub half: u8,
    /// 0-based calendar month.
    pub month_index: u32,
    /// 1-based period number within the year, 0 for degraded labels.
    pub ordinal: u32,
}

/// Three-letter Spanish abbreviation for a 0-based month index.
pub fn month_short_name(month_index: u32) -> &'static str {
    MONTHS_SHORT
        .get(month_index as usize)
        .copied()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_date_half_split() {
        assert_eq!(PeriodId::from_date(date(2025, 1, 10)).as_str(), "Q1");
        assert_eq!(PeriodId::from_date(date(2025, 1, 15)).as_str(), "Q1");
        assert_eq!(PeriodId::from_date(date(2025, 1, 16)).as_str(), "Q2");
        assert_eq!(PeriodId::from_date(date(2025, 1, 20)).as_str(), "Q2");
        assert_eq!(PeriodId::from_date(date(2025, 12, 31)).as_str(), "Q24");
    }

    #[test]
    fn test_from_date_month_length_irrelevant() {
        // Feb 28, Apr 30 and Dec 31 all land in the even period of their month.
        assert_eq!(PeriodId::from_date(date(2025, 2, 28)).as_str(), "Q4");
        assert_eq!(PeriodId::from_date(date(2024, 2, 29)).as_str(), "Q4");
        assert_eq!(PeriodId::from_date(date(2025, 4, 30)).as_str(), "Q8");
    }

    #[test]
    fn test_label_round_trip_half() {
        for day in 1..=28 {
            let d = date(2025, 3, day);
            let label = PeriodId::from_date(d).label();
            let expected_half = if day <= 15 { 1 } else { 2 };
            assert_eq!(label.half, expected_half, "day {}", day);
            assert_eq!(label.month, "Marzo");
        }
    }

    #[test]
    fn test_label_fields() {
        let label = PeriodId::new("Q3").label();
        assert_eq!(label.short, "Feb 1-15");
        assert_eq!(label.month, "Febrero");
        assert_eq!(label.half, 1);
        assert_eq!(label.month_index, 1);
        assert_eq!(label.ordinal, 3);
    }

    #[test]
    fn test_label_degrades_out_of_range() {
        let label = PeriodId::new("Q99").label();
        assert_eq!(label.short, "Q99");
        assert_eq!(label.month, "");
        assert_eq!(label.ordinal, 0);

        let label = PeriodId::new("enero").label();
        assert_eq!(label.short, "enero");
    }

    #[test]
    fn test_parse_and_index() {
        assert_eq!(PeriodId::parse("  Q7 ").unwrap().index(), Some(7));
        assert_eq!(PeriodId::parse(""), None);
        assert_eq!(PeriodId::parse("   "), None);
        assert_eq!(PeriodId::new("junk").index(), None);
    }

    #[test]
    fn test_from_index_bounds() {
        assert_eq!(PeriodId::from_index(1).unwrap().as_str(), "Q1");
        assert_eq!(PeriodId::from_index(24).unwrap().as_str(), "Q24");
        assert!(PeriodId::from_index(0).is_err());
        assert!(PeriodId::from_index(25).is_err());
    }
}
