// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar periods. Every window here is half-open: `[start, end)`.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> CoreResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::invalid(
                "month",
                format!("{} is outside 1-12", month),
            ));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CoreError::invalid(
                "year",
                format!("{} is outside the supported calendar", year),
            ));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // year and month are validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    pub fn add_months(&self, n: i32) -> Self {
        let idx = self.index() + i64::from(n);
        Self {
            year: idx.div_euclid(12) as i32,
            month: idx.rem_euclid(12) as u32 + 1,
        }
    }

    /// Whole months from `self` to `other`; negative when `other` is earlier.
    pub fn months_until(&self, other: YearMonth) -> i64 {
        other.index() - self.index()
    }

    pub fn next(&self) -> Self {
        self.add_months(1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || CoreError::invalid("month", format!("'{}', expected YYYY-MM", s));
        let (y, m) = s.split_once('-').ok_or_else(bad)?;
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        YearMonth::new(year, month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    Monthly,
    Quarterly,
    Yearly,
}

impl PeriodKind {
    pub fn months(&self) -> u32 {
        match self {
            PeriodKind::Monthly => 1,
            PeriodKind::Quarterly => 3,
            PeriodKind::Yearly => 12,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Monthly => "monthly",
            PeriodKind::Quarterly => "quarterly",
            PeriodKind::Yearly => "yearly",
        }
    }
}

impl FromStr for PeriodKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(PeriodKind::Monthly),
            "quarterly" | "quarter" | "q" => Ok(PeriodKind::Quarterly),
            "yearly" | "year" | "y" => Ok(PeriodKind::Yearly),
            other => Err(CoreError::invalid(
                "period",
                format!("'{}', expected monthly|quarterly|yearly", other),
            )),
        }
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    YearMonth::of(date).first_day()
}

/// First day of the quarter containing `date` (Jan, Apr, Jul or Oct).
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let m = ((date.month() - 1) / 3) * 3 + 1;
    YearMonth {
        year: date.year(),
        month: m,
    }
    .first_day()
}

pub fn year_start(date: NaiveDate) -> NaiveDate {
    YearMonth {
        year: date.year(),
        month: 1,
    }
    .first_day()
}

pub fn add_months(date: NaiveDate, n: u32) -> NaiveDate {
    date.checked_add_months(Months::new(n))
        .unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub kind: PeriodKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn containing(kind: PeriodKind, date: NaiveDate) -> Self {
        let start = match kind {
            PeriodKind::Monthly => month_start(date),
            PeriodKind::Quarterly => quarter_start(date),
            PeriodKind::Yearly => year_start(date),
        };
        Self {
            kind,
            start,
            end: add_months(start, kind.months()),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Month anchors inside the window, in order.
    pub fn months(&self) -> Vec<YearMonth> {
        let first = YearMonth::of(self.start);
        (0..self.kind.months() as i32)
            .map(|i| first.add_months(i))
            .collect()
    }

    pub fn previous(&self) -> Self {
        let prev = YearMonth::of(self.start).add_months(-(self.kind.months() as i32));
        Self::containing(self.kind, prev.first_day())
    }

    pub fn label(&self) -> String {
        match self.kind {
            PeriodKind::Monthly => YearMonth::of(self.start).to_string(),
            PeriodKind::Quarterly => {
                format!("Q{} {}", (self.start.month() - 1) / 3 + 1, self.start.year())
            }
            PeriodKind::Yearly => self.start.year().to_string(),
        }
    }
}
