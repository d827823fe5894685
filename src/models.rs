// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::period::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TxType {
    Income,
    Expense,
    Savings,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
            TxType::Savings => "savings",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            "savings" => Ok(TxType::Savings),
            other => Err(CoreError::invalid(
                "type",
                format!("'{}', expected income|expense|savings", other),
            )),
        }
    }
}

/// How often a transaction repeats. Fields that only make sense for one
/// kind live inside that variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recurrence {
    Once,
    Monthly {
        /// Last month (inclusive) the payment happens in.
        until: Option<YearMonth>,
    },
    Yearly {
        /// Payment month of year, 1-12.
        month: u32,
        /// Last year (inclusive) the payment happens in.
        until_year: Option<i32>,
    },
}

impl Recurrence {
    pub fn kind_str(&self) -> &'static str {
        match self {
            Recurrence::Once => "once",
            Recurrence::Monthly { .. } => "monthly",
            Recurrence::Yearly { .. } => "yearly",
        }
    }

    pub fn is_bounded(&self) -> bool {
        matches!(
            self,
            Recurrence::Monthly { until: Some(_) }
                | Recurrence::Yearly {
                    until_year: Some(_),
                    ..
                }
        )
    }

    /// Rebuilds a recurrence from its stored columns.
    pub fn from_columns(
        kind: &str,
        yearly_month: Option<u32>,
        end_year: Option<i32>,
        end_month: Option<u32>,
    ) -> Result<Self, CoreError> {
        let parse_err = || CoreError::Parse {
            column: "transactions.recurrence".into(),
            value: kind.to_string(),
        };
        match kind {
            "once" => Ok(Recurrence::Once),
            "monthly" => {
                let until = match (end_year, end_month) {
                    (Some(y), Some(m)) => Some(YearMonth::new(y, m)?),
                    (None, None) => None,
                    _ => return Err(parse_err()),
                };
                Ok(Recurrence::Monthly { until })
            }
            "yearly" => Ok(Recurrence::Yearly {
                month: yearly_month.ok_or_else(parse_err)?,
                until_year: end_year,
            }),
            _ => Err(parse_err()),
        }
    }

    /// `(yearly_month, end_year, end_month)` column values.
    pub fn columns(&self) -> (Option<u32>, Option<i32>, Option<u32>) {
        match *self {
            Recurrence::Once => (None, None, None),
            Recurrence::Monthly { until } => {
                (None, until.map(|u| u.year), until.map(|u| u.month))
            }
            Recurrence::Yearly { month, until_year } => (Some(month), until_year, None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub tx_type: TxType,
    pub recurrence: Recurrence,
    pub transaction_date: NaiveDate,
    pub posting_date: NaiveDate,
    pub category_id: i64,
    pub note: Option<String>,
}

/// A transaction before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub user_id: i64,
    pub amount: Decimal,
    pub tx_type: TxType,
    pub recurrence: Recurrence,
    pub transaction_date: NaiveDate,
    pub posting_date: NaiveDate,
    pub category_id: i64,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: TxType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsenceKind {
    Sick,
    ParentalCare,
}

impl AbsenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbsenceKind::Sick => "sick",
            AbsenceKind::ParentalCare => "parental_care",
        }
    }
}

impl FromStr for AbsenceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sick" => Ok(AbsenceKind::Sick),
            "parental_care" | "parental-care" | "vab" => Ok(AbsenceKind::ParentalCare),
            other => Err(CoreError::invalid(
                "absence kind",
                format!("'{}', expected sick|parental-care", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsenceRecord {
    pub id: i64,
    pub user_id: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub hours: i32,
    pub kind: AbsenceKind,
    pub entered_on: NaiveDate,
}

impl AbsenceRecord {
    /// `start < month_end && end >= month_start`
    pub fn overlaps(&self, month: YearMonth) -> bool {
        self.start < month.next().first_day() && self.end >= month.first_day()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub income_monthly: Decimal,
    pub work_hours_monthly: i32,
    pub active: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Category budget covering `[month, end_month)`.
///
/// With `per_month` the amount repeats for every covered month (income
/// plan lines); otherwise it is the total for the whole range (quarterly
/// and yearly budgets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetDeclaration {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub month: NaiveDate,
    pub end_month: NaiveDate,
    pub amount: Decimal,
    pub per_month: bool,
}

impl BudgetDeclaration {
    pub fn covers(&self, month: YearMonth) -> bool {
        let m = month.first_day();
        self.month <= m && m < self.end_month
    }

    pub fn span_months(&self) -> u32 {
        let n = YearMonth::of(self.month).months_until(YearMonth::of(self.end_month));
        u32::try_from(n).unwrap_or(0)
    }

    /// Budget that falls on `months` of the declared range.
    pub fn amount_for(&self, months: u32) -> Decimal {
        if self.per_month {
            return self.amount * Decimal::from(months);
        }
        let span = self.span_months();
        if months == 0 || span == 0 {
            Decimal::ZERO
        } else if months >= span {
            self.amount
        } else {
            self.amount * Decimal::from(months) / Decimal::from(span)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlanAllocation {
    pub id: i64,
    pub user_id: i64,
    pub month: NaiveDate,
    pub monthly: Decimal,
    pub quarterly: Decimal,
    pub yearly: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthClose {
    pub id: i64,
    pub user_id: i64,
    pub month: NaiveDate,
    pub closed_at: NaiveDateTime,
}
