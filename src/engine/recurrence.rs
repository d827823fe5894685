// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Which months a transaction applies to.
//!
//! [`applies_to_month`] only looks at the recurrence kind. End boundaries
//! are resolved once, when the row is written, by [`expand`]: a bounded
//! recurrence becomes one dated one-off row per occurrence.

use chrono::{Datelike, NaiveDate};

use crate::error::{CoreError, CoreResult};
use crate::models::{NewTransaction, Recurrence, Transaction};
use crate::period::YearMonth;

/// Upper bound on rows produced by a single bounded recurrence.
pub const MAX_OCCURRENCES: usize = 600;

pub fn applies_to_month(tx: &Transaction, year: i32, month: u32) -> bool {
    match tx.recurrence {
        Recurrence::Monthly { .. } => true,
        Recurrence::Yearly { month: paid, .. } => paid == month,
        Recurrence::Once => {
            tx.transaction_date.year() == year && tx.transaction_date.month() == month
        }
    }
}

/// `day` in `month`, pulled back to the month's last day when it overflows
/// (31st -> 30th / 28th).
fn same_day_in(month: YearMonth, day: u32) -> NaiveDate {
    (1..=day)
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(month.year, month.month, d))
        .unwrap_or_else(|| month.first_day())
}

fn occurrence(draft: &NewTransaction, date: NaiveDate) -> NewTransaction {
    NewTransaction {
        recurrence: Recurrence::Once,
        transaction_date: date,
        ..draft.clone()
    }
}

/// Turns a draft into the rows to store.
///
/// Unbounded recurrences stay a single row. `Monthly { until }` becomes one
/// one-off row per month from the transaction month through `until`;
/// `Yearly { until_year }` one row per year in the payment month, starting
/// with the first payment month on or after the transaction month.
pub fn expand(draft: &NewTransaction) -> CoreResult<Vec<NewTransaction>> {
    let start = YearMonth::of(draft.transaction_date);
    let day = draft.transaction_date.day();
    match draft.recurrence {
        Recurrence::Once
        | Recurrence::Monthly { until: None }
        | Recurrence::Yearly {
            until_year: None, ..
        } => {
            if let Recurrence::Yearly { month, .. } = draft.recurrence {
                YearMonth::new(start.year, month)?;
            }
            Ok(vec![draft.clone()])
        }
        Recurrence::Monthly { until: Some(until) } => {
            YearMonth::new(until.year, until.month)?;
            if until < start {
                return Err(CoreError::invalid(
                    "recurrence end",
                    format!("{} is before {}", until, start),
                ));
            }
            let count = start
                .months_until(until)
                .checked_add(1)
                .and_then(|c| usize::try_from(c).ok())
                .filter(|c| *c <= MAX_OCCURRENCES)
                .ok_or_else(|| {
                    CoreError::invalid(
                        "recurrence end",
                        format!("{} to {} exceeds the {} row limit", start, until, MAX_OCCURRENCES),
                    )
                })?;
            Ok((0..count as i32)
                .map(|i| occurrence(draft, same_day_in(start.add_months(i), day)))
                .collect())
        }
        Recurrence::Yearly {
            month,
            until_year: Some(until_year),
        } => {
            let first = YearMonth::new(start.year, month)?;
            let first_year = if first < start {
                start.year + 1
            } else {
                start.year
            };
            if until_year < first_year {
                return Err(CoreError::invalid(
                    "recurrence end",
                    format!("year {} has no payment month after {}", until_year, start),
                ));
            }
            YearMonth::new(until_year, month)?;
            until_year
                .checked_sub(first_year)
                .and_then(|n| n.checked_add(1))
                .and_then(|c| usize::try_from(c).ok())
                .filter(|c| *c <= MAX_OCCURRENCES)
                .ok_or_else(|| {
                    CoreError::invalid(
                        "recurrence end",
                        format!(
                            "{} to year {} exceeds the {} row limit",
                            start, until_year, MAX_OCCURRENCES
                        ),
                    )
                })?;
            Ok((first_year..=until_year)
                .map(|y| occurrence(draft, same_day_in(YearMonth { year: y, month }, day)))
                .collect())
        }
    }
}
