// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period roll-ups: budget progress per category, totals per type, the
//! account balance and the savings summary.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::cancel::CancelToken;
use crate::error::CoreResult;
use crate::models::{BudgetDeclaration, Transaction, TxType};
use crate::period::{Period, PeriodKind};
use crate::store;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProgress {
    pub category_id: i64,
    pub budget: Decimal,
    pub spent: Decimal,
    /// May go negative; see `overspent`.
    pub remaining: Decimal,
    pub progress_percent: Decimal,
    pub overspent: bool,
}

impl CategoryProgress {
    pub fn new(category_id: i64, budget: Decimal, spent: Decimal) -> Self {
        let remaining = budget - spent;
        let progress_percent = if budget <= Decimal::ZERO {
            if spent.is_zero() { Decimal::ZERO } else { HUNDRED }
        } else {
            spent / budget * HUNDRED
        };
        Self {
            category_id,
            budget,
            spent,
            remaining,
            progress_percent,
            overspent: remaining < Decimal::ZERO,
        }
    }

    /// `spent / budget` clamped to `[0, 1]` for progress bars.
    pub fn display_ratio(&self) -> Decimal {
        if self.budget <= Decimal::ZERO {
            return if self.spent > Decimal::ZERO {
                Decimal::ONE
            } else {
                Decimal::ZERO
            };
        }
        (self.spent / self.budget).clamp(Decimal::ZERO, Decimal::ONE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub by_category: BTreeMap<i64, CategoryProgress>,
    pub totals_by_type: BTreeMap<TxType, Decimal>,
}

impl Aggregation {
    pub fn total(&self, t: TxType) -> Decimal {
        self.totals_by_type.get(&t).copied().unwrap_or(Decimal::ZERO)
    }
}

/// Budget a declaration contributes to `period`, from the months of the
/// period inside `[month, end_month)`. A whole-range amount is shared
/// evenly over the months it spans.
pub fn budget_in_period(decl: &BudgetDeclaration, period: &Period) -> Decimal {
    let covered = period.months().into_iter().filter(|m| decl.covers(*m)).count();
    decl.amount_for(covered as u32)
}

/// Rolls `transactions` and `budgets` up over `[period.start, period.end)`.
///
/// Rows outside the window are ignored, so callers may pass a superset.
/// Categories with neither budget nor spending are left out.
pub fn aggregate(
    transactions: &[Transaction],
    budgets: &[BudgetDeclaration],
    period: &Period,
) -> Aggregation {
    let mut spent: BTreeMap<i64, Decimal> = BTreeMap::new();
    let mut totals_by_type: BTreeMap<TxType, Decimal> = BTreeMap::new();
    for t in transactions.iter().filter(|t| period.contains(t.transaction_date)) {
        *spent.entry(t.category_id).or_insert(Decimal::ZERO) += t.amount;
        *totals_by_type.entry(t.tx_type).or_insert(Decimal::ZERO) += t.amount;
    }

    let mut budgeted: BTreeMap<i64, Decimal> = BTreeMap::new();
    for b in budgets {
        let amount = budget_in_period(b, period);
        if !amount.is_zero() {
            *budgeted.entry(b.category_id).or_insert(Decimal::ZERO) += amount;
        }
    }

    let mut by_category = BTreeMap::new();
    let ids: std::collections::BTreeSet<i64> =
        spent.keys().chain(budgeted.keys()).copied().collect();
    for id in ids {
        let b = budgeted.get(&id).copied().unwrap_or(Decimal::ZERO);
        let s = spent.get(&id).copied().unwrap_or(Decimal::ZERO);
        if b.is_zero() && s.is_zero() {
            continue;
        }
        by_category.insert(id, CategoryProgress::new(id, b, s));
    }

    Aggregation {
        by_category,
        totals_by_type,
    }
}

/// All-time income minus all-time expenses. Savings are transfers between
/// the user's own pots and do not lower the balance.
pub fn account_balance(transactions: &[Transaction]) -> Decimal {
    transactions.iter().fold(Decimal::ZERO, |acc, t| match t.tx_type {
        TxType::Income => acc + t.amount,
        TxType::Expense => acc - t.amount,
        TxType::Savings => acc,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub savings: Decimal,
}

pub fn period_totals(transactions: &[Transaction], period: &Period) -> PeriodTotals {
    let mut out = PeriodTotals::default();
    for t in transactions.iter().filter(|t| period.contains(t.transaction_date)) {
        match t.tx_type {
            TxType::Income => out.income += t.amount,
            TxType::Expense => out.expenses += t.amount,
            TxType::Savings => out.savings += t.amount,
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SavingsSummary {
    pub last_month: Decimal,
    pub last_quarter: Decimal,
    pub last_year: Decimal,
}

/// Net savings in the month, quarter and year before the ones containing
/// `today`.
pub fn savings_summary(transactions: &[Transaction], today: NaiveDate) -> SavingsSummary {
    let sum = |kind: PeriodKind| {
        period_totals(transactions, &Period::containing(kind, today).previous()).savings
    };
    SavingsSummary {
        last_month: sum(PeriodKind::Monthly),
        last_quarter: sum(PeriodKind::Quarterly),
        last_year: sum(PeriodKind::Yearly),
    }
}

/// Budget progress for the expense and savings categories of `user_id`
/// over the `kind` period containing `date`, read from one snapshot.
pub fn progress_for_period(
    conn: &Connection,
    user_id: i64,
    kind: PeriodKind,
    date: NaiveDate,
    cancel: &CancelToken,
) -> CoreResult<Aggregation> {
    let period = Period::containing(kind, date);
    let tracked = [TxType::Expense, TxType::Savings];
    let (txs, budgets) = store::snapshot(conn, |c| {
        cancel.check()?;
        let txs: Vec<Transaction> = store::items::in_range(c, user_id, period.start, period.end)?
            .into_iter()
            .filter(|t| tracked.contains(&t.tx_type))
            .collect();
        cancel.check()?;
        let budgets =
            store::budgets::declarations_overlapping(c, user_id, period.start, period.end, &tracked)?;
        Ok((txs, budgets))
    })?;
    cancel.check()?;
    let agg = aggregate(&txs, &budgets, &period);
    debug!(
        user_id,
        period = %period.label(),
        categories = agg.by_category.len(),
        "budget progress aggregated"
    );
    Ok(agg)
}

pub fn balance_for_user(conn: &Connection, user_id: i64) -> CoreResult<Decimal> {
    let txs = store::items::for_user(conn, user_id)?;
    Ok(account_balance(&txs))
}
