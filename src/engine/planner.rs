// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Write side of budgeting: income plans, category budgets and plan
//! deductions.
//!
//! Every entry point opens one IMMEDIATE transaction, reads what exists and
//! then updates or inserts, so two overlapping edits of the same period
//! cannot both take the insert path and trip a unique constraint.
//!
//! Declarations are stored as one row per (category, start month) with an
//! exclusive `end_month`. Writing a range replaces whatever covered it
//! before: older rows are cut back to end at the new start, rows inside the
//! range are dropped, and any part of an old row beyond the range is kept
//! as its own row. At most one declaration covers a given category/month.
//! Income lines budget a per-month amount; category budgets hold the total
//! for their whole period, so a cut keeps its share of that total.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::recurrence;
use crate::error::{CoreError, CoreResult};
use crate::models::{BudgetDeclaration, BudgetPlanAllocation, NewTransaction, Recurrence, TxType};
use crate::period::{Period, PeriodKind, YearMonth, month_start, quarter_start, year_start};
use crate::store::{self, budgets, categories, items, users};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeLine {
    pub category_id: i64,
    pub amount: Decimal,
    /// Last month (inclusive) the amount is budgeted for. `None` means
    /// only the edited month.
    pub through: Option<YearMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomePlanInput {
    pub month: YearMonth,
    pub lines: Vec<IncomeLine>,
    pub monthly: Decimal,
    pub quarterly: Decimal,
    pub yearly: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub category_id: i64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub declarations_written: usize,
    pub declarations_removed: usize,
    pub allocations_created: usize,
    pub allocations_updated: usize,
    pub income_rows_created: usize,
    pub income_rows_updated: usize,
    pub income_rows_deleted: usize,
}

/// Month, quarter and year start of `month`, without repeats. In January
/// all three coincide; in April the quarter and month start do.
pub fn plan_anchors(month: YearMonth) -> Vec<NaiveDate> {
    let d = month.first_day();
    let mut anchors = Vec::with_capacity(3);
    for a in [month_start(d), quarter_start(d), year_start(d)] {
        if !anchors.contains(&a) {
            anchors.push(a);
        }
    }
    anchors
}

fn reject_duplicate_categories(ids: impl Iterator<Item = i64>) -> CoreResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CoreError::invalid(
                "lines",
                format!("category {} listed twice", id),
            ));
        }
    }
    Ok(())
}

/// Makes `[start, end)` of `category_id` carry `amount` (nothing when zero).
/// Amount the piece `[from, to)` cut out of `d` keeps. Whole-range
/// amounts are split by months, to the cent.
fn piece_amount(d: &BudgetDeclaration, from: NaiveDate, to: NaiveDate) -> Decimal {
    if d.per_month {
        return d.amount;
    }
    let months = YearMonth::of(from).months_until(YearMonth::of(to));
    d.amount_for(u32::try_from(months).unwrap_or(0)).round_dp(2)
}

#[allow(clippy::too_many_arguments)]
fn replace_range(
    c: &Connection,
    user_id: i64,
    category_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    amount: Decimal,
    per_month: bool,
    report: &mut ReconcileReport,
) -> CoreResult<()> {
    let mut at_start = None;
    for d in budgets::declarations_for_category(c, user_id, category_id)? {
        if d.end_month <= start || d.month >= end {
            continue;
        }
        if d.end_month > end {
            budgets::insert_declaration(
                c,
                user_id,
                category_id,
                end,
                d.end_month,
                piece_amount(&d, end, d.end_month),
                d.per_month,
            )?;
        }
        if d.month < start {
            budgets::update_declaration(c, d.id, start, piece_amount(&d, d.month, start), d.per_month)?;
        } else if d.month == start {
            at_start = Some(d);
        } else {
            budgets::delete_declaration(c, d.id)?;
            report.declarations_removed += 1;
        }
    }

    match at_start {
        Some(d) if amount.is_zero() => {
            budgets::delete_declaration(c, d.id)?;
            report.declarations_removed += 1;
        }
        Some(d) => {
            budgets::update_declaration(c, d.id, end, amount, per_month)?;
            report.declarations_written += 1;
        }
        None if amount.is_zero() => {}
        None => {
            budgets::insert_declaration(c, user_id, category_id, start, end, amount, per_month)?;
            report.declarations_written += 1;
        }
    }
    Ok(())
}

fn reconcile_allocations(
    c: &Connection,
    user_id: i64,
    input: &IncomePlanInput,
    report: &mut ReconcileReport,
) -> CoreResult<()> {
    let d = input.month.first_day();
    let (m, q, y) = (month_start(d), quarter_start(d), year_start(d));
    for anchor in plan_anchors(input.month) {
        let mut plan = match budgets::find_allocation(c, user_id, anchor)? {
            Some(p) => p,
            None => {
                let zero = Decimal::ZERO;
                let id = budgets::insert_allocation(c, user_id, anchor, zero, zero, zero)?;
                report.allocations_created += 1;
                BudgetPlanAllocation {
                    id,
                    user_id,
                    month: anchor,
                    monthly: zero,
                    quarterly: zero,
                    yearly: zero,
                }
            }
        };
        if anchor == m {
            plan.monthly = input.monthly;
        }
        if anchor == q {
            plan.quarterly = input.quarterly;
        }
        if anchor == y {
            plan.yearly = input.yearly;
        }
        budgets::update_allocation(c, &plan)?;
        report.allocations_updated += 1;
    }
    Ok(())
}

fn upsert_income_rows(
    c: &Connection,
    user_id: i64,
    input: &IncomePlanInput,
    report: &mut ReconcileReport,
) -> CoreResult<()> {
    let first = input.month.first_day();
    for line in &input.lines {
        let existing = items::income_for_category_in_month(c, user_id, line.category_id, input.month)?;
        if line.amount.is_zero() {
            for t in &existing {
                items::delete(c, t.id)?;
                report.income_rows_deleted += 1;
            }
            continue;
        }
        match existing.first() {
            Some(t) => {
                items::update_amount(c, t.id, line.amount, first, first)?;
                report.income_rows_updated += 1;
            }
            None => {
                items::insert(
                    c,
                    &NewTransaction {
                        user_id,
                        amount: line.amount,
                        tx_type: TxType::Income,
                        recurrence: Recurrence::Once,
                        transaction_date: first,
                        posting_date: first,
                        category_id: line.category_id,
                        note: None,
                    },
                )?;
                report.income_rows_created += 1;
            }
        }
    }
    Ok(())
}

/// Saves the income editor for one month: income category budgets, the
/// month/quarter/year allocation rows and the income transactions that
/// make the balance reflect the plan.
///
/// Running it twice with the same input leaves the store unchanged.
pub fn reconcile_income(
    conn: &mut Connection,
    user_id: i64,
    input: &IncomePlanInput,
) -> CoreResult<ReconcileReport> {
    reject_duplicate_categories(input.lines.iter().map(|l| l.category_id))?;
    let tx = store::write_tx(conn)?;
    users::require(&tx, user_id)?;
    for line in &input.lines {
        categories::require(&tx, line.category_id, Some(TxType::Income))?;
    }

    let mut report = ReconcileReport::default();
    let start = input.month.first_day();
    for line in &input.lines {
        let through = line.through.map_or(input.month, |t| t.max(input.month));
        let end = through.next().first_day();
        replace_range(
            &tx,
            user_id,
            line.category_id,
            start,
            end,
            line.amount,
            true,
            &mut report,
        )?;
    }
    reconcile_allocations(&tx, user_id, input, &mut report)?;
    upsert_income_rows(&tx, user_id, input, &mut report)?;
    tx.commit()?;

    info!(user_id, month = %input.month, ?report, "income plan reconciled");
    Ok(report)
}

/// Sets category budgets for the `kind` period containing `anchor`. Each
/// line is the budget for the whole period, stored as one row spanning it;
/// a zero clears it.
pub fn declare_category_budgets(
    conn: &mut Connection,
    user_id: i64,
    kind: PeriodKind,
    anchor: NaiveDate,
    lines: &[BudgetLine],
) -> CoreResult<ReconcileReport> {
    reject_duplicate_categories(lines.iter().map(|l| l.category_id))?;
    let period = Period::containing(kind, anchor);
    let tx = store::write_tx(conn)?;
    users::require(&tx, user_id)?;
    let mut report = ReconcileReport::default();
    for line in lines {
        categories::require(&tx, line.category_id, None)?;
        replace_range(
            &tx,
            user_id,
            line.category_id,
            period.start,
            period.end,
            line.amount,
            false,
            &mut report,
        )?;
    }
    tx.commit()?;
    info!(user_id, period = %period.label(), lines = lines.len(), "category budgets saved");
    Ok(report)
}

/// Takes `amount` off the allocation of the `kind` period containing
/// `date`. Returns `false` when no plan exists for that period.
pub fn deduct_from_plan(
    c: &Connection,
    user_id: i64,
    kind: PeriodKind,
    date: NaiveDate,
    amount: Decimal,
) -> CoreResult<bool> {
    let anchor = Period::containing(kind, date).start;
    let Some(mut plan) = budgets::find_allocation(c, user_id, anchor)? else {
        debug!(user_id, %anchor, "no plan to deduct from");
        return Ok(false);
    };
    match kind {
        PeriodKind::Monthly => plan.monthly -= amount,
        PeriodKind::Quarterly => plan.quarterly -= amount,
        PeriodKind::Yearly => plan.yearly -= amount,
    }
    budgets::update_allocation(c, &plan)?;
    Ok(true)
}

/// Stores a transaction, expanding bounded recurrences into dated rows,
/// and optionally charges it against the plan of `deduct.0` containing
/// `deduct.1`. Returns the new row ids.
pub fn record_transaction(
    conn: &mut Connection,
    draft: &NewTransaction,
    deduct: Option<(PeriodKind, NaiveDate)>,
) -> CoreResult<Vec<i64>> {
    if draft.amount <= Decimal::ZERO {
        return Err(CoreError::InvalidAmount {
            amount: draft.amount,
        });
    }
    let rows = recurrence::expand(draft)?;
    let tx = store::write_tx(conn)?;
    users::require(&tx, draft.user_id)?;
    categories::require(&tx, draft.category_id, Some(draft.tx_type))?;
    let mut ids = Vec::with_capacity(rows.len());
    for row in &rows {
        ids.push(items::insert(&tx, row)?);
    }
    if let Some((kind, date)) = deduct {
        deduct_from_plan(&tx, draft.user_id, kind, date, draft.amount)?;
    }
    tx.commit()?;
    debug!(
        user_id = draft.user_id,
        rows = ids.len(),
        recurrence = draft.recurrence.kind_str(),
        bounded = draft.recurrence.is_bounded(),
        "transaction recorded"
    );
    Ok(ids)
}
