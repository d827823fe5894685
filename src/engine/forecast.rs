// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cancel::CancelToken;
use super::recurrence::applies_to_month;
use super::salary::{SalaryImpact, compute_impact};
use crate::error::{CoreError, CoreResult};
use crate::models::{AbsenceRecord, Transaction, TxType, User};
use crate::period::YearMonth;
use crate::store;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub year: i32,
    pub month: u32,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_savings: Decimal,
    pub salary_impact: SalaryImpact,
    pub balance: Decimal,
}

/// What the forecast needs from persistence.
pub trait ForecastSource {
    fn user(&self, user_id: i64) -> CoreResult<Option<User>>;

    /// May return rows that do not apply to the month; they are filtered.
    fn candidate_transactions(&self, user_id: i64, month: YearMonth)
    -> CoreResult<Vec<Transaction>>;

    fn absences_in_month(&self, user_id: i64, month: YearMonth) -> CoreResult<Vec<AbsenceRecord>>;
}

impl ForecastSource for Connection {
    fn user(&self, user_id: i64) -> CoreResult<Option<User>> {
        store::users::get(self, user_id)
    }

    fn candidate_transactions(
        &self,
        user_id: i64,
        month: YearMonth,
    ) -> CoreResult<Vec<Transaction>> {
        store::items::candidates_for_month(self, user_id, month)
    }

    fn absences_in_month(&self, user_id: i64, month: YearMonth) -> CoreResult<Vec<AbsenceRecord>> {
        store::absences::overlapping_month(self, user_id, month)
    }
}

/// Steps 2-6 of the forecast over already-fetched rows.
pub fn compose_forecast(
    user: &User,
    candidates: &[Transaction],
    absences: &[AbsenceRecord],
    year: i32,
    month: u32,
) -> ForecastResult {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    let mut savings = Decimal::ZERO;
    for t in candidates.iter().filter(|t| applies_to_month(t, year, month)) {
        match t.tx_type {
            TxType::Income => income += t.amount,
            TxType::Expense => expenses += t.amount,
            TxType::Savings => savings += t.amount,
        }
    }
    let salary_impact = compute_impact(user, absences, year, month);
    ForecastResult {
        year,
        month,
        total_income: income,
        total_expenses: expenses,
        total_savings: savings,
        salary_impact,
        balance: income - expenses - savings + salary_impact.net_impact,
    }
}

/// Forecast for one month. A missing user is a precondition failure.
pub fn build_monthly_forecast<S: ForecastSource + ?Sized>(
    source: &S,
    user_id: i64,
    year: i32,
    month: u32,
    cancel: &CancelToken,
) -> CoreResult<ForecastResult> {
    let target = YearMonth::new(year, month)?;
    let user = source
        .user(user_id)?
        .ok_or(CoreError::UserNotFound { user_id })?;
    cancel.check()?;
    let candidates = source.candidate_transactions(user_id, target)?;
    cancel.check()?;
    let absences = source.absences_in_month(user_id, target)?;
    cancel.check()?;

    let result = compose_forecast(&user, &candidates, &absences, year, month);
    debug!(
        user_id,
        month = %target,
        candidates = candidates.len(),
        absences = absences.len(),
        balance = %result.balance,
        "forecast built"
    );
    Ok(result)
}

/// [`build_monthly_forecast`] against SQLite inside one read snapshot.
pub fn forecast_from_store(
    conn: &Connection,
    user_id: i64,
    year: i32,
    month: u32,
    cancel: &CancelToken,
) -> CoreResult<ForecastResult> {
    store::snapshot(conn, |c| build_monthly_forecast(c, user_id, year, month, cancel))
}
