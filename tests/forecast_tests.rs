// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetplanner::db;
use budgetplanner::engine::forecast::{compose_forecast, forecast_from_store};
use budgetplanner::engine::{CancelToken, ForecastSource, build_monthly_forecast};
use budgetplanner::error::{CoreError, CoreResult};
use budgetplanner::models::{
    AbsenceKind, AbsenceRecord, NewTransaction, Recurrence, Transaction, TxType, User,
};
use budgetplanner::period::YearMonth;
use budgetplanner::store::{absences, categories, items, users};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::cell::Cell;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn setup() -> (Connection, i64) {
    let conn = db::open_in_memory().unwrap();
    let user = users::add(&conn, "Alva", "Berg", dec(20000), 160).unwrap();
    let salary = categories::add(&conn, "Salary", TxType::Income).unwrap();
    let rent = categories::add(&conn, "Rent", TxType::Expense).unwrap();
    let buffer = categories::add(&conn, "Buffer", TxType::Savings).unwrap();

    let row = |amount: i64, tx_type, recurrence, date, category_id| NewTransaction {
        user_id: user,
        amount: dec(amount),
        tx_type,
        recurrence,
        transaction_date: date,
        posting_date: date,
        category_id,
        note: None,
    };
    items::insert(
        &conn,
        &row(5000, TxType::Income, Recurrence::Once, d(2025, 3, 25), salary),
    )
    .unwrap();
    items::insert(
        &conn,
        &row(
            2000,
            TxType::Expense,
            Recurrence::Monthly { until: None },
            d(2024, 11, 1),
            rent,
        ),
    )
    .unwrap();
    items::insert(
        &conn,
        &row(500, TxType::Savings, Recurrence::Once, d(2025, 3, 26), buffer),
    )
    .unwrap();
    // outside March
    items::insert(
        &conn,
        &row(700, TxType::Income, Recurrence::Once, d(2025, 4, 1), salary),
    )
    .unwrap();
    (conn, user)
}

#[test]
fn march_forecast_sums_applicable_rows() {
    let (conn, user) = setup();
    let f = forecast_from_store(&conn, user, 2025, 3, &CancelToken::none()).unwrap();
    assert_eq!(f.total_income, dec(5000));
    assert_eq!(f.total_expenses, dec(2000));
    assert_eq!(f.total_savings, dec(500));
    assert_eq!(f.salary_impact.net_impact, Decimal::ZERO);
    assert_eq!(f.balance, dec(2500));
}

#[test]
fn absence_lowers_forecast_balance() {
    let (conn, user) = setup();
    absences::add(
        &conn,
        user,
        d(2025, 3, 10),
        None,
        8,
        AbsenceKind::Sick,
        d(2025, 3, 11),
    )
    .unwrap();
    let f = forecast_from_store(&conn, user, 2025, 3, &CancelToken::none()).unwrap();
    assert_eq!(f.salary_impact.deduction, dec(1000));
    assert_eq!(f.salary_impact.compensation, dec(800));
    assert_eq!(f.salary_impact.net_impact, dec(-200));
    assert_eq!(f.balance, dec(2300));

    // The absence does not leak into April.
    let april = forecast_from_store(&conn, user, 2025, 4, &CancelToken::none()).unwrap();
    assert_eq!(april.salary_impact.net_impact, Decimal::ZERO);
    assert_eq!(april.total_income, dec(700));
}

#[test]
fn unknown_user_is_a_precondition_failure() {
    let (conn, _) = setup();
    let err = build_monthly_forecast(&conn, 999, 2025, 3, &CancelToken::none()).unwrap_err();
    assert!(matches!(err, CoreError::UserNotFound { user_id: 999 }));
}

#[test]
fn invalid_month_is_rejected() {
    let (conn, user) = setup();
    let err = build_monthly_forecast(&conn, user, 2025, 13, &CancelToken::none()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput { .. }));
}

#[test]
fn cancelled_token_stops_the_build() {
    let (conn, user) = setup();
    let token = CancelToken::new();
    token.cancel();
    let err = build_monthly_forecast(&conn, user, 2025, 3, &token).unwrap_err();
    assert!(matches!(err, CoreError::Cancelled));
}

/// In-memory source that cancels its token once the candidates are read.
struct CancelAfterCandidates {
    user: User,
    token: CancelToken,
    absence_reads: Cell<usize>,
}

impl ForecastSource for CancelAfterCandidates {
    fn user(&self, user_id: i64) -> CoreResult<Option<User>> {
        Ok((user_id == self.user.id).then(|| self.user.clone()))
    }

    fn candidate_transactions(&self, _: i64, _: YearMonth) -> CoreResult<Vec<Transaction>> {
        self.token.cancel();
        Ok(Vec::new())
    }

    fn absences_in_month(&self, _: i64, _: YearMonth) -> CoreResult<Vec<AbsenceRecord>> {
        self.absence_reads.set(self.absence_reads.get() + 1);
        Ok(Vec::new())
    }
}

#[test]
fn cancellation_between_steps_skips_later_reads() {
    let token = CancelToken::new();
    let source = CancelAfterCandidates {
        user: User {
            id: 1,
            first_name: "Alva".into(),
            last_name: String::new(),
            income_monthly: dec(20000),
            work_hours_monthly: 160,
            active: true,
        },
        token: token.clone(),
        absence_reads: Cell::new(0),
    };
    let err = build_monthly_forecast(&source, 1, 2025, 3, &token).unwrap_err();
    assert!(matches!(err, CoreError::Cancelled));
    assert_eq!(source.absence_reads.get(), 0);
}

#[test]
fn compose_ignores_rows_for_other_months() {
    let user = User {
        id: 1,
        first_name: "Alva".into(),
        last_name: String::new(),
        income_monthly: dec(20000),
        work_hours_monthly: 160,
        active: true,
    };
    let tx = |id, amount: i64, recurrence, date| Transaction {
        id,
        user_id: 1,
        amount: dec(amount),
        tx_type: TxType::Expense,
        recurrence,
        transaction_date: date,
        posting_date: date,
        category_id: 1,
        note: None,
    };
    let candidates = [
        tx(
            1,
            1200,
            Recurrence::Yearly {
                month: 3,
                until_year: None,
            },
            d(2023, 3, 1),
        ),
        tx(
            2,
            300,
            Recurrence::Yearly {
                month: 9,
                until_year: None,
            },
            d(2023, 9, 1),
        ),
        tx(3, 40, Recurrence::Once, d(2025, 2, 28)),
    ];
    let f = compose_forecast(&user, &candidates, &[], 2025, 3);
    assert_eq!(f.total_expenses, dec(1200));
    assert_eq!(f.balance, dec(-1200));
}
