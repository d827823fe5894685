// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetplanner::db;
use budgetplanner::engine::aggregate::{
    CategoryProgress, budget_in_period, progress_for_period, savings_summary,
};
use budgetplanner::engine::planner::{BudgetLine, declare_category_budgets};
use budgetplanner::engine::{CancelToken, account_balance, aggregate};
use budgetplanner::error::CoreError;
use budgetplanner::models::{BudgetDeclaration, NewTransaction, Recurrence, Transaction, TxType};
use budgetplanner::period::{Period, PeriodKind};
use budgetplanner::store::{categories, items, users};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn tx(id: i64, tx_type: TxType, amount: i64, category_id: i64, date: NaiveDate) -> Transaction {
    Transaction {
        id,
        user_id: 1,
        amount: dec(amount),
        tx_type,
        recurrence: Recurrence::Once,
        transaction_date: date,
        posting_date: date,
        category_id,
        note: None,
    }
}

fn decl(category_id: i64, from: NaiveDate, until: NaiveDate, amount: i64) -> BudgetDeclaration {
    BudgetDeclaration {
        id: category_id,
        user_id: 1,
        category_id,
        month: from,
        end_month: until,
        amount: dec(amount),
        per_month: true,
    }
}

#[test]
fn overspent_category_goes_negative_and_clamps_ratio() {
    let p = Period::containing(PeriodKind::Monthly, d(2025, 5, 1));
    let txs = [
        tx(1, TxType::Expense, 700, 10, d(2025, 5, 3)),
        tx(2, TxType::Expense, 500, 10, d(2025, 5, 20)),
    ];
    let budgets = [decl(10, d(2025, 5, 1), d(2025, 6, 1), 1000)];
    let agg = aggregate(&txs, &budgets, &p);
    let c = &agg.by_category[&10];
    assert_eq!(c.spent, dec(1200));
    assert_eq!(c.remaining, dec(-200));
    assert!(c.overspent);
    assert_eq!(c.display_ratio(), Decimal::ONE);
    assert_eq!(c.progress_percent, dec(120));
}

#[test]
fn empty_categories_are_left_out() {
    let p = Period::containing(PeriodKind::Monthly, d(2025, 5, 1));
    let budgets = [decl(3, d(2025, 5, 1), d(2025, 6, 1), 0)];
    let agg = aggregate(&[], &budgets, &p);
    assert!(agg.by_category.is_empty());
}

#[test]
fn rows_outside_half_open_window_are_ignored() {
    let p = Period::containing(PeriodKind::Monthly, d(2025, 5, 1));
    let txs = [
        tx(1, TxType::Expense, 100, 1, d(2025, 4, 30)),
        tx(2, TxType::Expense, 200, 1, d(2025, 5, 1)),
        tx(3, TxType::Expense, 400, 1, d(2025, 6, 1)),
    ];
    let agg = aggregate(&txs, &[], &p);
    assert_eq!(agg.by_category[&1].spent, dec(200));
    assert_eq!(agg.total(TxType::Expense), dec(200));
    assert_eq!(agg.total(TxType::Income), Decimal::ZERO);
}

#[test]
fn quarter_budget_counts_each_covered_month() {
    let q2 = Period::containing(PeriodKind::Quarterly, d(2025, 4, 1));
    // covers Jan..May: two months of Q2
    let b = decl(1, d(2025, 1, 1), d(2025, 6, 1), 300);
    assert_eq!(budget_in_period(&b, &q2), dec(600));
}

#[test]
fn whole_range_budget_is_shared_over_its_months() {
    let q2 = Period::containing(PeriodKind::Quarterly, d(2025, 4, 1));
    let half_year = BudgetDeclaration {
        per_month: false,
        ..decl(1, d(2025, 1, 1), d(2025, 7, 1), 600)
    };
    assert_eq!(budget_in_period(&half_year, &q2), dec(300));

    let year = BudgetDeclaration {
        per_month: false,
        ..decl(1, d(2025, 1, 1), d(2026, 1, 1), 12000)
    };
    let y2025 = Period::containing(PeriodKind::Yearly, d(2025, 6, 1));
    assert_eq!(budget_in_period(&year, &y2025), dec(12000));
    let march = Period::containing(PeriodKind::Monthly, d(2025, 3, 1));
    assert_eq!(budget_in_period(&year, &march), dec(1000));
}

#[test]
fn zero_budget_with_spending_is_fully_used() {
    let c = CategoryProgress::new(1, Decimal::ZERO, dec(50));
    assert_eq!(c.progress_percent, dec(100));
    assert_eq!(c.display_ratio(), Decimal::ONE);
    assert!(c.overspent);
}

#[test]
fn balance_excludes_savings() {
    let txs = [
        tx(1, TxType::Income, 1000, 1, d(2025, 1, 1)),
        tx(2, TxType::Expense, 300, 2, d(2025, 1, 2)),
        tx(3, TxType::Savings, 200, 3, d(2025, 1, 3)),
    ];
    assert_eq!(account_balance(&txs), dec(700));
}

#[test]
fn savings_summary_looks_at_previous_windows() {
    let txs = [
        tx(1, TxType::Savings, 100, 3, d(2025, 4, 10)),
        tx(2, TxType::Savings, 50, 3, d(2025, 2, 10)),
        tx(3, TxType::Savings, 25, 3, d(2024, 7, 10)),
        tx(4, TxType::Savings, 1000, 3, d(2025, 5, 2)),
    ];
    let s = savings_summary(&txs, d(2025, 5, 15));
    assert_eq!(s.last_month, dec(100));
    assert_eq!(s.last_quarter, dec(50));
    assert_eq!(s.last_year, dec(25));
}

#[test]
fn progress_from_store_tracks_expense_and_savings_only() {
    let mut conn = db::open_in_memory().unwrap();
    let user = users::add(&conn, "Alva", "", dec(20000), 160).unwrap();
    let food = categories::add(&conn, "Food", TxType::Expense).unwrap();
    let salary = categories::add(&conn, "Salary", TxType::Income).unwrap();
    declare_category_budgets(
        &mut conn,
        user,
        PeriodKind::Quarterly,
        d(2025, 2, 1),
        &[BudgetLine {
            category_id: food,
            amount: dec(1000),
        }],
    )
    .unwrap();

    for (t, cat, amount, date) in [
        (TxType::Expense, food, 400, d(2025, 1, 5)),
        (TxType::Expense, food, 600, d(2025, 3, 5)),
        (TxType::Income, salary, 20000, d(2025, 1, 25)),
    ] {
        let row = NewTransaction {
            user_id: user,
            amount: dec(amount),
            tx_type: t,
            recurrence: Recurrence::Once,
            transaction_date: date,
            posting_date: date,
            category_id: cat,
            note: None,
        };
        items::insert(&conn, &row).unwrap();
    }

    let agg = progress_for_period(
        &conn,
        user,
        PeriodKind::Quarterly,
        d(2025, 3, 31),
        &CancelToken::none(),
    )
    .unwrap();
    assert_eq!(agg.by_category.len(), 1);
    let c = &agg.by_category[&food];
    assert_eq!(c.budget, dec(1000));
    assert_eq!(c.spent, dec(1000));
    assert_eq!(c.remaining, Decimal::ZERO);
    assert!(!c.overspent);

    declare_category_budgets(
        &mut conn,
        user,
        PeriodKind::Yearly,
        d(2025, 1, 1),
        &[BudgetLine {
            category_id: food,
            amount: dec(12000),
        }],
    )
    .unwrap();
    let year = progress_for_period(
        &conn,
        user,
        PeriodKind::Yearly,
        d(2025, 6, 1),
        &CancelToken::none(),
    )
    .unwrap();
    assert_eq!(year.by_category[&food].budget, dec(12000));
    let may = progress_for_period(
        &conn,
        user,
        PeriodKind::Monthly,
        d(2025, 5, 1),
        &CancelToken::none(),
    )
    .unwrap();
    assert_eq!(may.by_category[&food].budget, dec(1000));

    let token = CancelToken::new();
    token.cancel();
    let err = progress_for_period(&conn, user, PeriodKind::Monthly, d(2025, 3, 1), &token)
        .unwrap_err();
    assert!(matches!(err, CoreError::Cancelled));
}
