// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetplanner::db;
use budgetplanner::engine::planner::{
    BudgetLine, IncomeLine, IncomePlanInput, declare_category_budgets, deduct_from_plan,
    plan_anchors, reconcile_income, record_transaction,
};
use budgetplanner::error::CoreError;
use budgetplanner::models::{NewTransaction, Recurrence, TxType};
use budgetplanner::period::{PeriodKind, YearMonth};
use budgetplanner::store::{budgets, categories, items, users};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

fn ym(y: i32, m: u32) -> YearMonth {
    YearMonth::new(y, m).unwrap()
}

struct Fixture {
    conn: Connection,
    user: i64,
    salary: i64,
    food: i64,
}

fn setup() -> Fixture {
    let conn = db::open_in_memory().unwrap();
    let user = users::add(&conn, "Alva", "Berg", dec(30000), 160).unwrap();
    let salary = categories::add(&conn, "Salary", TxType::Income).unwrap();
    let food = categories::add(&conn, "Food", TxType::Expense).unwrap();
    Fixture {
        conn,
        user,
        salary,
        food,
    }
}

fn income_input(month: YearMonth, salary: i64, amount: i64) -> IncomePlanInput {
    IncomePlanInput {
        month,
        lines: vec![IncomeLine {
            category_id: salary,
            amount: dec(amount),
            through: None,
        }],
        monthly: dec(5000),
        quarterly: dec(15000),
        yearly: dec(60000),
    }
}

#[test]
fn anchors_collapse_in_january_and_april() {
    assert_eq!(plan_anchors(ym(2025, 1)), vec![d(2025, 1, 1)]);
    assert_eq!(plan_anchors(ym(2025, 4)), vec![d(2025, 4, 1), d(2025, 1, 1)]);
    assert_eq!(
        plan_anchors(ym(2025, 5)),
        vec![d(2025, 5, 1), d(2025, 4, 1), d(2025, 1, 1)]
    );
}

#[test]
fn january_plan_writes_one_row_with_all_three_fields() {
    let mut f = setup();
    let report = reconcile_income(&mut f.conn, f.user, &income_input(ym(2025, 1), f.salary, 30000))
        .unwrap();
    assert_eq!(report.allocations_created, 1);
    let plans = budgets::allocations_for_user(&f.conn, f.user).unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].monthly, dec(5000));
    assert_eq!(plans[0].quarterly, dec(15000));
    assert_eq!(plans[0].yearly, dec(60000));
}

#[test]
fn may_plan_sets_only_the_matching_field_per_anchor() {
    let mut f = setup();
    reconcile_income(&mut f.conn, f.user, &income_input(ym(2025, 5), f.salary, 30000)).unwrap();
    let month = budgets::find_allocation(&f.conn, f.user, d(2025, 5, 1))
        .unwrap()
        .unwrap();
    let quarter = budgets::find_allocation(&f.conn, f.user, d(2025, 4, 1))
        .unwrap()
        .unwrap();
    let year = budgets::find_allocation(&f.conn, f.user, d(2025, 1, 1))
        .unwrap()
        .unwrap();
    assert_eq!((month.monthly, month.quarterly, month.yearly), (dec(5000), dec(0), dec(0)));
    assert_eq!(
        (quarter.monthly, quarter.quarterly, quarter.yearly),
        (dec(0), dec(15000), dec(0))
    );
    assert_eq!((year.monthly, year.quarterly, year.yearly), (dec(0), dec(0), dec(60000)));
}

#[test]
fn reconciling_twice_leaves_store_unchanged() {
    let mut f = setup();
    let input = income_input(ym(2025, 3), f.salary, 30000);
    reconcile_income(&mut f.conn, f.user, &input).unwrap();
    let decls = budgets::declarations_for_user(&f.conn, f.user).unwrap();
    let plans = budgets::allocations_for_user(&f.conn, f.user).unwrap();
    let rows = items::for_user(&f.conn, f.user).unwrap();

    let second = reconcile_income(&mut f.conn, f.user, &input).unwrap();
    assert_eq!(second.allocations_created, 0);
    assert_eq!(second.income_rows_created, 0);
    assert_eq!(budgets::declarations_for_user(&f.conn, f.user).unwrap(), decls);
    assert_eq!(budgets::allocations_for_user(&f.conn, f.user).unwrap(), plans);
    assert_eq!(items::for_user(&f.conn, f.user).unwrap(), rows);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].transaction_date, d(2025, 3, 1));
    assert_eq!(rows[0].amount, dec(30000));
}

#[test]
fn zero_income_line_removes_budget_and_income_rows() {
    let mut f = setup();
    reconcile_income(&mut f.conn, f.user, &income_input(ym(2025, 3), f.salary, 30000)).unwrap();
    let report =
        reconcile_income(&mut f.conn, f.user, &income_input(ym(2025, 3), f.salary, 0)).unwrap();
    assert_eq!(report.declarations_removed, 1);
    assert_eq!(report.income_rows_deleted, 1);
    assert!(budgets::declarations_for_user(&f.conn, f.user).unwrap().is_empty());
    assert!(items::for_user(&f.conn, f.user).unwrap().is_empty());
}

#[test]
fn editing_one_month_splits_a_longer_declaration() {
    let mut f = setup();
    let mut input = income_input(ym(2025, 1), f.salary, 100);
    input.lines[0].through = Some(ym(2025, 3));
    reconcile_income(&mut f.conn, f.user, &input).unwrap();
    let decls = budgets::declarations_for_user(&f.conn, f.user).unwrap();
    assert_eq!(decls.len(), 1);
    assert_eq!((decls[0].month, decls[0].end_month), (d(2025, 1, 1), d(2025, 4, 1)));

    reconcile_income(&mut f.conn, f.user, &income_input(ym(2025, 2), f.salary, 200)).unwrap();
    let spans: Vec<(NaiveDate, NaiveDate, Decimal)> =
        budgets::declarations_for_user(&f.conn, f.user)
            .unwrap()
            .into_iter()
            .map(|b| (b.month, b.end_month, b.amount))
            .collect();
    assert_eq!(
        spans,
        vec![
            (d(2025, 1, 1), d(2025, 2, 1), dec(100)),
            (d(2025, 2, 1), d(2025, 3, 1), dec(200)),
            (d(2025, 3, 1), d(2025, 4, 1), dec(100)),
        ]
    );
}

#[test]
fn income_plan_rejects_expense_category() {
    let mut f = setup();
    let err = reconcile_income(&mut f.conn, f.user, &income_input(ym(2025, 3), f.food, 10))
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput { .. }));
    assert!(budgets::allocations_for_user(&f.conn, f.user).unwrap().is_empty());
}

#[test]
fn duplicate_allocation_insert_is_a_conflict() {
    let f = setup();
    let z = Decimal::ZERO;
    budgets::insert_allocation(&f.conn, f.user, d(2025, 1, 1), z, z, z).unwrap();
    let err = budgets::insert_allocation(&f.conn, f.user, d(2025, 1, 1), z, z, z).unwrap_err();
    assert!(matches!(err, CoreError::Conflict { .. }));
}

#[test]
fn duplicate_declaration_insert_is_a_conflict() {
    let f = setup();
    budgets::insert_declaration(&f.conn, f.user, f.food, d(2025, 2, 1), d(2025, 3, 1), dec(50), true)
        .unwrap();
    let err = budgets::insert_declaration(
        &f.conn,
        f.user,
        f.food,
        d(2025, 2, 1),
        d(2025, 5, 1),
        dec(70),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::Conflict { .. }));
    let decls = budgets::declarations_for_category(&f.conn, f.user, f.food).unwrap();
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].amount, dec(50));
}

#[test]
fn month_budget_inside_a_yearly_one_keeps_the_remaining_shares() {
    let mut f = setup();
    let line = |amount| BudgetLine {
        category_id: f.food,
        amount: dec(amount),
    };
    declare_category_budgets(&mut f.conn, f.user, PeriodKind::Yearly, d(2025, 1, 1), &[line(12000)])
        .unwrap();
    declare_category_budgets(&mut f.conn, f.user, PeriodKind::Monthly, d(2025, 3, 1), &[line(500)])
        .unwrap();

    let spans: Vec<(NaiveDate, NaiveDate, Decimal, bool)> =
        budgets::declarations_for_category(&f.conn, f.user, f.food)
            .unwrap()
            .into_iter()
            .map(|b| (b.month, b.end_month, b.amount, b.per_month))
            .collect();
    assert_eq!(
        spans,
        vec![
            (d(2025, 1, 1), d(2025, 3, 1), dec(2000), false),
            (d(2025, 3, 1), d(2025, 4, 1), dec(500), false),
            (d(2025, 4, 1), d(2026, 1, 1), dec(9000), false),
        ]
    );
}

#[test]
fn quarterly_category_budget_spans_the_quarter() {
    let mut f = setup();
    let line = BudgetLine {
        category_id: f.food,
        amount: dec(3000),
    };
    declare_category_budgets(&mut f.conn, f.user, PeriodKind::Quarterly, d(2025, 8, 20), &[line])
        .unwrap();
    let decls = budgets::declarations_for_category(&f.conn, f.user, f.food).unwrap();
    assert_eq!(decls.len(), 1);
    assert_eq!((decls[0].month, decls[0].end_month), (d(2025, 7, 1), d(2025, 10, 1)));

    let dup = [
        BudgetLine {
            category_id: f.food,
            amount: dec(1),
        },
        BudgetLine {
            category_id: f.food,
            amount: dec(2),
        },
    ];
    let err = declare_category_budgets(&mut f.conn, f.user, PeriodKind::Monthly, d(2025, 8, 1), &dup)
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput { .. }));
}

#[test]
fn deduction_needs_an_existing_plan() {
    let mut f = setup();
    assert!(!deduct_from_plan(&f.conn, f.user, PeriodKind::Monthly, d(2025, 3, 9), dec(10)).unwrap());

    reconcile_income(&mut f.conn, f.user, &income_input(ym(2025, 3), f.salary, 30000)).unwrap();
    assert!(deduct_from_plan(&f.conn, f.user, PeriodKind::Monthly, d(2025, 3, 9), dec(10)).unwrap());
    let plan = budgets::find_allocation(&f.conn, f.user, d(2025, 3, 1))
        .unwrap()
        .unwrap();
    assert_eq!(plan.monthly, dec(4990));
}

fn expense(f: &Fixture, amount: i64, recurrence: Recurrence) -> NewTransaction {
    NewTransaction {
        user_id: f.user,
        amount: dec(amount),
        tx_type: TxType::Expense,
        recurrence,
        transaction_date: d(2025, 3, 31),
        posting_date: d(2025, 3, 31),
        category_id: f.food,
        note: Some("groceries".into()),
    }
}

#[test]
fn record_transaction_expands_and_deducts_once() {
    let mut f = setup();
    reconcile_income(&mut f.conn, f.user, &income_input(ym(2025, 1), f.salary, 30000)).unwrap();
    let draft = expense(
        &f,
        250,
        Recurrence::Monthly {
            until: Some(ym(2025, 5)),
        },
    );
    let ids = record_transaction(
        &mut f.conn,
        &draft,
        Some((PeriodKind::Yearly, d(2025, 3, 31))),
    )
    .unwrap();
    assert_eq!(ids.len(), 3);
    let dates: Vec<NaiveDate> = ids
        .iter()
        .map(|id| items::get(&f.conn, *id).unwrap().unwrap().transaction_date)
        .collect();
    assert_eq!(dates, vec![d(2025, 3, 31), d(2025, 4, 30), d(2025, 5, 31)]);

    let plan = budgets::find_allocation(&f.conn, f.user, d(2025, 1, 1))
        .unwrap()
        .unwrap();
    assert_eq!(plan.yearly, dec(59750));
}

#[test]
fn record_transaction_validates_before_writing() {
    let mut f = setup();
    let free = expense(&f, 0, Recurrence::Once);
    let err = record_transaction(&mut f.conn, &free, None).unwrap_err();
    assert!(matches!(err, CoreError::InvalidAmount { .. }));

    let mut wrong_kind = expense(&f, 10, Recurrence::Once);
    wrong_kind.tx_type = TxType::Income;
    let err = record_transaction(&mut f.conn, &wrong_kind, None).unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput { .. }));

    let mut ghost = expense(&f, 10, Recurrence::Once);
    ghost.user_id = 404;
    let err = record_transaction(&mut f.conn, &ghost, None).unwrap_err();
    assert!(matches!(err, CoreError::UserNotFound { user_id: 404 }));

    assert!(items::for_user(&f.conn, f.user).unwrap().is_empty());
}
