// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::CancelToken;
use crate::engine::aggregate::balance_for_user;
use crate::engine::forecast::forecast_from_store;
use crate::utils::{currency_label, fmt_money, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn forecast(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let f = forecast_from_store(conn, user_id, month.year, month.month, &CancelToken::none())?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &f)? {
        return Ok(());
    }
    let label = currency_label(conn)?;
    let impact = &f.salary_impact;
    let rows = vec![
        vec!["Income".into(), fmt_money(&f.total_income, &label)],
        vec!["Expenses".into(), fmt_money(&f.total_expenses, &label)],
        vec!["Savings".into(), fmt_money(&f.total_savings, &label)],
        vec!["Absence deduction".into(), fmt_money(&-impact.deduction, &label)],
        vec!["Compensation".into(), fmt_money(&impact.compensation, &label)],
        vec!["Balance".into(), fmt_money(&f.balance, &label)],
    ];
    println!("Forecast {}", month);
    println!("{}", pretty_table(&["", "Amount"], rows));
    Ok(())
}

pub fn balance(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let bal = balance_for_user(conn, user_id)?;
    let v = json!({ "user_id": user_id, "balance": bal });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &v)? {
        println!("Balance: {}", fmt_money(&bal, &currency_label(conn)?));
    }
    Ok(())
}
