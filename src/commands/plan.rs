// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::planner::{self, IncomeLine, IncomePlanInput};
use crate::store::budgets;
use crate::utils::{
    currency_label, fmt_money, id_for_category, maybe_print_json, parse_decimal, parse_month,
    pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("income", sub)) => income(conn, user_id, sub)?,
        Some(("show", sub)) => show(conn, user_id, sub)?,
        _ => {}
    }
    Ok(())
}

/// `Salary=25000` or `Salary=25000@2025-12`.
fn parse_line(conn: &Connection, raw: &str) -> Result<IncomeLine> {
    let (name, rest) = raw
        .split_once('=')
        .with_context(|| format!("Invalid line '{}', expected CATEGORY=AMOUNT[@YYYY-MM]", raw))?;
    let (amount, through) = match rest.split_once('@') {
        Some((a, t)) => (a, Some(parse_month(t)?)),
        None => (rest, None),
    };
    Ok(IncomeLine {
        category_id: id_for_category(conn, name)?,
        amount: parse_decimal(amount)?,
        through,
    })
}

fn income(conn: &mut Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let lines = sub
        .get_many::<String>("line")
        .unwrap_or_default()
        .map(|l| parse_line(conn, l))
        .collect::<Result<Vec<_>>>()?;
    let input = IncomePlanInput {
        month,
        lines,
        monthly: parse_decimal(sub.get_one::<String>("monthly").unwrap())?,
        quarterly: parse_decimal(sub.get_one::<String>("quarterly").unwrap())?,
        yearly: parse_decimal(sub.get_one::<String>("yearly").unwrap())?,
    };
    let report = planner::reconcile_income(conn, user_id, &input)?;
    println!(
        "Income plan for {} saved: {} budget row(s) written, {} removed, {} income row(s) created, {} updated, {} deleted",
        month,
        report.declarations_written,
        report.declarations_removed,
        report.income_rows_created,
        report.income_rows_updated,
        report.income_rows_deleted
    );
    Ok(())
}

fn show(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let data = budgets::allocations_for_user(conn, user_id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let label = currency_label(conn)?;
        let rows = data
            .iter()
            .map(|p| {
                vec![
                    p.month.format("%Y-%m").to_string(),
                    fmt_money(&p.monthly, &label),
                    fmt_money(&p.quarterly, &label),
                    fmt_money(&p.yearly, &label),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Anchor", "Monthly", "Quarterly", "Yearly"], rows)
        );
    }
    Ok(())
}
