// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::CancelToken;
use crate::engine::aggregate::progress_for_period;
use crate::engine::planner::{self, BudgetLine};
use crate::period::{Period, PeriodKind};
use crate::store::{budgets, categories};
use crate::utils::{
    currency_label, fmt_money, id_for_category, maybe_print_json, parse_date, parse_decimal,
    parse_month, pretty_table,
};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &mut Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, user_id, sub)?,
        Some(("list", sub)) => list(conn, user_id, sub)?,
        Some(("progress", sub)) => progress(conn, user_id, sub)?,
        _ => {}
    }
    Ok(())
}

fn period_kind(sub: &clap::ArgMatches) -> Result<PeriodKind> {
    Ok(sub.get_one::<String>("period").unwrap().parse()?)
}

fn category_name(conn: &Connection, id: i64) -> Result<String> {
    Ok(categories::get(conn, id)?
        .map(|c| c.name)
        .unwrap_or_else(|| format!("#{}", id)))
}

fn set(conn: &mut Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let kind = period_kind(sub)?;
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let cat = sub.get_one::<String>("category").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let line = BudgetLine {
        category_id: id_for_category(conn, cat)?,
        amount,
    };
    planner::declare_category_budgets(conn, user_id, kind, month.first_day(), &[line])?;
    let period = Period::containing(kind, month.first_day());
    if amount.is_zero() {
        println!("Budget cleared for {} / {}", period.label(), cat);
    } else {
        println!("Budget set for {} / {} = {}", period.label(), cat, amount);
    }
    Ok(())
}

#[derive(Serialize)]
struct DeclarationRow {
    category: String,
    from: String,
    until: String,
    amount: Decimal,
    per_month: bool,
}

fn list(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let decls = match sub.get_one::<String>("category") {
        Some(name) => {
            budgets::declarations_for_category(conn, user_id, id_for_category(conn, name)?)?
        }
        None => budgets::declarations_for_user(conn, user_id)?,
    };
    let mut data = Vec::with_capacity(decls.len());
    for d in &decls {
        data.push(DeclarationRow {
            category: category_name(conn, d.category_id)?,
            from: d.month.format("%Y-%m").to_string(),
            until: d.end_month.format("%Y-%m").to_string(),
            amount: d.amount,
            per_month: d.per_month,
        });
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let label = currency_label(conn)?;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.from.clone(),
                    r.until.clone(),
                    fmt_money(&r.amount, &label),
                    if r.per_month { "per month" } else { "whole range" }.into(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "From", "Until (excl.)", "Amount", "Basis"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct ProgressRow {
    category: String,
    budget: Decimal,
    spent: Decimal,
    remaining: Decimal,
    progress_percent: Decimal,
    overspent: bool,
}

fn progress(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let kind = period_kind(sub)?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => Local::now().date_naive(),
    };
    let agg = progress_for_period(conn, user_id, kind, date, &CancelToken::none())?;
    let mut data = Vec::with_capacity(agg.by_category.len());
    for p in agg.by_category.values() {
        data.push(ProgressRow {
            category: category_name(conn, p.category_id)?,
            budget: p.budget,
            spent: p.spent,
            remaining: p.remaining,
            progress_percent: p.progress_percent.round_dp(1),
            overspent: p.overspent,
        });
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let label = currency_label(conn)?;
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    fmt_money(&r.budget, &label),
                    fmt_money(&r.spent, &label),
                    fmt_money(&r.remaining, &label),
                    format!("{}%", r.progress_percent),
                    if r.overspent { "over".into() } else { String::new() },
                ]
            })
            .collect();
        println!("{}", Period::containing(kind, date).label());
        println!(
            "{}",
            pretty_table(
                &["Category", "Budget", "Spent", "Remaining", "Progress", ""],
                rows
            )
        );
    }
    Ok(())
}
