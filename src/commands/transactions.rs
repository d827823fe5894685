// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::planner;
use crate::models::{NewTransaction, Recurrence, Transaction, TxType};
use crate::period::PeriodKind;
use crate::store::{categories, items};
use crate::utils::{
    currency_label, fmt_money, id_for_category, maybe_print_json, parse_date, parse_decimal,
    parse_month, pretty_table,
};
use anyhow::{Result, bail};
use chrono::{Datelike, Local};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user_id, sub)?,
        Some(("list", sub)) => list(conn, user_id, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            match items::get(conn, id)? {
                Some(t) if t.user_id == user_id => items::delete(conn, id)?,
                _ => bail!("Transaction {} not found", id),
            }
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn recurrence_from(sub: &clap::ArgMatches, month_of_date: u32) -> Result<Recurrence> {
    let kind = sub.get_one::<String>("recurrence").unwrap();
    Ok(match kind.trim().to_ascii_lowercase().as_str() {
        "once" => Recurrence::Once,
        "monthly" => Recurrence::Monthly {
            until: sub
                .get_one::<String>("until")
                .map(|s| parse_month(s))
                .transpose()?,
        },
        "yearly" => Recurrence::Yearly {
            month: sub
                .get_one::<u32>("yearly-month")
                .copied()
                .unwrap_or(month_of_date),
            until_year: sub.get_one::<i32>("until-year").copied(),
        },
        other => bail!("Unknown recurrence '{}', expected once|monthly|yearly", other),
    })
}

fn add(conn: &mut Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let tx_type: TxType = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category_name = sub.get_one::<String>("category").unwrap();
    let category_id = id_for_category(conn, category_name)?;
    let recurrence = recurrence_from(sub, date.month())?;
    let deduct = sub
        .get_one::<String>("deduct")
        .map(|s| s.parse::<PeriodKind>())
        .transpose()?
        .map(|k| (k, date));

    let draft = NewTransaction {
        user_id,
        amount,
        tx_type,
        recurrence,
        transaction_date: date,
        posting_date: Local::now().date_naive(),
        category_id,
        note: sub.get_one::<String>("note").cloned(),
    };
    let ids = planner::record_transaction(conn, &draft, deduct)?;
    let label = currency_label(conn)?;
    println!(
        "Recorded {} {} on {} in '{}' ({} row{})",
        tx_type,
        fmt_money(&amount, &label),
        date,
        category_name,
        ids.len(),
        if ids.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TxRow {
    pub id: i64,
    pub date: String,
    pub tx_type: String,
    pub recurrence: String,
    pub amount: String,
    pub category: String,
    pub note: Option<String>,
}

fn to_row(conn: &Connection, t: &Transaction) -> Result<TxRow> {
    let category = categories::get(conn, t.category_id)?
        .map(|c| c.name)
        .unwrap_or_default();
    Ok(TxRow {
        id: t.id,
        date: t.transaction_date.to_string(),
        tx_type: t.tx_type.to_string(),
        recurrence: t.recurrence.kind_str().to_string(),
        amount: t.amount.to_string(),
        category,
        note: t.note.clone(),
    })
}

pub fn query_rows(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<Vec<TxRow>> {
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;
    let tx_type = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TxType>())
        .transpose()?;
    let limit = sub.get_one::<usize>("limit").copied();
    items::list(conn, user_id, month, tx_type, limit)?
        .iter()
        .map(|t| to_row(conn, t))
        .collect()
}

fn list(conn: &Connection, user_id: i64, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, user_id, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.tx_type.clone(),
                    r.recurrence.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.note.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Repeats", "Amount", "Category", "Note"],
                rows
            )
        );
    }
    Ok(())
}
