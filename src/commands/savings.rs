// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{aggregate, savings};
use crate::store::items;
use crate::utils::{
    currency_label, fmt_money, id_for_category, maybe_print_json, parse_date, parse_decimal,
    pretty_table,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

fn date_or_today(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("date") {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn handle(conn: &mut Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    let today = Local::now().date_naive();
    match m.subcommand() {
        Some(("deposit", sub)) => {
            let cat = sub.get_one::<String>("category").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let date = date_or_today(sub)?;
            let cat_id = id_for_category(conn, cat)?;
            savings::deposit(conn, user_id, cat_id, amount, date, today)?;
            println!("Deposited {} into '{}'", amount, cat);
        }
        Some(("withdraw", sub)) => {
            let cat = sub.get_one::<String>("category").unwrap();
            let income_cat = sub.get_one::<String>("income-category").unwrap();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let date = date_or_today(sub)?;
            let cat_id = id_for_category(conn, cat)?;
            let income_id = id_for_category(conn, income_cat)?;
            savings::withdraw(conn, user_id, cat_id, income_id, amount, date, today)?;
            println!("Withdrew {} from '{}' into '{}'", amount, cat, income_cat);
        }
        Some(("summary", sub)) => {
            let date = date_or_today(sub)?;
            let txs = items::for_user(conn, user_id)?;
            let summary = aggregate::savings_summary(&txs, date);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
                let label = currency_label(conn)?;
                let rows = vec![
                    vec!["Last month".into(), fmt_money(&summary.last_month, &label)],
                    vec!["Last quarter".into(), fmt_money(&summary.last_quarter, &label)],
                    vec!["Last year".into(), fmt_money(&summary.last_year, &label)],
                ];
                println!("{}", pretty_table(&["Window", "Saved"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
