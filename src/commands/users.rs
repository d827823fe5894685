// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::users;
use crate::utils::{currency_label, fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let first = sub.get_one::<String>("first").unwrap();
            let last = sub.get_one::<String>("last").map(String::as_str).unwrap_or("");
            let income = parse_decimal(sub.get_one::<String>("income").unwrap())?;
            let hours = *sub.get_one::<i32>("hours").unwrap();
            let id = users::add(conn, first, last, income, hours)?;
            if users::active(conn)?.is_none() {
                users::set_active(conn, id)?;
            }
            println!("Added user {} ({})", id, first);
        }
        Some(("list", sub)) => {
            let data = users::list(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let label = currency_label(conn)?;
                let rows = data
                    .iter()
                    .map(|u| {
                        vec![
                            u.id.to_string(),
                            u.full_name(),
                            fmt_money(&u.income_monthly, &label),
                            u.work_hours_monthly.to_string(),
                            if u.active { "*".into() } else { String::new() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Income", "Hours", "Active"], rows)
                );
            }
        }
        Some(("activate", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            users::set_active(conn, id)?;
            println!("User {} is now active", id);
        }
        Some(("pay", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let income = parse_decimal(sub.get_one::<String>("income").unwrap())?;
            let hours = *sub.get_one::<i32>("hours").unwrap();
            users::update_pay(conn, id, income, hours)?;
            println!("Updated pay for user {}", id);
        }
        _ => {}
    }
    Ok(())
}
