// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::AbsenceKind;
use crate::store::absences;
use crate::utils::{maybe_print_json, parse_date, pretty_table};
use anyhow::{Result, bail};
use chrono::Local;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let start = parse_date(sub.get_one::<String>("start").unwrap())?;
            let end = sub
                .get_one::<String>("end")
                .map(|s| parse_date(s))
                .transpose()?;
            let hours = *sub.get_one::<i32>("hours").unwrap();
            let kind: AbsenceKind = sub.get_one::<String>("kind").unwrap().parse()?;
            let id = absences::add(
                conn,
                user_id,
                start,
                end,
                hours,
                kind,
                Local::now().date_naive(),
            )?;
            println!("Recorded absence {} ({} h, {})", id, hours, kind.as_str());
        }
        Some(("list", sub)) => {
            let data = absences::for_user(conn, user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.start.to_string(),
                            a.end.to_string(),
                            a.hours.to_string(),
                            a.kind.as_str().to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "From", "To", "Hours", "Kind"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if !absences::for_user(conn, user_id)?.iter().any(|a| a.id == id) {
                bail!("Absence {} not found", id);
            }
            absences::delete(conn, id)?;
            println!("Removed absence {}", id);
        }
        _ => {}
    }
    Ok(())
}
