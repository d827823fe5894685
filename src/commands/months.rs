// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::closes;
use crate::utils::parse_month;
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user_id: i64, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("close", sub)) => {
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            closes::close_month(conn, user_id, month, Local::now().naive_local())?;
            println!("Closed {}", month);
        }
        Some(("status", sub)) => {
            let month = parse_month(sub.get_one::<String>("month").unwrap())?;
            match closes::find(conn, user_id, month)? {
                Some(c) => println!("{} closed at {}", month, c.closed_at.format("%Y-%m-%d %H:%M")),
                None => println!("{} is open", month),
            }
        }
        _ => {}
    }
    Ok(())
}
