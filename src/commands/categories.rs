// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TxType;
use crate::store::categories;
use crate::utils::{id_for_category, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind: TxType = sub.get_one::<String>("type").unwrap().parse()?;
            categories::add(conn, name, kind)?;
            println!("Added {} category '{}'", kind, name.trim());
        }
        Some(("list", sub)) => {
            let kind = sub
                .get_one::<String>("type")
                .map(|s| s.parse::<TxType>())
                .transpose()?;
            let data = categories::list(conn, kind)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| vec![c.id.to_string(), c.name.clone(), c.kind.to_string()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Category", "Type"], rows));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            categories::remove(conn, id_for_category(conn, name)?)?;
            println!("Removed category '{}'", name);
        }
        Some(("retype", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind: TxType = sub.get_one::<String>("type").unwrap().parse()?;
            categories::set_kind(conn, id_for_category(conn, name)?, kind)?;
            println!("Category '{}' is now {}", name, kind);
        }
        _ => {}
    }
    Ok(())
}
