// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::Result;

use budgetplanner::{cli, commands, db, logging, utils};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    logging::init_tracing(matches.get_flag("verbose"));

    let db_arg = matches.get_one::<String>("db").map(PathBuf::from);
    let mut conn = db::open_or_init(db_arg.as_deref())?;
    let explicit_user = matches.get_one::<i64>("user").copied();

    match matches.subcommand() {
        Some(("init", _)) => {
            println!(
                "Database initialized at {}",
                db::db_path(db_arg.as_deref())?.display()
            );
        }
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        Some(("user", sub)) => commands::users::handle(&mut conn, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some((name, sub)) => {
            let user_id = utils::resolve_user(&conn, explicit_user)?;
            match name {
                "tx" => commands::transactions::handle(&mut conn, user_id, sub)?,
                "absence" => commands::absences::handle(&conn, user_id, sub)?,
                "budget" => commands::budgets::handle(&mut conn, user_id, sub)?,
                "plan" => commands::plan::handle(&mut conn, user_id, sub)?,
                "savings" => commands::savings::handle(&mut conn, user_id, sub)?,
                "forecast" => commands::reports::forecast(&conn, user_id, sub)?,
                "balance" => commands::reports::balance(&conn, user_id, sub)?,
                "month" => commands::months::handle(&conn, user_id, sub)?,
                _ => {
                    cli::build_cli().print_help()?;
                    println!();
                }
            }
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
