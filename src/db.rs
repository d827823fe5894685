// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Budgetplanner", "budgetplanner"));

/// Database file location. An explicit path (from `--db` or
/// `BUDGETPLANNER_DB`) wins over the platform data dir.
pub fn db_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(p) = explicit {
        if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return Ok(p.to_path_buf());
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("budgetplanner.sqlite"))
}

pub fn open_or_init(explicit: Option<&Path>) -> Result<Connection> {
    let path = db_path(explicit)?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL DEFAULT '',
        income_monthly TEXT NOT NULL DEFAULT '0',
        work_hours_monthly INTEGER NOT NULL DEFAULT 0,
        active INTEGER NOT NULL DEFAULT 0 CHECK(active IN (0,1)),
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    -- at most one active user
    CREATE UNIQUE INDEX IF NOT EXISTS idx_users_single_active ON users(active) WHERE active = 1;

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense','savings'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        tx_type TEXT NOT NULL CHECK(tx_type IN ('income','expense','savings')),
        recurrence TEXT NOT NULL CHECK(recurrence IN ('once','monthly','yearly')),
        yearly_month INTEGER CHECK(yearly_month BETWEEN 1 AND 12),
        end_year INTEGER,
        end_month INTEGER CHECK(end_month BETWEEN 1 AND 12),
        transaction_date TEXT NOT NULL,
        posting_date TEXT NOT NULL,
        category_id INTEGER NOT NULL,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        CHECK((recurrence = 'yearly') = (yearly_month IS NOT NULL)),
        CHECK(recurrence = 'monthly' OR end_month IS NULL),
        CHECK(recurrence <> 'once' OR end_year IS NULL),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, transaction_date);

    CREATE TABLE IF NOT EXISTS absences(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        date_start TEXT NOT NULL,
        date_end TEXT NOT NULL,
        hours INTEGER NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('sick','parental_care')),
        entered_on TEXT NOT NULL,
        CHECK(date_end >= date_start),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    -- one row per (user, category, start month); end_month is exclusive
    CREATE TABLE IF NOT EXISTS budget_declarations(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        category_id INTEGER NOT NULL,
        month TEXT NOT NULL,
        end_month TEXT NOT NULL,
        amount TEXT NOT NULL,
        per_month INTEGER NOT NULL DEFAULT 1,
        UNIQUE(user_id, category_id, month),
        CHECK(end_month > month),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY(category_id) REFERENCES categories(id) ON DELETE RESTRICT
    );

    CREATE TABLE IF NOT EXISTS budget_plans(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        month TEXT NOT NULL,
        monthly TEXT NOT NULL DEFAULT '0',
        quarterly TEXT NOT NULL DEFAULT '0',
        yearly TEXT NOT NULL DEFAULT '0',
        UNIQUE(user_id, month),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS month_closes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        month TEXT NOT NULL,
        closed_at TEXT NOT NULL,
        UNIQUE(user_id, month),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}
