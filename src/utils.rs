// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::period::YearMonth;
use crate::store;

pub const CURRENCY_LABEL_KEY: &str = "currency_label";
const DEFAULT_CURRENCY_LABEL: &str = "kr";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<YearMonth> {
    Ok(s.parse::<YearMonth>()?)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal, label: &str) -> String {
    format!("{:.2} {}", d.round_dp(2), label)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn currency_label(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, CURRENCY_LABEL_KEY)?
        .unwrap_or_else(|| DEFAULT_CURRENCY_LABEL.to_string()))
}

pub fn id_for_category(conn: &Connection, name: &str) -> Result<i64> {
    let cat = store::categories::by_name(conn, name)?
        .with_context(|| format!("Category '{}' not found", name.trim()))?;
    Ok(cat.id)
}

/// The user a command acts on: the explicit `--user` id, else the active
/// user. Resolved once here and passed down explicitly.
pub fn resolve_user(conn: &Connection, explicit: Option<i64>) -> Result<i64> {
    match explicit {
        Some(id) => Ok(store::users::require(conn, id)?.id),
        None => Ok(store::users::active(conn)?
            .ok_or(CoreError::NoActiveUser)?
            .id),
    }
}
