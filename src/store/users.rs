// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use tracing::info;

use super::{decimal_at, write_tx};
use crate::error::{CoreError, CoreResult};
use crate::models::User;

const COLS: &str = "id, first_name, last_name, income_monthly, work_hours_monthly, active";

fn from_row(r: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: r.get(0)?,
        first_name: r.get(1)?,
        last_name: r.get(2)?,
        income_monthly: decimal_at(r, 3)?,
        work_hours_monthly: r.get(4)?,
        active: r.get(5)?,
    })
}

fn check_hours(work_hours_monthly: i32) -> CoreResult<()> {
    if work_hours_monthly < 0 {
        return Err(CoreError::invalid(
            "work hours",
            format!("{} is negative", work_hours_monthly),
        ));
    }
    Ok(())
}

pub fn add(
    conn: &Connection,
    first_name: &str,
    last_name: &str,
    income_monthly: Decimal,
    work_hours_monthly: i32,
) -> CoreResult<i64> {
    if first_name.trim().is_empty() {
        return Err(CoreError::invalid("first name", "must not be empty"));
    }
    check_hours(work_hours_monthly)?;
    conn.execute(
        "INSERT INTO users(first_name, last_name, income_monthly, work_hours_monthly)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            first_name.trim(),
            last_name.trim(),
            income_monthly.to_string(),
            work_hours_monthly
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get(conn: &Connection, id: i64) -> CoreResult<Option<User>> {
    let sql = format!("SELECT {COLS} FROM users WHERE id=?1");
    Ok(conn.query_row(&sql, params![id], from_row).optional()?)
}

pub fn require(conn: &Connection, id: i64) -> CoreResult<User> {
    get(conn, id)?.ok_or(CoreError::UserNotFound { user_id: id })
}

pub fn list(conn: &Connection) -> CoreResult<Vec<User>> {
    let sql = format!("SELECT {COLS} FROM users ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn active(conn: &Connection) -> CoreResult<Option<User>> {
    let sql = format!("SELECT {COLS} FROM users WHERE active=1");
    Ok(conn.query_row(&sql, [], from_row).optional()?)
}

/// Marks `id` as the single active user. Clearing the old flag and
/// setting the new one happen in one transaction.
pub fn set_active(conn: &mut Connection, id: i64) -> CoreResult<()> {
    let tx = write_tx(conn)?;
    require(&tx, id)?;
    tx.execute("UPDATE users SET active=0 WHERE active=1 AND id<>?1", params![id])?;
    tx.execute("UPDATE users SET active=1 WHERE id=?1", params![id])?;
    tx.commit()?;
    info!(user_id = id, "active user switched");
    Ok(())
}

pub fn update_pay(
    conn: &Connection,
    id: i64,
    income_monthly: Decimal,
    work_hours_monthly: i32,
) -> CoreResult<()> {
    check_hours(work_hours_monthly)?;
    let n = conn.execute(
        "UPDATE users SET income_monthly=?2, work_hours_monthly=?3 WHERE id=?1",
        params![id, income_monthly.to_string(), work_hours_monthly],
    )?;
    if n == 0 {
        return Err(CoreError::UserNotFound { user_id: id });
    }
    Ok(())
}
