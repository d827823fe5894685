// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{CoreError, CoreResult};
use crate::models::MonthClose;
use crate::period::YearMonth;

/// Marks `month` as reviewed. Closing the same month twice is a conflict.
pub fn close_month(
    conn: &Connection,
    user_id: i64,
    month: YearMonth,
    closed_at: NaiveDateTime,
) -> CoreResult<i64> {
    conn.execute(
        "INSERT INTO month_closes(user_id, month, closed_at) VALUES (?1, ?2, ?3)",
        params![user_id, month.first_day(), closed_at],
    )
    .map_err(|e| CoreError::from_insert(e, "MonthClose", format!("user {} / {}", user_id, month)))?;
    Ok(conn.last_insert_rowid())
}

pub fn find(conn: &Connection, user_id: i64, month: YearMonth) -> CoreResult<Option<MonthClose>> {
    Ok(conn
        .query_row(
            "SELECT id, user_id, month, closed_at FROM month_closes WHERE user_id=?1 AND month=?2",
            params![user_id, month.first_day()],
            |r| {
                Ok(MonthClose {
                    id: r.get(0)?,
                    user_id: r.get(1)?,
                    month: r.get(2)?,
                    closed_at: r.get(3)?,
                })
            },
        )
        .optional()?)
}

pub fn is_closed(conn: &Connection, user_id: i64, month: YearMonth) -> CoreResult<bool> {
    Ok(find(conn, user_id, month)?.is_some())
}
