// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};

use super::parsed_at;
use crate::error::{CoreError, CoreResult};
use crate::models::{AbsenceKind, AbsenceRecord};
use crate::period::YearMonth;

const COLS: &str = "id, user_id, date_start, date_end, hours, kind, entered_on";

fn from_row(r: &Row) -> rusqlite::Result<AbsenceRecord> {
    Ok(AbsenceRecord {
        id: r.get(0)?,
        user_id: r.get(1)?,
        start: r.get(2)?,
        end: r.get(3)?,
        hours: r.get(4)?,
        kind: parsed_at(r, 5)?,
        entered_on: r.get(6)?,
    })
}

/// `end` defaults to `start` for single-day absences.
pub fn add(
    conn: &Connection,
    user_id: i64,
    start: NaiveDate,
    end: Option<NaiveDate>,
    hours: i32,
    kind: AbsenceKind,
    entered_on: NaiveDate,
) -> CoreResult<i64> {
    let end = end.unwrap_or(start);
    if end < start {
        return Err(CoreError::invalid(
            "absence range",
            format!("end {} is before start {}", end, start),
        ));
    }
    if hours < 0 {
        return Err(CoreError::invalid("hours", format!("{} is negative", hours)));
    }
    conn.execute(
        "INSERT INTO absences(user_id, date_start, date_end, hours, kind, entered_on)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![user_id, start, end, hours, kind.as_str(), entered_on],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn for_user(conn: &Connection, user_id: i64) -> CoreResult<Vec<AbsenceRecord>> {
    let sql = format!("SELECT {COLS} FROM absences WHERE user_id=?1 ORDER BY date_start, id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Absences with `start < month_end AND end >= month_start`.
pub fn overlapping_month(
    conn: &Connection,
    user_id: i64,
    month: YearMonth,
) -> CoreResult<Vec<AbsenceRecord>> {
    let sql = format!(
        "SELECT {COLS} FROM absences
         WHERE user_id=?1 AND date_start<?2 AND date_end>=?3
         ORDER BY date_start, id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(
        params![user_id, month.next().first_day(), month.first_day()],
        from_row,
    )?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn delete(conn: &Connection, id: i64) -> CoreResult<()> {
    let n = conn.execute("DELETE FROM absences WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(CoreError::NotFound {
            entity: "Absence".into(),
            id,
        });
    }
    Ok(())
}
