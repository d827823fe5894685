// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::parsed_at;
use crate::error::{CoreError, CoreResult};
use crate::models::{Category, TxType};

fn from_row(r: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: r.get(0)?,
        name: r.get(1)?,
        kind: parsed_at(r, 2)?,
    })
}

pub fn add(conn: &Connection, name: &str, kind: TxType) -> CoreResult<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::invalid("category name", "must not be empty"));
    }
    conn.execute(
        "INSERT INTO categories(name, kind) VALUES (?1, ?2)",
        params![name, kind.as_str()],
    )
    .map_err(|e| CoreError::from_insert(e, "Category", name))?;
    Ok(conn.last_insert_rowid())
}

pub fn get(conn: &Connection, id: i64) -> CoreResult<Option<Category>> {
    Ok(conn
        .query_row(
            "SELECT id, name, kind FROM categories WHERE id=?1",
            params![id],
            from_row,
        )
        .optional()?)
}

/// Loads category `id`, failing when it is missing or, with `kind`, when
/// it holds a different type of transaction.
pub fn require(conn: &Connection, id: i64, kind: Option<TxType>) -> CoreResult<Category> {
    let cat = get(conn, id)?.ok_or(CoreError::NotFound {
        entity: "Category".into(),
        id,
    })?;
    if let Some(k) = kind {
        if cat.kind != k {
            return Err(CoreError::invalid(
                "category",
                format!("'{}' is a {} category, expected {}", cat.name, cat.kind, k),
            ));
        }
    }
    Ok(cat)
}

pub fn by_name(conn: &Connection, name: &str) -> CoreResult<Option<Category>> {
    Ok(conn
        .query_row(
            "SELECT id, name, kind FROM categories WHERE name=?1",
            params![name.trim()],
            from_row,
        )
        .optional()?)
}

pub fn list(conn: &Connection, kind: Option<TxType>) -> CoreResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, kind FROM categories WHERE ?1 IS NULL OR kind=?1 ORDER BY name",
    )?;
    let rows = stmt.query_map(params![kind.map(|k| k.as_str())], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Changes a category's type. Refused once any transaction references it.
pub fn set_kind(conn: &Connection, id: i64, kind: TxType) -> CoreResult<()> {
    let used: i64 = conn.query_row(
        "SELECT COUNT(*) FROM transactions WHERE category_id=?1",
        params![id],
        |r| r.get(0),
    )?;
    if used > 0 {
        return Err(CoreError::conflict(
            "Transactions",
            format!("category {} ({} rows); its type is fixed", id, used),
        ));
    }
    let n = conn.execute(
        "UPDATE categories SET kind=?2 WHERE id=?1",
        params![id, kind.as_str()],
    )?;
    if n == 0 {
        return Err(CoreError::NotFound {
            entity: "Category".into(),
            id,
        });
    }
    Ok(())
}

pub fn remove(conn: &Connection, id: i64) -> CoreResult<()> {
    let n = conn
        .execute("DELETE FROM categories WHERE id=?1", params![id])
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(ref f, _)
                if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
            {
                CoreError::conflict("Rows referencing category", id.to_string())
            }
            other => CoreError::Storage(other),
        })?;
    if n == 0 {
        return Err(CoreError::NotFound {
            entity: "Category".into(),
            id,
        });
    }
    Ok(())
}
