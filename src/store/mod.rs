// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed persistence for every entity the engine reads.
//!
//! Functions take `&Connection` so they work equally on a plain connection
//! and inside a `rusqlite::Transaction` (which derefs to one).

pub mod absences;
pub mod budgets;
pub mod categories;
pub mod closes;
pub mod items;
pub mod users;

use rust_decimal::Decimal;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, Transaction, TransactionBehavior};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

pub(crate) fn decimal_at(r: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    s.trim()
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parsed_at<T>(r: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = CoreError>,
{
    let s: String = r.get(idx)?;
    s.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Runs `f` inside one deferred read transaction so every query it makes
/// sees the same snapshot.
pub fn snapshot<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> CoreResult<T>,
) -> CoreResult<T> {
    let tx = conn.unchecked_transaction()?;
    let out = f(&tx)?;
    tx.commit()?;
    Ok(out)
}

/// Starts a write transaction that takes the write lock up front, so a
/// read-then-write sequence cannot interleave with another writer.
pub fn write_tx(conn: &mut Connection) -> CoreResult<Transaction<'_>> {
    Ok(conn.transaction_with_behavior(TransactionBehavior::Immediate)?)
}
