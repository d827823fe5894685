// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction rows ("items").

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use super::{decimal_at, parsed_at};
use crate::error::{CoreError, CoreResult};
use crate::models::{NewTransaction, Recurrence, Transaction, TxType};
use crate::period::YearMonth;

const COLS: &str = "id, user_id, amount, tx_type, recurrence, yearly_month, end_year, end_month, \
                    transaction_date, posting_date, category_id, note";

fn from_row(r: &Row) -> rusqlite::Result<Transaction> {
    let kind: String = r.get(4)?;
    let recurrence = Recurrence::from_columns(&kind, r.get(5)?, r.get(6)?, r.get(7)?)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;
    Ok(Transaction {
        id: r.get(0)?,
        user_id: r.get(1)?,
        amount: decimal_at(r, 2)?,
        tx_type: parsed_at(r, 3)?,
        recurrence,
        transaction_date: r.get(8)?,
        posting_date: r.get(9)?,
        category_id: r.get(10)?,
        note: r.get(11)?,
    })
}

fn collect(conn: &Connection, sql: &str, p: impl rusqlite::Params) -> CoreResult<Vec<Transaction>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(p, from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn insert(conn: &Connection, t: &NewTransaction) -> CoreResult<i64> {
    let (yearly_month, end_year, end_month) = t.recurrence.columns();
    conn.execute(
        "INSERT INTO transactions(user_id, amount, tx_type, recurrence, yearly_month, end_year,
             end_month, transaction_date, posting_date, category_id, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            t.user_id,
            t.amount.to_string(),
            t.tx_type.as_str(),
            t.recurrence.kind_str(),
            yearly_month,
            end_year,
            end_month,
            t.transaction_date,
            t.posting_date,
            t.category_id,
            t.note
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get(conn: &Connection, id: i64) -> CoreResult<Option<Transaction>> {
    let sql = format!("SELECT {COLS} FROM transactions WHERE id=?1");
    Ok(conn.query_row(&sql, params![id], from_row).optional()?)
}

pub fn update_amount(
    conn: &Connection,
    id: i64,
    amount: Decimal,
    transaction_date: NaiveDate,
    posting_date: NaiveDate,
) -> CoreResult<()> {
    let n = conn.execute(
        "UPDATE transactions SET amount=?2, transaction_date=?3, posting_date=?4 WHERE id=?1",
        params![id, amount.to_string(), transaction_date, posting_date],
    )?;
    if n == 0 {
        return Err(CoreError::NotFound {
            entity: "Transaction".into(),
            id,
        });
    }
    Ok(())
}

pub fn delete(conn: &Connection, id: i64) -> CoreResult<()> {
    conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(())
}

pub fn for_user(conn: &Connection, user_id: i64) -> CoreResult<Vec<Transaction>> {
    let sql = format!(
        "SELECT {COLS} FROM transactions WHERE user_id=?1 ORDER BY transaction_date, id"
    );
    collect(conn, &sql, params![user_id])
}

/// Superset of the rows that can apply to `month`: every monthly row,
/// yearly rows paid in that month of year, and one-off rows dated inside it.
pub fn candidates_for_month(
    conn: &Connection,
    user_id: i64,
    month: YearMonth,
) -> CoreResult<Vec<Transaction>> {
    let sql = format!(
        "SELECT {COLS} FROM transactions
         WHERE user_id=?1 AND (
             recurrence='monthly'
             OR (recurrence='yearly' AND yearly_month=?2)
             OR (recurrence='once' AND transaction_date>=?3 AND transaction_date<?4)
         )
         ORDER BY transaction_date, id"
    );
    collect(
        conn,
        &sql,
        params![
            user_id,
            month.month,
            month.first_day(),
            month.next().first_day()
        ],
    )
}

/// Rows dated in `[start, end)`.
pub fn in_range(
    conn: &Connection,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> CoreResult<Vec<Transaction>> {
    let sql = format!(
        "SELECT {COLS} FROM transactions
         WHERE user_id=?1 AND transaction_date>=?2 AND transaction_date<?3
         ORDER BY transaction_date, id"
    );
    collect(conn, &sql, params![user_id, start, end])
}

pub fn income_for_category_in_month(
    conn: &Connection,
    user_id: i64,
    category_id: i64,
    month: YearMonth,
) -> CoreResult<Vec<Transaction>> {
    let sql = format!(
        "SELECT {COLS} FROM transactions
         WHERE user_id=?1 AND category_id=?2 AND tx_type='income'
           AND transaction_date>=?3 AND transaction_date<?4
         ORDER BY id"
    );
    collect(
        conn,
        &sql,
        params![
            user_id,
            category_id,
            month.first_day(),
            month.next().first_day()
        ],
    )
}

/// Newest first, optionally narrowed to one month and/or type.
pub fn list(
    conn: &Connection,
    user_id: i64,
    month: Option<YearMonth>,
    tx_type: Option<TxType>,
    limit: Option<usize>,
) -> CoreResult<Vec<Transaction>> {
    let (from, to) = match month {
        Some(m) => (Some(m.first_day()), Some(m.next().first_day())),
        None => (None, None),
    };
    let sql = format!(
        "SELECT {COLS} FROM transactions
         WHERE user_id=?1
           AND (?2 IS NULL OR transaction_date>=?2)
           AND (?3 IS NULL OR transaction_date<?3)
           AND (?4 IS NULL OR tx_type=?4)
         ORDER BY transaction_date DESC, id DESC
         LIMIT ?5"
    );
    let limit = limit.map(|l| l as i64).unwrap_or(-1);
    collect(
        conn,
        &sql,
        params![user_id, from, to, tx_type.map(|t| t.as_str()), limit],
    )
}
