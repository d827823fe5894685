// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::models::{NewTransaction, Recurrence, TxType};
use crate::store::{self, categories, items, users};

fn positive(amount: Decimal) -> CoreResult<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::InvalidAmount { amount });
    }
    Ok(())
}

fn once(
    user_id: i64,
    amount: Decimal,
    tx_type: TxType,
    category_id: i64,
    date: NaiveDate,
    posted: NaiveDate,
) -> NewTransaction {
    NewTransaction {
        user_id,
        amount,
        tx_type,
        recurrence: Recurrence::Once,
        transaction_date: date,
        posting_date: posted,
        category_id,
        note: None,
    }
}

/// Moves `amount` into a savings category.
pub fn deposit(
    conn: &mut Connection,
    user_id: i64,
    savings_category_id: i64,
    amount: Decimal,
    date: NaiveDate,
    posted: NaiveDate,
) -> CoreResult<i64> {
    positive(amount)?;
    let tx = store::write_tx(conn)?;
    users::require(&tx, user_id)?;
    categories::require(&tx, savings_category_id, Some(TxType::Savings))?;
    let id = items::insert(
        &tx,
        &once(user_id, amount, TxType::Savings, savings_category_id, date, posted),
    )?;
    tx.commit()?;
    info!(user_id, %amount, "savings deposit");
    Ok(id)
}

/// Takes `amount` out of savings: a negative savings row plus the matching
/// income row, written together.
pub fn withdraw(
    conn: &mut Connection,
    user_id: i64,
    savings_category_id: i64,
    income_category_id: i64,
    amount: Decimal,
    date: NaiveDate,
    posted: NaiveDate,
) -> CoreResult<(i64, i64)> {
    positive(amount)?;
    let tx = store::write_tx(conn)?;
    users::require(&tx, user_id)?;
    categories::require(&tx, savings_category_id, Some(TxType::Savings))?;
    categories::require(&tx, income_category_id, Some(TxType::Income))?;
    let income_id = items::insert(
        &tx,
        &once(user_id, amount, TxType::Income, income_category_id, date, posted),
    )?;
    let savings_id = items::insert(
        &tx,
        &once(user_id, -amount, TxType::Savings, savings_category_id, date, posted),
    )?;
    tx.commit()?;
    info!(user_id, %amount, "savings withdrawal");
    Ok((income_id, savings_id))
}
