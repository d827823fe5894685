// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Category budget declarations and income plan allocations.
//!
//! Inserts never overwrite: a second row for the same key comes back as
//! `CoreError::Conflict` and the caller must go through the update path.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use super::decimal_at;
use crate::error::{CoreError, CoreResult};
use crate::models::{BudgetDeclaration, BudgetPlanAllocation, TxType};

const DECL_COLS: &str = "id, user_id, category_id, month, end_month, amount, per_month";
const PLAN_COLS: &str = "id, user_id, month, monthly, quarterly, yearly";

fn decl_from_row(r: &Row) -> rusqlite::Result<BudgetDeclaration> {
    Ok(BudgetDeclaration {
        id: r.get(0)?,
        user_id: r.get(1)?,
        category_id: r.get(2)?,
        month: r.get(3)?,
        end_month: r.get(4)?,
        amount: decimal_at(r, 5)?,
        per_month: r.get(6)?,
    })
}

fn plan_from_row(r: &Row) -> rusqlite::Result<BudgetPlanAllocation> {
    Ok(BudgetPlanAllocation {
        id: r.get(0)?,
        user_id: r.get(1)?,
        month: r.get(2)?,
        monthly: decimal_at(r, 3)?,
        quarterly: decimal_at(r, 4)?,
        yearly: decimal_at(r, 5)?,
    })
}

pub fn insert_declaration(
    conn: &Connection,
    user_id: i64,
    category_id: i64,
    month: NaiveDate,
    end_month: NaiveDate,
    amount: Decimal,
    per_month: bool,
) -> CoreResult<i64> {
    if end_month <= month {
        return Err(CoreError::invalid(
            "budget range",
            format!("end {} must be after start {}", end_month, month),
        ));
    }
    conn.execute(
        "INSERT INTO budget_declarations(user_id, category_id, month, end_month, amount, per_month)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![user_id, category_id, month, end_month, amount.to_string(), per_month],
    )
    .map_err(|e| {
        CoreError::from_insert(
            e,
            "BudgetDeclaration",
            format!("user {} / category {} / {}", user_id, category_id, month),
        )
    })?;
    Ok(conn.last_insert_rowid())
}

pub fn update_declaration(
    conn: &Connection,
    id: i64,
    end_month: NaiveDate,
    amount: Decimal,
    per_month: bool,
) -> CoreResult<()> {
    conn.execute(
        "UPDATE budget_declarations SET end_month=?2, amount=?3, per_month=?4 WHERE id=?1",
        params![id, end_month, amount.to_string(), per_month],
    )?;
    Ok(())
}

pub fn delete_declaration(conn: &Connection, id: i64) -> CoreResult<()> {
    conn.execute("DELETE FROM budget_declarations WHERE id=?1", params![id])?;
    Ok(())
}

pub fn declarations_for_category(
    conn: &Connection,
    user_id: i64,
    category_id: i64,
) -> CoreResult<Vec<BudgetDeclaration>> {
    let sql = format!(
        "SELECT {DECL_COLS} FROM budget_declarations
         WHERE user_id=?1 AND category_id=?2 ORDER BY month"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id, category_id], decl_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn declarations_for_user(conn: &Connection, user_id: i64) -> CoreResult<Vec<BudgetDeclaration>> {
    let sql = format!(
        "SELECT {DECL_COLS} FROM budget_declarations
         WHERE user_id=?1 ORDER BY category_id, month"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], decl_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Declarations whose `[month, end_month)` intersects `[start, end)`,
/// optionally limited to categories of the given types.
pub fn declarations_overlapping(
    conn: &Connection,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    kinds: &[TxType],
) -> CoreResult<Vec<BudgetDeclaration>> {
    let mut stmt = conn.prepare(
        "SELECT b.id, b.user_id, b.category_id, b.month, b.end_month, b.amount, b.per_month,
                c.kind
         FROM budget_declarations b JOIN categories c ON b.category_id=c.id
         WHERE b.user_id=?1 AND b.month<?3 AND b.end_month>?2
         ORDER BY b.category_id, b.month",
    )?;
    let mut rows = stmt.query(params![user_id, start, end])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let kind: TxType = super::parsed_at(r, 7)?;
        if kinds.is_empty() || kinds.contains(&kind) {
            out.push(decl_from_row(r)?);
        }
    }
    Ok(out)
}

pub fn insert_allocation(
    conn: &Connection,
    user_id: i64,
    month: NaiveDate,
    monthly: Decimal,
    quarterly: Decimal,
    yearly: Decimal,
) -> CoreResult<i64> {
    conn.execute(
        "INSERT INTO budget_plans(user_id, month, monthly, quarterly, yearly)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            month,
            monthly.to_string(),
            quarterly.to_string(),
            yearly.to_string()
        ],
    )
    .map_err(|e| {
        CoreError::from_insert(
            e,
            "BudgetPlanAllocation",
            format!("user {} / {}", user_id, month),
        )
    })?;
    Ok(conn.last_insert_rowid())
}

pub fn find_allocation(
    conn: &Connection,
    user_id: i64,
    month: NaiveDate,
) -> CoreResult<Option<BudgetPlanAllocation>> {
    let sql = format!("SELECT {PLAN_COLS} FROM budget_plans WHERE user_id=?1 AND month=?2");
    Ok(conn
        .query_row(&sql, params![user_id, month], plan_from_row)
        .optional()?)
}

pub fn update_allocation(conn: &Connection, plan: &BudgetPlanAllocation) -> CoreResult<()> {
    conn.execute(
        "UPDATE budget_plans SET monthly=?2, quarterly=?3, yearly=?4 WHERE id=?1",
        params![
            plan.id,
            plan.monthly.to_string(),
            plan.quarterly.to_string(),
            plan.yearly.to_string()
        ],
    )?;
    Ok(())
}

pub fn allocations_for_user(
    conn: &Connection,
    user_id: i64,
) -> CoreResult<Vec<BudgetPlanAllocation>> {
    let sql = format!("SELECT {PLAN_COLS} FROM budget_plans WHERE user_id=?1 ORDER BY month");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], plan_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
