// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types shared by the engine and the store.
//!
//! Precondition violations and constraint conflicts are distinct variants so
//! callers can tell "fix your input" apart from "update instead of insert".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// No user row exists for the given id.
    #[error("User {user_id} not found")]
    UserNotFound { user_id: i64 },

    /// A command needed the active user but none is marked active.
    #[error("No active user; run `user activate <id>` first")]
    NoActiveUser,

    /// Money amounts that must be strictly positive.
    #[error("Amount must be > 0, got {amount}")]
    InvalidAmount { amount: rust_decimal::Decimal },

    /// Any other argument that fails validation.
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    /// A unique constraint would be violated. The caller must update the
    /// existing row instead of inserting a second one.
    #[error("{entity} already exists for {key}")]
    Conflict { entity: String, key: String },

    /// The row a write refers to does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: String, id: i64 },

    /// A cancellation token fired between sub-steps.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Stored value '{value}' in {column} could not be parsed")]
    Parse { column: String, value: String },

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(entity: &str, key: impl Into<String>) -> Self {
        CoreError::Conflict {
            entity: entity.to_string(),
            key: key.into(),
        }
    }

    /// Maps unique/primary-key violations onto `Conflict`, leaves every
    /// other SQLite error as `Storage`.
    pub fn from_insert(err: rusqlite::Error, entity: &str, key: impl Into<String>) -> Self {
        if let rusqlite::Error::SqliteFailure(ref f, _) = err {
            if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            {
                return CoreError::conflict(entity, key);
            }
        }
        CoreError::Storage(err)
    }
}
