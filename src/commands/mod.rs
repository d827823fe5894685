// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod absences;
pub mod budgets;
pub mod categories;
pub mod config;
pub mod months;
pub mod plan;
pub mod reports;
pub mod savings;
pub mod transactions;
pub mod users;
