// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period-aware budgeting engine. The read side (`recurrence`, `salary`,
//! `aggregate`, `forecast`) is pure over explicit arguments; the write side
//! (`planner`, `savings`) wraps each operation in one store transaction.

pub mod aggregate;
pub mod cancel;
pub mod forecast;
pub mod planner;
pub mod recurrence;
pub mod salary;
pub mod savings;

pub use aggregate::{Aggregation, CategoryProgress, account_balance, aggregate};
pub use cancel::{CancelToken, ReloadGate, ReloadTicket};
pub use forecast::{ForecastResult, ForecastSource, build_monthly_forecast};
pub use recurrence::applies_to_month;
pub use salary::{SalaryImpact, compute_impact};
