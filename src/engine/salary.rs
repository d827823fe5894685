// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AbsenceRecord, User};
use crate::period::YearMonth;

/// Share of lost wages paid back during sick or parental-care leave.
pub const COMPENSATION_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryImpact {
    pub deduction: Decimal,
    pub compensation: Decimal,
    /// `compensation - deduction`; usually negative.
    pub net_impact: Decimal,
}

/// Payroll effect of the absences that overlap `(year, month)`.
///
/// A user without work hours has no hourly rate, which is a defined
/// zero-impact case rather than an error.
pub fn compute_impact(
    user: &User,
    absences: &[AbsenceRecord],
    year: i32,
    month: u32,
) -> SalaryImpact {
    if user.work_hours_monthly <= 0 {
        return SalaryImpact::default();
    }
    let target = YearMonth { year, month };
    let hourly = user.income_monthly / Decimal::from(user.work_hours_monthly);

    let mut deduction = Decimal::ZERO;
    let mut compensation = Decimal::ZERO;
    for a in absences
        .iter()
        .filter(|a| a.hours > 0 && a.overlaps(target))
    {
        let lost = hourly * Decimal::from(a.hours);
        deduction += lost;
        compensation += lost * COMPENSATION_RATE;
    }
    SalaryImpact {
        deduction,
        compensation,
        net_impact: compensation - deduction,
    }
}
