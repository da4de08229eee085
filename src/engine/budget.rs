// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::aggregate::{checked_total, percent_of};
use crate::error::EngineError;
use crate::models::Budget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    OnTrack,
    Warning,
    OverBudget,
}

impl BudgetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetStatus::OnTrack => "on track",
            BudgetStatus::Warning => "warning",
            BudgetStatus::OverBudget => "over budget",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetEvaluation {
    pub percent_used: Decimal,
    /// Signed: negative once spending exceeds the limit.
    pub remaining: Decimal,
    pub status: BudgetStatus,
}

/// Derives usage figures for `budget` given what has been spent in its window.
///
/// `OverBudget` needs spending strictly above the limit; `Warning` starts at
/// the alert threshold inclusive.
pub fn evaluate_budget(budget: &Budget, spent: Decimal) -> Result<BudgetEvaluation, EngineError> {
    validate_budget(budget)?;

    let percent_used = percent_of(spent, budget.limit, "budget usage")?;
    let remaining = budget
        .limit
        .checked_sub(spent)
        .ok_or(EngineError::Overflow("budget remaining"))?;
    let status = if spent > budget.limit {
        BudgetStatus::OverBudget
    } else if percent_used >= Decimal::from(budget.alert_threshold) {
        BudgetStatus::Warning
    } else {
        BudgetStatus::OnTrack
    };

    Ok(BudgetEvaluation {
        percent_used,
        remaining,
        status,
    })
}

/// Checks the limit is positive and the alert threshold is a percentage.
pub fn validate_budget(budget: &Budget) -> Result<(), EngineError> {
    if budget.limit <= Decimal::ZERO {
        return Err(EngineError::InvalidBudget(format!(
            "limit must be positive, got {}",
            budget.limit
        )));
    }
    if budget.alert_threshold > 100 {
        return Err(EngineError::InvalidBudget(format!(
            "alert threshold must be within 0..=100, got {}",
            budget.alert_threshold
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BudgetSummary {
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    pub percent_used: Option<Decimal>,
    pub on_track: usize,
    pub warning: usize,
    pub over_budget: usize,
}

/// Rolls `(limit, spent, evaluation)` triples up into workspace totals.
pub fn summarize_budgets<'a, I>(items: I) -> Result<BudgetSummary, EngineError>
where
    I: IntoIterator<Item = (Decimal, Decimal, &'a BudgetEvaluation)>,
{
    let mut s = BudgetSummary::default();
    let mut limits = Vec::new();
    let mut spent = Vec::new();
    for (limit, used, eval) in items {
        limits.push(limit);
        spent.push(used);
        match eval.status {
            BudgetStatus::OnTrack => s.on_track += 1,
            BudgetStatus::Warning => s.warning += 1,
            BudgetStatus::OverBudget => s.over_budget += 1,
        }
    }
    s.total_limit = checked_total(limits, "total budget")?;
    s.total_spent = checked_total(spent, "total spent")?;
    s.total_remaining = s
        .total_limit
        .checked_sub(s.total_spent)
        .ok_or(EngineError::Overflow("total remaining"))?;
    if s.total_limit > Decimal::ZERO {
        s.percent_used = Some(percent_of(s.total_spent, s.total_limit, "total usage")?);
    }
    Ok(s)
}
