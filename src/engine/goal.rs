// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::engine::aggregate::{checked_total, percent_of};
use crate::error::EngineError;
use crate::models::SavingsGoal;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    /// Unclamped; above 100 once the goal is overshot.
    pub percent_complete: Decimal,
    pub remaining: Decimal,
    pub completed: bool,
    /// Whole days until the target date, rounded up. Negative once it has passed.
    pub days_remaining: Option<i64>,
}

impl GoalProgress {
    /// Target date passed without reaching the target.
    pub fn is_overdue(&self) -> bool {
        !self.completed && self.days_remaining.is_some_and(|d| d < 0)
    }
}

pub fn evaluate_goal(goal: &SavingsGoal, now: NaiveDateTime) -> Result<GoalProgress, EngineError> {
    validate_goal(goal)?;

    let percent_complete = percent_of(goal.current_amount, goal.target_amount, "goal progress")?;
    let completed = goal.current_amount >= goal.target_amount;
    let remaining = goal
        .target_amount
        .checked_sub(goal.current_amount)
        .ok_or(EngineError::Overflow("goal remaining"))?
        .max(Decimal::ZERO);
    let days_remaining = goal.target_date.map(|t| ceil_days(t - now));

    Ok(GoalProgress {
        percent_complete,
        remaining,
        completed,
        days_remaining,
    })
}

/// When auto-contribution alone would finish the goal.
///
/// `None` if the goal is already complete, auto-contribution is off, its
/// amount or frequency is missing, or the date is out of range.
pub fn projected_completion(
    goal: &SavingsGoal,
    now: NaiveDateTime,
) -> Result<Option<NaiveDateTime>, EngineError> {
    validate_goal(goal)?;
    let Some(remaining) = goal.target_amount.checked_sub(goal.current_amount) else {
        return Ok(None);
    };
    if remaining <= Decimal::ZERO || !goal.auto_contribute {
        return Ok(None);
    }
    let (Some(amount), Some(freq)) = (goal.auto_contribute_amount, goal.auto_contribute_frequency)
    else {
        return Ok(None);
    };
    if amount <= Decimal::ZERO {
        return Ok(None);
    }
    let steps = remaining.checked_div(amount).and_then(|n| n.ceil().to_u32());
    Ok(steps.and_then(|n| freq.advance(now, n)))
}

pub fn validate_goal(goal: &SavingsGoal) -> Result<(), EngineError> {
    if goal.target_amount <= Decimal::ZERO {
        return Err(EngineError::InvalidGoal(format!(
            "target amount must be positive, got {}",
            goal.target_amount
        )));
    }
    if goal.current_amount < Decimal::ZERO {
        return Err(EngineError::InvalidGoal(format!(
            "current amount cannot be negative, got {}",
            goal.current_amount
        )));
    }
    Ok(())
}

fn ceil_days(delta: Duration) -> i64 {
    let whole = delta.num_days();
    if delta - Duration::days(whole) > Duration::zero() {
        whole + 1
    } else {
        whole
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GoalSummary {
    pub total_target: Decimal,
    pub total_saved: Decimal,
    pub percent_saved: Option<Decimal>,
    pub completed: usize,
    pub overdue: usize,
}

pub fn summarize_goals<'a, I>(items: I) -> Result<GoalSummary, EngineError>
where
    I: IntoIterator<Item = (&'a SavingsGoal, &'a GoalProgress)>,
{
    let mut s = GoalSummary::default();
    let mut targets = Vec::new();
    let mut saved = Vec::new();
    for (goal, progress) in items {
        targets.push(goal.target_amount);
        saved.push(goal.current_amount);
        if progress.completed {
            s.completed += 1;
        }
        if progress.is_overdue() {
            s.overdue += 1;
        }
    }
    s.total_target = checked_total(targets, "total goal target")?;
    s.total_saved = checked_total(saved, "total saved")?;
    if s.total_target > Decimal::ZERO {
        s.percent_saved = Some(percent_of(s.total_saved, s.total_target, "overall progress")?);
    }
    Ok(s)
}
