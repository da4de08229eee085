// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure, side-effect-free derivations over already fetched records.

pub mod aggregate;
pub mod bills;
pub mod budget;
pub mod goal;
pub mod period;

pub use aggregate::{PeriodTotals, RecordFilter, period_totals, sum, sum_by_category};
pub use bills::{BillSummary, due_soon, overdue, summarize_bills};
pub use budget::{BudgetEvaluation, BudgetStatus, BudgetSummary, evaluate_budget, summarize_budgets};
pub use goal::{GoalProgress, GoalSummary, evaluate_goal, projected_completion, summarize_goals};
pub use period::{PeriodKind, Window, resolve_period, resolve_period_from, trailing_windows};
