// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fetches inputs through a [`Store`] and runs them through the engine.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{NaiveDateTime, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::{
    self, BillSummary, BudgetEvaluation, BudgetStatus, BudgetSummary, GoalProgress, GoalSummary,
    PeriodKind, PeriodTotals, RecordFilter, Window,
};
use crate::engine::aggregate::{checked_total, percent_of};
use crate::models::{BillReminder, Budget, CategoryId, RecordKind, SavingsGoal, WorkspaceId};
use crate::store::Store;

pub fn category_names<S: Store + ?Sized>(
    store: &S,
    workspace: WorkspaceId,
) -> Result<HashMap<CategoryId, String>> {
    Ok(store
        .list_categories(workspace)?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect())
}

fn name_of(names: &HashMap<CategoryId, String>, id: CategoryId) -> String {
    names
        .get(&id)
        .cloned()
        .unwrap_or_else(|| format!("#{}", id))
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetLine {
    pub budget: Budget,
    pub category: String,
    pub window: Window,
    pub spent: Decimal,
    pub evaluation: BudgetEvaluation,
}

/// Evaluates every active budget against spending in its current period.
///
/// Budgets that start after `now` are left out. Stored budgets the evaluator
/// rejects are skipped with a warning; `doctor` reports them.
pub fn budget_report<S: Store + ?Sized>(
    store: &S,
    workspace: WorkspaceId,
    now: NaiveDateTime,
    week_start: Weekday,
) -> Result<Vec<BudgetLine>> {
    let names = category_names(store, workspace)?;
    let mut lines = Vec::new();
    for budget in store.list_budgets(workspace)? {
        if !budget.active || budget.start_date > now {
            continue;
        }
        let window = engine::resolve_period_from(now, budget.period, week_start);
        let records =
            store.list_records(RecordKind::Expense, workspace, Some(budget.category_id), Some(&window))?;
        let evaluated = engine::sum(&records, &window, &RecordFilter::category(budget.category_id))
            .and_then(|spent| Ok((spent, engine::evaluate_budget(&budget, spent)?)));
        match evaluated {
            Ok((spent, evaluation)) => lines.push(BudgetLine {
                category: name_of(&names, budget.category_id),
                budget,
                window,
                spent,
                evaluation,
            }),
            Err(e) => tracing::warn!(budget = budget.id, error = %e, "skipping budget"),
        }
    }
    Ok(lines)
}

pub fn budget_summary(lines: &[BudgetLine]) -> Result<BudgetSummary> {
    Ok(engine::summarize_budgets(
        lines
            .iter()
            .map(|l| (l.budget.limit, l.spent, &l.evaluation)),
    )?)
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalLine {
    pub goal: SavingsGoal,
    pub progress: GoalProgress,
    pub projected_completion: Option<NaiveDateTime>,
}

pub fn goal_report<S: Store + ?Sized>(
    store: &S,
    workspace: WorkspaceId,
    now: NaiveDateTime,
) -> Result<Vec<GoalLine>> {
    let mut lines = Vec::new();
    for goal in store.list_goals(workspace)? {
        let evaluated = engine::evaluate_goal(&goal, now)
            .and_then(|p| Ok((p, engine::projected_completion(&goal, now)?)));
        match evaluated {
            Ok((progress, projected_completion)) => lines.push(GoalLine {
                goal,
                progress,
                projected_completion,
            }),
            Err(e) => tracing::warn!(goal = goal.id, error = %e, "skipping savings goal"),
        }
    }
    Ok(lines)
}

pub fn goal_summary(lines: &[GoalLine]) -> Result<GoalSummary> {
    Ok(engine::summarize_goals(
        lines.iter().map(|l| (&l.goal, &l.progress)),
    )?)
}

#[derive(Debug, Clone, Serialize)]
pub struct BillReport {
    pub summary: BillSummary,
    pub due_soon: Vec<BillReminder>,
    pub overdue: Vec<BillReminder>,
}

pub fn bill_report<S: Store + ?Sized>(
    store: &S,
    workspace: WorkspaceId,
    now: NaiveDateTime,
    window_days: i64,
) -> Result<BillReport> {
    let bills = store.list_bill_reminders(workspace)?;
    Ok(BillReport {
        summary: engine::summarize_bills(&bills, now, window_days)?,
        due_soon: engine::due_soon(&bills, now, window_days)
            .into_iter()
            .cloned()
            .collect(),
        overdue: engine::overdue(&bills, now).into_iter().cloned().collect(),
    })
}

/// Income and expense totals for one window.
pub fn totals<S: Store + ?Sized>(
    store: &S,
    workspace: WorkspaceId,
    window: &Window,
) -> Result<PeriodTotals> {
    let incomes = store.list_records(RecordKind::Income, workspace, None, Some(window))?;
    let expenses = store.list_records(RecordKind::Expense, workspace, None, Some(window))?;
    Ok(engine::period_totals(&incomes, &expenses, window)?)
}

#[derive(Debug, Clone, Serialize)]
pub struct CashflowRow {
    pub label: String,
    pub window: Window,
    #[serde(flatten)]
    pub totals: PeriodTotals,
}

/// Totals for the last `count` periods of `kind`, most recent first.
pub fn cashflow<S: Store + ?Sized>(
    store: &S,
    workspace: WorkspaceId,
    kind: PeriodKind,
    now: NaiveDateTime,
    count: usize,
    week_start: Weekday,
) -> Result<Vec<CashflowRow>> {
    let windows = engine::trailing_windows(now, kind, count, week_start);
    let (Some(newest), Some(oldest)) = (windows.first(), windows.last()) else {
        return Ok(Vec::new());
    };
    let span = Window::new(oldest.start, newest.end);
    let incomes = store.list_records(RecordKind::Income, workspace, None, Some(&span))?;
    let expenses = store.list_records(RecordKind::Expense, workspace, None, Some(&span))?;
    let mut rows = Vec::new();
    for w in &windows {
        rows.push(CashflowRow {
            label: w.label(kind),
            window: *w,
            totals: engine::period_totals(&incomes, &expenses, w)?,
        });
    }
    Ok(rows)
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySpend {
    pub category_id: CategoryId,
    pub category: String,
    pub amount: Decimal,
    /// Share of all spending in the window, in percent.
    pub share: Decimal,
}

/// Spending per category inside `window`, largest first.
pub fn spending_by_category<S: Store + ?Sized>(
    store: &S,
    workspace: WorkspaceId,
    window: &Window,
) -> Result<Vec<CategorySpend>> {
    let names = category_names(store, workspace)?;
    let expenses = store.list_records(RecordKind::Expense, workspace, None, Some(window))?;
    let by_cat = engine::sum_by_category(&expenses, window)?;
    let total = checked_total(by_cat.values().copied(), "total spending")?;
    let mut out = Vec::with_capacity(by_cat.len());
    for (id, amount) in by_cat {
        out.push(CategorySpend {
            category_id: id,
            category: name_of(&names, id),
            amount,
            share: if total.is_zero() {
                Decimal::ZERO
            } else {
                percent_of(amount, total, "category share")?
            },
        });
    }
    out.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    BudgetWarning,
    BudgetExceeded,
    BillReminder,
    BillOverdue,
    GoalOverdue,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::BudgetWarning => "budget_warning",
            AlertKind::BudgetExceeded => "budget_exceeded",
            AlertKind::BillReminder => "bill_reminder",
            AlertKind::BillOverdue => "bill_overdue",
            AlertKind::GoalOverdue => "goal_overdue",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub subject: String,
    pub message: String,
}

/// Everything that currently deserves the user's attention.
pub fn alerts<S: Store + ?Sized>(
    store: &S,
    workspace: WorkspaceId,
    now: NaiveDateTime,
    week_start: Weekday,
) -> Result<Vec<Alert>> {
    let mut out = Vec::new();

    for line in budget_report(store, workspace, now, week_start)? {
        let kind = match line.evaluation.status {
            BudgetStatus::OnTrack => continue,
            BudgetStatus::Warning => AlertKind::BudgetWarning,
            BudgetStatus::OverBudget => AlertKind::BudgetExceeded,
        };
        out.push(Alert {
            kind,
            message: format!(
                "{:.1}% of {} {} budget used ({:.2} of {:.2})",
                line.evaluation.percent_used,
                line.budget.period,
                line.category,
                line.spent,
                line.budget.limit
            ),
            subject: line.category,
        });
    }

    let bills = store.list_bill_reminders(workspace)?;
    for bill in engine::overdue(&bills, now) {
        out.push(Alert {
            kind: AlertKind::BillOverdue,
            subject: bill.name.clone(),
            message: format!(
                "{:.2} was due {}",
                bill.amount,
                bill.due_date.format("%Y-%m-%d")
            ),
        });
    }
    let mut reminders: Vec<&BillReminder> =
        bills.iter().filter(|b| b.needs_reminder(now)).collect();
    reminders.sort_by_key(|b| b.due_date);
    for bill in reminders {
        out.push(Alert {
            kind: AlertKind::BillReminder,
            subject: bill.name.clone(),
            message: format!(
                "{:.2} due {}",
                bill.amount,
                bill.due_date.format("%Y-%m-%d")
            ),
        });
    }

    for line in goal_report(store, workspace, now)? {
        if line.progress.is_overdue() {
            out.push(Alert {
                kind: AlertKind::GoalOverdue,
                message: format!(
                    "{:.2} still to save, target date passed {} day(s) ago",
                    line.progress.remaining,
                    -line.progress.days_remaining.unwrap_or_default()
                ),
                subject: line.goal.name,
            });
        }
    }

    tracing::debug!(workspace, count = out.len(), "computed alerts");
    Ok(out)
}
