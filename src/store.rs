// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Record store feeding the engine, backed by SQLite.

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::engine::budget::validate_budget;
use crate::engine::goal::validate_goal;
use crate::engine::period::{PeriodKind, Window};
use crate::error::EngineError;
use crate::models::{
    BillFrequency, BillReminder, BillStatus, Budget, Category, CategoryId, MonetaryRecord,
    Priority, RecordKind, SavingsGoal, Workspace, WorkspaceId,
};

/// Read side the aggregation engine's callers depend on.
pub trait Store {
    fn list_records(
        &self,
        kind: RecordKind,
        workspace: WorkspaceId,
        category: Option<CategoryId>,
        range: Option<&Window>,
    ) -> Result<Vec<MonetaryRecord>>;

    fn list_budgets(&self, workspace: WorkspaceId) -> Result<Vec<Budget>>;

    fn list_goals(&self, workspace: WorkspaceId) -> Result<Vec<SavingsGoal>>;

    fn list_bill_reminders(&self, workspace: WorkspaceId) -> Result<Vec<BillReminder>>;

    fn list_categories(&self, workspace: WorkspaceId) -> Result<Vec<Category>>;
}

macro_rules! text_enum_sql {
    ($($t:ty),* $(,)?) => {
        $(
            impl ToSql for $t {
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.as_str()))
                }
            }

            impl FromSql for $t {
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    value
                        .as_str()?
                        .parse()
                        .map_err(|e: EngineError| FromSqlError::Other(Box::new(e)))
                }
            }
        )*
    };
}

text_enum_sql!(PeriodKind, RecordKind, Priority, BillFrequency, BillStatus);

fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.trim()
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn opt_decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(_) => decimal_at(row, idx).map(Some),
        None => Ok(None),
    }
}

fn record_from_row(r: &Row<'_>) -> rusqlite::Result<MonetaryRecord> {
    Ok(MonetaryRecord {
        id: r.get(0)?,
        workspace_id: r.get(1)?,
        category_id: r.get(2)?,
        amount: decimal_at(r, 3)?,
        occurred_at: r.get(4)?,
        description: r.get(5)?,
    })
}

pub(crate) fn budget_from_row(r: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: r.get(0)?,
        workspace_id: r.get(1)?,
        category_id: r.get(2)?,
        limit: decimal_at(r, 3)?,
        period: r.get(4)?,
        alert_threshold: r.get(5)?,
        start_date: r.get(6)?,
        active: r.get(7)?,
    })
}

pub(crate) fn goal_from_row(r: &Row<'_>) -> rusqlite::Result<SavingsGoal> {
    Ok(SavingsGoal {
        id: r.get(0)?,
        workspace_id: r.get(1)?,
        name: r.get(2)?,
        target_amount: decimal_at(r, 3)?,
        current_amount: decimal_at(r, 4)?,
        target_date: r.get(5)?,
        priority: r.get(6)?,
        auto_contribute: r.get(7)?,
        auto_contribute_amount: opt_decimal_at(r, 8)?,
        auto_contribute_frequency: r.get(9)?,
    })
}

pub(crate) fn bill_from_row(r: &Row<'_>) -> rusqlite::Result<BillReminder> {
    Ok(BillReminder {
        id: r.get(0)?,
        workspace_id: r.get(1)?,
        category_id: r.get(2)?,
        name: r.get(3)?,
        amount: decimal_at(r, 4)?,
        due_date: r.get(5)?,
        frequency: r.get(6)?,
        reminder_days_before: r.get(7)?,
        status: r.get(8)?,
    })
}

pub(crate) const BUDGET_COLUMNS: &str =
    "id, workspace_id, category_id, amount_limit, period, alert_threshold, start_date, is_active";
pub(crate) const GOAL_COLUMNS: &str = "id, workspace_id, name, target_amount, current_amount, target_date, priority, auto_contribute, auto_contribute_amount, auto_contribute_frequency";
pub(crate) const BILL_COLUMNS: &str =
    "id, workspace_id, category_id, name, amount, due_date, frequency, reminder_days_before, status";

impl Store for Connection {
    fn list_records(
        &self,
        kind: RecordKind,
        workspace: WorkspaceId,
        category: Option<CategoryId>,
        range: Option<&Window>,
    ) -> Result<Vec<MonetaryRecord>> {
        let sql = format!(
            "SELECT id, workspace_id, category_id, amount, occurred_at, description FROM {}
             WHERE workspace_id=?1
               AND (?2 IS NULL OR category_id=?2)
               AND (?3 IS NULL OR occurred_at>=?3)
               AND (?4 IS NULL OR occurred_at<=?4)
             ORDER BY occurred_at, id",
            kind.table()
        );
        let mut stmt = self.prepare_cached(&sql)?;
        let rows = stmt.query_map(
            params![
                workspace,
                category,
                range.map(|w| w.start),
                range.map(|w| w.end)
            ],
            record_from_row,
        )?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.with_context(|| format!("Invalid {} row", kind))?);
        }
        tracing::debug!(%kind, workspace, count = out.len(), "listed records");
        Ok(out)
    }

    fn list_budgets(&self, workspace: WorkspaceId) -> Result<Vec<Budget>> {
        let sql = format!(
            "SELECT {} FROM budgets WHERE workspace_id=?1 ORDER BY id",
            BUDGET_COLUMNS
        );
        let mut stmt = self.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![workspace], budget_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("Invalid budget row")?);
        }
        tracing::debug!(workspace, count = out.len(), "listed budgets");
        Ok(out)
    }

    fn list_goals(&self, workspace: WorkspaceId) -> Result<Vec<SavingsGoal>> {
        let sql = format!(
            "SELECT {} FROM savings_goals WHERE workspace_id=?1 ORDER BY id",
            GOAL_COLUMNS
        );
        let mut stmt = self.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![workspace], goal_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("Invalid savings goal row")?);
        }
        tracing::debug!(workspace, count = out.len(), "listed goals");
        Ok(out)
    }

    fn list_bill_reminders(&self, workspace: WorkspaceId) -> Result<Vec<BillReminder>> {
        let sql = format!(
            "SELECT {} FROM bill_reminders WHERE workspace_id=?1 ORDER BY due_date, id",
            BILL_COLUMNS
        );
        let mut stmt = self.prepare_cached(&sql)?;
        let rows = stmt.query_map(params![workspace], bill_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("Invalid bill reminder row")?);
        }
        tracing::debug!(workspace, count = out.len(), "listed bill reminders");
        Ok(out)
    }

    fn list_categories(&self, workspace: WorkspaceId) -> Result<Vec<Category>> {
        let mut stmt = self.prepare_cached(
            "SELECT id, workspace_id, name, kind FROM categories WHERE workspace_id=?1 ORDER BY kind, name",
        )?;
        let rows = stmt.query_map(params![workspace], |r| {
            Ok(Category {
                id: r.get(0)?,
                workspace_id: r.get(1)?,
                name: r.get(2)?,
                kind: r.get(3)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.context("Invalid category row")?);
        }
        Ok(out)
    }
}

pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 8] = [
    "Food & Groceries",
    "Transportation",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Shopping",
    "Dining",
    "Other",
];

pub const DEFAULT_INCOME_CATEGORIES: [&str; 5] =
    ["Salary", "Freelance", "Investment", "Bonus", "Other"];

/// Creates a workspace along with its default categories.
pub fn create_workspace(conn: &mut Connection, name: &str, currency: &str) -> Result<WorkspaceId> {
    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO workspaces(name, currency) VALUES (?1, ?2)",
        params![name, currency.to_uppercase()],
    )
    .with_context(|| format!("Create workspace '{}'", name))?;
    let id = tx.last_insert_rowid();
    {
        let mut stmt =
            tx.prepare("INSERT INTO categories(workspace_id, name, kind) VALUES (?1, ?2, ?3)")?;
        for name in DEFAULT_EXPENSE_CATEGORIES {
            stmt.execute(params![id, name, RecordKind::Expense])?;
        }
        for name in DEFAULT_INCOME_CATEGORIES {
            stmt.execute(params![id, name, RecordKind::Income])?;
        }
    }
    tx.commit()?;
    tracing::info!(workspace = id, name, "created workspace");
    Ok(id)
}

pub fn list_workspaces(conn: &Connection) -> Result<Vec<Workspace>> {
    let mut stmt = conn.prepare("SELECT id, name, currency FROM workspaces ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok(Workspace {
            id: r.get(0)?,
            name: r.get(1)?,
            currency: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn add_category(
    conn: &Connection,
    workspace: WorkspaceId,
    name: &str,
    kind: RecordKind,
) -> Result<CategoryId> {
    conn.execute(
        "INSERT INTO categories(workspace_id, name, kind) VALUES (?1, ?2, ?3)",
        params![workspace, name, kind],
    )
    .with_context(|| format!("Add {} category '{}'", kind, name))?;
    Ok(conn.last_insert_rowid())
}

/// Inserts an expense or income; `rec.id` is ignored.
pub fn insert_record(conn: &Connection, kind: RecordKind, rec: &MonetaryRecord) -> Result<i64> {
    if rec.amount < Decimal::ZERO {
        bail!("Amount cannot be negative: {}", rec.amount);
    }
    let sql = format!(
        "INSERT INTO {}(workspace_id, category_id, amount, occurred_at, description)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        kind.table()
    );
    conn.execute(
        &sql,
        params![
            rec.workspace_id,
            rec.category_id,
            rec.amount.to_string(),
            rec.occurred_at,
            rec.description
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(%kind, id, amount = %rec.amount, "recorded entry");
    Ok(id)
}

/// Creates or replaces the budget for a category and period; `budget.id` is ignored.
///
/// Rejects limits and thresholds the evaluator would refuse later.
pub fn upsert_budget(conn: &Connection, budget: &Budget) -> Result<i64> {
    validate_budget(budget)?;
    conn.execute(
        "INSERT INTO budgets(workspace_id, category_id, amount_limit, period, alert_threshold, start_date, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(workspace_id, category_id, period) DO UPDATE SET
            amount_limit=excluded.amount_limit,
            alert_threshold=excluded.alert_threshold,
            start_date=excluded.start_date,
            is_active=excluded.is_active",
        params![
            budget.workspace_id,
            budget.category_id,
            budget.limit.to_string(),
            budget.period,
            budget.alert_threshold,
            budget.start_date,
            budget.active
        ],
    )?;
    let id: i64 = conn.query_row(
        "SELECT id FROM budgets WHERE workspace_id=?1 AND category_id=?2 AND period=?3",
        params![budget.workspace_id, budget.category_id, budget.period],
        |r| r.get(0),
    )?;
    tracing::info!(id, limit = %budget.limit, period = %budget.period, "saved budget");
    Ok(id)
}

/// Inserts a savings goal; `goal.id` is ignored.
pub fn insert_goal(conn: &Connection, goal: &SavingsGoal) -> Result<i64> {
    validate_goal(goal)?;
    conn.execute(
        "INSERT INTO savings_goals(workspace_id, name, target_amount, current_amount, target_date, priority, auto_contribute, auto_contribute_amount, auto_contribute_frequency)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            goal.workspace_id,
            goal.name,
            goal.target_amount.to_string(),
            goal.current_amount.to_string(),
            goal.target_date,
            goal.priority,
            goal.auto_contribute,
            goal.auto_contribute_amount.map(|d| d.to_string()),
            goal.auto_contribute_frequency
        ],
    )
    .with_context(|| format!("Add savings goal '{}'", goal.name))?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, name = %goal.name, target = %goal.target_amount, "created savings goal");
    Ok(id)
}

/// Adds `amount` to a goal's current amount and returns the new balance.
/// Withdrawals (negative amounts) may not take the balance below zero.
pub fn contribute_to_goal(
    conn: &Connection,
    workspace: WorkspaceId,
    name: &str,
    amount: Decimal,
) -> Result<Decimal> {
    let current: Option<String> = conn
        .query_row(
            "SELECT current_amount FROM savings_goals WHERE workspace_id=?1 AND name=?2",
            params![workspace, name],
            |r| r.get(0),
        )
        .optional()?;
    let Some(current) = current else {
        bail!("Savings goal '{}' not found", name);
    };
    let current = current
        .parse::<Decimal>()
        .with_context(|| format!("Invalid current amount '{}' for goal {}", current, name))?;
    let updated = current + amount;
    if updated < Decimal::ZERO {
        bail!(
            "Withdrawal of {} exceeds the {} saved for '{}'",
            -amount,
            current,
            name
        );
    }
    conn.execute(
        "UPDATE savings_goals SET current_amount=?1 WHERE workspace_id=?2 AND name=?3",
        params![updated.to_string(), workspace, name],
    )?;
    tracing::info!(goal = name, %amount, balance = %updated, "goal contribution");
    Ok(updated)
}

/// Inserts a bill reminder; `bill.id` is ignored.
pub fn insert_bill(conn: &Connection, bill: &BillReminder) -> Result<i64> {
    if bill.amount < Decimal::ZERO {
        bail!("Bill amount cannot be negative: {}", bill.amount);
    }
    conn.execute(
        "INSERT INTO bill_reminders(workspace_id, category_id, name, amount, due_date, frequency, reminder_days_before, status)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            bill.workspace_id,
            bill.category_id,
            bill.name,
            bill.amount.to_string(),
            bill.due_date,
            bill.frequency,
            bill.reminder_days_before,
            bill.status
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, name = %bill.name, due = %bill.due_date, "created bill reminder");
    Ok(id)
}

pub fn bill_by_id(conn: &Connection, workspace: WorkspaceId, id: i64) -> Result<BillReminder> {
    let sql = format!(
        "SELECT {} FROM bill_reminders WHERE workspace_id=?1 AND id=?2",
        BILL_COLUMNS
    );
    conn.query_row(&sql, params![workspace, id], bill_from_row)
        .optional()?
        .with_context(|| format!("Bill reminder #{} not found", id))
}

/// Marks a bill paid. A recurring bill gets its next occurrence scheduled as
/// a new pending reminder, whose id is returned.
pub fn mark_bill_paid(conn: &mut Connection, workspace: WorkspaceId, id: i64) -> Result<Option<i64>> {
    let bill = bill_by_id(conn, workspace, id)?;
    match bill.status {
        BillStatus::Paid => bail!("Bill reminder #{} is already paid", id),
        BillStatus::Cancelled => bail!("Bill reminder #{} was cancelled", id),
        BillStatus::Pending | BillStatus::Overdue => {}
    }
    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE bill_reminders SET status=?1 WHERE id=?2",
        params![BillStatus::Paid, id],
    )?;
    let next_id = match bill.frequency.next_due(bill.due_date) {
        Some(due_date) => {
            let next = BillReminder {
                due_date,
                status: BillStatus::Pending,
                ..bill.clone()
            };
            Some(insert_bill(&tx, &next)?)
        }
        None => None,
    };
    tx.commit()?;
    tracing::info!(id, next = ?next_id, "bill paid");
    Ok(next_id)
}

/// Persists the pending -> overdue transition for bills due before `now`.
pub fn mark_overdue(conn: &Connection, workspace: WorkspaceId, now: NaiveDateTime) -> Result<usize> {
    let n = conn.execute(
        "UPDATE bill_reminders SET status=?1 WHERE workspace_id=?2 AND status=?3 AND due_date<?4",
        params![BillStatus::Overdue, workspace, BillStatus::Pending, now],
    )?;
    tracing::info!(workspace, updated = n, "overdue sweep");
    Ok(n)
}
