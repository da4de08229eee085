// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::budget::validate_budget;
use crate::engine::goal::validate_goal;
use crate::models::{BillStatus, RecordKind};
use crate::store::{
    BILL_COLUMNS, BUDGET_COLUMNS, GOAL_COLUMNS, bill_from_row, budget_from_row, goal_from_row,
};
use crate::utils::{fmt_day, opt_arg, parse_instant, pretty_table};
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

/// Problems found in stored data, as (issue, detail) pairs.
pub fn diagnose(conn: &Connection, now: NaiveDateTime) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // Amounts are TEXT; anything that does not parse or is negative poisons every sum.
    for kind in [RecordKind::Expense, RecordKind::Income] {
        let sql = format!("SELECT id, amount FROM {} ORDER BY id", kind.table());
        let mut stmt = conn.prepare(&sql)?;
        let mut cur = stmt.query([])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            let raw: String = r.get(1)?;
            match raw.trim().parse::<Decimal>() {
                Ok(d) if d.is_sign_negative() => rows.push(vec![
                    "negative_amount".into(),
                    format!("{} #{}: {}", kind, id, raw),
                ]),
                Ok(_) => {}
                Err(_) => rows.push(vec![
                    "bad_amount".into(),
                    format!("{} #{}: '{}'", kind, id, raw),
                ]),
            }
        }
    }

    let mut ws_stmt = conn.prepare("SELECT id, name FROM workspaces ORDER BY id")?;
    let workspaces = ws_stmt
        .query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    for (ws, ws_name) in workspaces {
        // Rows are mapped one by one so a corrupt row is reported, not fatal.
        let sql = format!(
            "SELECT {} FROM budgets WHERE workspace_id=?1 ORDER BY id",
            BUDGET_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut cur = stmt.query(params![ws])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            match budget_from_row(r) {
                Err(e) => rows.push(vec![
                    "bad_budget_row".into(),
                    format!("{}: budget #{}: {}", ws_name, id, e),
                ]),
                Ok(b) => {
                    if let Err(e) = validate_budget(&b) {
                        rows.push(vec![
                            "invalid_budget".into(),
                            format!("{}: budget #{}: {}", ws_name, b.id, e),
                        ]);
                    }
                }
            }
        }

        let mut inc = conn.prepare(
            "SELECT b.id, c.name FROM budgets b JOIN categories c ON b.category_id=c.id
             WHERE b.workspace_id=?1 AND c.kind=?2",
        )?;
        let mut cur = inc.query(params![ws, RecordKind::Income])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            let cat: String = r.get(1)?;
            rows.push(vec![
                "budget_on_income".into(),
                format!("{}: budget #{} tracks income category '{}'", ws_name, id, cat),
            ]);
        }

        let sql = format!(
            "SELECT {} FROM savings_goals WHERE workspace_id=?1 ORDER BY id",
            GOAL_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut cur = stmt.query(params![ws])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            match goal_from_row(r) {
                Err(e) => rows.push(vec![
                    "bad_goal_row".into(),
                    format!("{}: goal #{}: {}", ws_name, id, e),
                ]),
                Ok(g) => {
                    if let Err(e) = validate_goal(&g) {
                        rows.push(vec![
                            "invalid_goal".into(),
                            format!("{}: '{}': {}", ws_name, g.name, e),
                        ]);
                    }
                }
            }
        }

        let sql = format!(
            "SELECT {} FROM bill_reminders WHERE workspace_id=?1 ORDER BY id",
            BILL_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut cur = stmt.query(params![ws])?;
        while let Some(r) = cur.next()? {
            let id: i64 = r.get(0)?;
            match bill_from_row(r) {
                Err(e) => rows.push(vec![
                    "bad_bill_row".into(),
                    format!("{}: bill #{}: {}", ws_name, id, e),
                ]),
                Ok(b) if b.status == BillStatus::Pending && b.due_date < now => {
                    rows.push(vec![
                        "stale_pending_bill".into(),
                        format!(
                            "{}: '{}' was due {}, run `bill sweep`",
                            ws_name,
                            b.name,
                            fmt_day(&b.due_date)
                        ),
                    ])
                }
                Ok(_) => {}
            }
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let now = match opt_arg(m, "as-of") {
        Some(s) => parse_instant(s)?,
        None => chrono::Local::now().naive_local(),
    };
    let rows = diagnose(conn, now)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
