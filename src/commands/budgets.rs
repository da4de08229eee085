// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::Ctx;
use crate::engine::{BudgetSummary, PeriodKind, resolve_period_from};
use crate::models::{Budget, RecordKind};
use crate::overview::{BudgetLine, budget_report, budget_summary, category_names};
use crate::store::{Store, upsert_budget};
use crate::utils::{
    arg, fmt_day, fmt_money, fmt_pct, id_for_category, maybe_print_json, opt_arg, parse_decimal,
    parse_instant, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = Ctx::resolve(conn, sub)?;
    let cat = arg(sub, "category")?;
    let limit = parse_decimal(arg(sub, "limit")?)?;
    let period: PeriodKind = arg(sub, "period")?.parse()?;
    let alert_threshold = sub
        .get_one::<u8>("threshold")
        .copied()
        .unwrap_or(ctx.config.alert_threshold);
    let start_date = match opt_arg(sub, "start") {
        Some(s) => parse_instant(s)?,
        None => resolve_period_from(ctx.now, period, ctx.config.week_start).start,
    };
    let category_id = id_for_category(conn, ctx.workspace, RecordKind::Expense, cat)?;
    let budget = Budget {
        id: 0,
        workspace_id: ctx.workspace,
        category_id,
        limit,
        period,
        alert_threshold,
        start_date,
        active: true,
    };
    upsert_budget(conn, &budget)?;
    println!(
        "Budget set for {} ({}) = {}, alert at {}%",
        cat,
        period,
        fmt_money(&limit, &ctx.currency),
        alert_threshold
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let ctx = Ctx::resolve(conn, sub)?;
    let budgets = conn.list_budgets(ctx.workspace)?;
    if maybe_print_json(json_flag, jsonl_flag, &budgets)? {
        return Ok(());
    }
    let names = category_names(conn, ctx.workspace)?;
    let data = budgets
        .iter()
        .map(|b| {
            vec![
                names.get(&b.category_id).cloned().unwrap_or_default(),
                b.period.to_string(),
                format!("{:.2}", b.limit),
                format!("{}%", b.alert_threshold),
                fmt_day(&b.start_date),
                if b.active { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Category", "Period", "Limit", "Alert", "Start", "Active"],
            data
        )
    );
    Ok(())
}

#[derive(Serialize)]
pub struct BudgetStatusReport {
    pub lines: Vec<BudgetLine>,
    pub summary: BudgetSummary,
}

pub fn status_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<BudgetStatusReport> {
    let ctx = Ctx::resolve(conn, sub)?;
    let lines = budget_report(conn, ctx.workspace, ctx.now, ctx.config.week_start)?;
    let summary = budget_summary(&lines)?;
    Ok(BudgetStatusReport { lines, summary })
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let report = status_report(conn, sub)?;
    if jsonl_flag {
        maybe_print_json(false, true, &report.lines)?;
        return Ok(());
    }
    if maybe_print_json(json_flag, false, &report)? {
        return Ok(());
    }
    let data = report
        .lines
        .iter()
        .map(|l| {
            vec![
                l.category.clone(),
                l.window.label(l.budget.period),
                format!("{:.2}", l.budget.limit),
                format!("{:.2}", l.spent),
                fmt_pct(&l.evaluation.percent_used),
                format!("{:.2}", l.evaluation.remaining),
                l.evaluation.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Category", "Period", "Limit", "Spent", "Used", "Remaining", "Status"],
            data
        )
    );
    let s = &report.summary;
    println!(
        "Total {:.2} budgeted, {:.2} spent, {:.2} remaining{} | on track {}, warning {}, over {}",
        s.total_limit,
        s.total_spent,
        s.total_remaining,
        s.percent_used
            .map(|p| format!(" ({} used)", fmt_pct(&p)))
            .unwrap_or_default(),
        s.on_track,
        s.warning,
        s.over_budget
    );
    Ok(())
}
