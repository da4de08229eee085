// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::Ctx;
use crate::engine::PeriodKind;
use crate::models::{Priority, SavingsGoal};
use crate::overview::{goal_report, goal_summary};
use crate::store::{Store, contribute_to_goal, insert_goal};
use crate::utils::{
    arg, fmt_day, fmt_money, fmt_pct, maybe_print_json, opt_arg, parse_amount, parse_decimal,
    parse_instant, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("contribute", sub)) => contribute(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = Ctx::resolve(conn, sub)?;
    let name = arg(sub, "name")?;
    let auto_contribute_amount = opt_arg(sub, "auto-amount").map(parse_amount).transpose()?;
    let auto_contribute_frequency = opt_arg(sub, "auto-frequency")
        .map(|s| s.parse::<PeriodKind>())
        .transpose()?;
    let goal = SavingsGoal {
        id: 0,
        workspace_id: ctx.workspace,
        name: name.to_string(),
        target_amount: parse_decimal(arg(sub, "target")?)?,
        current_amount: parse_decimal(arg(sub, "current")?)?,
        target_date: opt_arg(sub, "target-date").map(parse_instant).transpose()?,
        priority: arg(sub, "priority")?.parse::<Priority>()?,
        auto_contribute: auto_contribute_amount.is_some(),
        auto_contribute_amount,
        auto_contribute_frequency,
    };
    insert_goal(conn, &goal)?;
    println!(
        "Added savings goal '{}' targeting {}",
        name,
        fmt_money(&goal.target_amount, &ctx.currency)
    );
    Ok(())
}

fn contribute(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = Ctx::resolve(conn, sub)?;
    let name = arg(sub, "name")?;
    let amount = parse_decimal(arg(sub, "amount")?)?;
    let balance = contribute_to_goal(conn, ctx.workspace, name, amount)?;
    println!(
        "'{}' now holds {}",
        name,
        fmt_money(&balance, &ctx.currency)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let ctx = Ctx::resolve(conn, sub)?;
    let goals = conn.list_goals(ctx.workspace)?;
    if maybe_print_json(json_flag, jsonl_flag, &goals)? {
        return Ok(());
    }
    let data = goals
        .iter()
        .map(|g| {
            vec![
                g.name.clone(),
                format!("{:.2}", g.target_amount),
                format!("{:.2}", g.current_amount),
                g.target_date.as_ref().map(fmt_day).unwrap_or_default(),
                g.priority.to_string(),
                match (g.auto_contribute_amount, g.auto_contribute_frequency) {
                    (Some(a), Some(f)) if g.auto_contribute => format!("{:.2} {}", a, f),
                    _ => String::new(),
                },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Goal", "Target", "Saved", "Target date", "Priority", "Auto"],
            data
        )
    );
    Ok(())
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let ctx = Ctx::resolve(conn, sub)?;
    let lines = goal_report(conn, ctx.workspace, ctx.now)?;
    let summary = goal_summary(&lines)?;
    if jsonl_flag {
        maybe_print_json(false, true, &lines)?;
        return Ok(());
    }
    if json_flag {
        maybe_print_json(true, false, &json!({ "lines": lines, "summary": summary }))?;
        return Ok(());
    }
    let data = lines
        .iter()
        .map(|l| {
            let p = &l.progress;
            let state = if p.completed {
                "completed".to_string()
            } else if p.is_overdue() {
                "overdue".to_string()
            } else {
                match p.days_remaining {
                    Some(d) => format!("{} day(s) left", d),
                    None => "open".to_string(),
                }
            };
            vec![
                l.goal.name.clone(),
                format!("{:.2}", l.goal.current_amount),
                format!("{:.2}", l.goal.target_amount),
                fmt_pct(&p.percent_complete),
                format!("{:.2}", p.remaining),
                state,
                l.projected_completion
                    .as_ref()
                    .map(fmt_day)
                    .unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Goal", "Saved", "Target", "Progress", "Remaining", "State", "Projected"],
            data
        )
    );
    println!(
        "Saved {:.2} of {:.2}{} | completed {} of {}",
        summary.total_saved,
        summary.total_target,
        summary
            .percent_saved
            .map(|p| format!(" ({})", fmt_pct(&p)))
            .unwrap_or_default(),
        summary.completed,
        lines.len()
    );
    Ok(())
}
