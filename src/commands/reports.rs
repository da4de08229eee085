// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::Ctx;
use crate::engine::{PeriodKind, resolve_period_from};
use crate::overview::{alerts, cashflow, spending_by_category, totals};
use crate::utils::{arg, fmt_money, fmt_pct, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("period", sub)) => period(conn, sub)?,
        Some(("totals", sub)) => period_totals(conn, sub)?,
        Some(("cashflow", sub)) => cashflow_report(conn, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        Some(("alerts", sub)) => alert_report(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn period_kind(sub: &clap::ArgMatches) -> Result<PeriodKind> {
    Ok(arg(sub, "period")?.parse::<PeriodKind>()?)
}

fn period(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = Ctx::resolve(conn, sub)?;
    let kind = period_kind(sub)?;
    let w = resolve_period_from(ctx.now, kind, ctx.config.week_start);
    let v = json!({ "period": kind, "label": w.label(kind), "start": w.start, "end": w.end });
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &v)? {
        println!("{} ({}): {}", w.label(kind), kind, w);
    }
    Ok(())
}

fn period_totals(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = Ctx::resolve(conn, sub)?;
    let kind = period_kind(sub)?;
    let w = resolve_period_from(ctx.now, kind, ctx.config.week_start);
    let t = totals(conn, ctx.workspace, &w)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        let rate = t.savings_rate.as_ref().map(fmt_pct).unwrap_or("-".into());
        println!(
            "{}",
            pretty_table(
                &["Period", "Income", "Expenses", "Net", "Savings rate"],
                vec![vec![
                    w.label(kind),
                    fmt_money(&t.income, &ctx.currency),
                    fmt_money(&t.expenses, &ctx.currency),
                    fmt_money(&t.net, &ctx.currency),
                    rate,
                ]],
            )
        );
    }
    Ok(())
}

fn cashflow_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = Ctx::resolve(conn, sub)?;
    let kind = period_kind(sub)?;
    let count = *sub.get_one::<usize>("count").context("count missing")?;
    let rows = cashflow(
        conn,
        ctx.workspace,
        kind,
        ctx.now,
        count,
        ctx.config.week_start,
    )?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        let data = rows
            .iter()
            .map(|r| {
                vec![
                    r.label.clone(),
                    format!("{:.2}", r.totals.income),
                    format!("{:.2}", r.totals.expenses),
                    format!("{:.2}", r.totals.net),
                    r.totals
                        .savings_rate
                        .as_ref()
                        .map(fmt_pct)
                        .unwrap_or("-".into()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Period", "Income", "Expense", "Net", "Savings rate"], data)
        );
    }
    Ok(())
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = Ctx::resolve(conn, sub)?;
    let kind = period_kind(sub)?;
    let w = resolve_period_from(ctx.now, kind, ctx.config.week_start);
    let items = spending_by_category(conn, ctx.workspace, &w)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        let data = items
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    format!("{:.2}", c.amount),
                    fmt_pct(&c.share),
                ]
            })
            .collect();
        let spent = format!("Spent ({})", w.label(kind));
        println!(
            "{}",
            pretty_table(&["Category", spent.as_str(), "Share"], data)
        );
    }
    Ok(())
}

fn alert_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = Ctx::resolve(conn, sub)?;
    let items = alerts(conn, ctx.workspace, ctx.now, ctx.config.week_start)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        return Ok(());
    }
    if items.is_empty() {
        println!("Nothing needs attention");
        return Ok(());
    }
    let data = items
        .into_iter()
        .map(|a| vec![a.kind.as_str().to_string(), a.subject, a.message])
        .collect();
    println!("{}", pretty_table(&["Alert", "Subject", "Detail"], data));
    Ok(())
}
