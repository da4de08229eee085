// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::Ctx;
use crate::engine::{PeriodKind, resolve_period_from};
use crate::models::{MonetaryRecord, RecordKind};
use crate::overview::category_names;
use crate::store::{Store, insert_record};
use crate::utils::{
    arg, fmt_money, id_for_category, maybe_print_json, opt_arg, parse_amount, parse_instant,
    pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, kind: RecordKind, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, kind, sub)?,
        Some(("list", sub)) => list(conn, kind, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, kind: RecordKind, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = Ctx::resolve(conn, sub)?;
    let amount = parse_amount(arg(sub, "amount")?)?;
    let category = arg(sub, "category")?;
    let category_id = id_for_category(conn, ctx.workspace, kind, category)?;
    let occurred_at = match opt_arg(sub, "date") {
        Some(s) => parse_instant(s)?,
        None => ctx.now,
    };
    let rec = MonetaryRecord {
        id: 0,
        workspace_id: ctx.workspace,
        category_id,
        amount,
        occurred_at,
        description: opt_arg(sub, "note").map(str::to_string),
    };
    insert_record(conn, kind, &rec)?;
    println!(
        "Recorded {} {} in '{}' on {}",
        kind,
        fmt_money(&amount, &ctx.currency),
        category,
        occurred_at.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn list(conn: &Connection, kind: RecordKind, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, kind, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Category", "Amount", "Note"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct RecordRow {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub amount: String,
    pub note: String,
}

/// Newest first, optionally restricted to the current period and a category.
pub fn query_rows(
    conn: &Connection,
    kind: RecordKind,
    sub: &clap::ArgMatches,
) -> Result<Vec<RecordRow>> {
    let ctx = Ctx::resolve(conn, sub)?;
    let window = match opt_arg(sub, "period") {
        Some(p) => Some(resolve_period_from(
            ctx.now,
            p.parse::<PeriodKind>()?,
            ctx.config.week_start,
        )),
        None => None,
    };
    let category = match opt_arg(sub, "category") {
        Some(name) => Some(id_for_category(conn, ctx.workspace, kind, name)?),
        None => None,
    };
    let names = category_names(conn, ctx.workspace)?;
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    let data = conn
        .list_records(kind, ctx.workspace, category, window.as_ref())?
        .into_iter()
        .rev()
        .take(limit)
        .map(|r| RecordRow {
            id: r.id,
            date: r.occurred_at.format("%Y-%m-%d %H:%M").to_string(),
            category: names.get(&r.category_id).cloned().unwrap_or_default(),
            amount: format!("{:.2}", r.amount),
            note: r.description.unwrap_or_default(),
        })
        .collect();
    Ok(data)
}
