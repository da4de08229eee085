// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::Ctx;
use crate::engine::{due_soon, summarize_bills};
use crate::models::{BillFrequency, BillReminder, BillStatus, RecordKind};
use crate::store::{Store, insert_bill, mark_bill_paid, mark_overdue};
use crate::utils::{
    arg, fmt_day, fmt_money, id_for_category, maybe_print_json, opt_arg, parse_amount,
    parse_instant, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("due", sub)) => due(conn, sub)?,
        Some(("sweep", sub)) => {
            let ctx = Ctx::resolve(conn, sub)?;
            let n = mark_overdue(conn, ctx.workspace, ctx.now)?;
            println!("Marked {} bill(s) overdue", n);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = Ctx::resolve(conn, sub)?;
    let name = arg(sub, "name")?;
    let category_id = opt_arg(sub, "category")
        .map(|c| id_for_category(conn, ctx.workspace, RecordKind::Expense, c))
        .transpose()?;
    let bill = BillReminder {
        id: 0,
        workspace_id: ctx.workspace,
        category_id,
        name: name.to_string(),
        amount: parse_amount(arg(sub, "amount")?)?,
        due_date: parse_instant(arg(sub, "due")?)?,
        frequency: arg(sub, "frequency")?.parse::<BillFrequency>()?,
        reminder_days_before: sub.get_one::<u32>("remind-days").copied().unwrap_or(1),
        status: BillStatus::Pending,
    };
    let id = insert_bill(conn, &bill)?;
    println!(
        "Added bill #{} '{}' for {} due {} ({})",
        id,
        name,
        fmt_money(&bill.amount, &ctx.currency),
        fmt_day(&bill.due_date),
        bill.frequency
    );
    Ok(())
}

fn bill_rows(bills: &[&BillReminder], ctx: &Ctx) -> Vec<Vec<String>> {
    bills
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                b.name.clone(),
                format!("{:.2}", b.amount),
                fmt_day(&b.due_date),
                b.frequency.to_string(),
                b.effective_status(ctx.now).to_string(),
            ]
        })
        .collect()
}

const HEADERS: [&str; 6] = ["ID", "Bill", "Amount", "Due", "Frequency", "Status"];

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let ctx = Ctx::resolve(conn, sub)?;
    let bills = conn.list_bill_reminders(ctx.workspace)?;
    if maybe_print_json(json_flag, jsonl_flag, &bills)? {
        return Ok(());
    }
    let refs: Vec<&BillReminder> = bills.iter().collect();
    println!("{}", pretty_table(&HEADERS, bill_rows(&refs, &ctx)));
    let s = summarize_bills(&bills, ctx.now, ctx.config.due_soon_days)?;
    println!(
        "{} bill(s), {} pending totalling {}, {} due in the next {} day(s), {} overdue",
        s.total,
        s.pending,
        fmt_money(&s.pending_amount, &ctx.currency),
        s.due_soon,
        ctx.config.due_soon_days,
        s.overdue
    );
    Ok(())
}

fn pay(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ctx = Ctx::resolve(conn, sub)?;
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow::anyhow!("Missing required argument --id"))?;
    match mark_bill_paid(conn, ctx.workspace, id)? {
        Some(next) => println!("Bill #{} paid; next occurrence scheduled as #{}", id, next),
        None => println!("Bill #{} paid", id),
    }
    Ok(())
}

fn due(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let ctx = Ctx::resolve(conn, sub)?;
    let days = sub
        .get_one::<i64>("days")
        .copied()
        .unwrap_or(ctx.config.due_soon_days);
    let bills = conn.list_bill_reminders(ctx.workspace)?;
    let soon = due_soon(&bills, ctx.now, days);
    if maybe_print_json(json_flag, jsonl_flag, &soon)? {
        return Ok(());
    }
    if soon.is_empty() {
        println!("No pending bills due in the next {} day(s)", days);
    } else {
        println!("{}", pretty_table(&HEADERS, bill_rows(&soon, &ctx)));
    }
    Ok(())
}
