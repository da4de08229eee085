// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::models::{CategoryId, RecordKind, WorkspaceId};

/// Fetches a required string argument.
pub fn arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .ok_or_else(|| anyhow!("Missing required argument --{}", name))
}

pub fn opt_arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts `YYYY-MM-DD` (midnight), `YYYY-MM-DD HH:MM[:SS]` or the `T` separated form.
pub fn parse_instant(s: &str) -> Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    parse_date(s)
        .map(|d| d.and_time(NaiveTime::MIN))
        .with_context(|| format!("Invalid date/time '{}'", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// A decimal that must not be negative, as every stored amount is.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d < Decimal::ZERO {
        bail!("Amount must not be negative, got {}", d);
    }
    Ok(d)
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{} {:.2}", ccy, d.round_dp(2))
}

pub fn fmt_pct(d: &Decimal) -> String {
    format!("{:.1}%", d.round_dp(1))
}

pub fn fmt_day(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d").to_string()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_workspace(conn: &Connection, name: &str) -> Result<WorkspaceId> {
    let mut stmt = conn.prepare("SELECT id FROM workspaces WHERE name=?1")?;
    let id: WorkspaceId = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Workspace '{}' not found (run `moneynest init`)", name))?;
    Ok(id)
}

pub fn id_for_category(
    conn: &Connection,
    workspace: WorkspaceId,
    kind: RecordKind,
    name: &str,
) -> Result<CategoryId> {
    let mut stmt =
        conn.prepare("SELECT id FROM categories WHERE workspace_id=?1 AND kind=?2 AND name=?3")?;
    let id: CategoryId = stmt
        .query_row(params![workspace, kind, name], |r| r.get(0))
        .with_context(|| format!("{} category '{}' not found", kind, name))?;
    Ok(id)
}

pub fn workspace_currency(conn: &Connection, workspace: WorkspaceId) -> Result<String> {
    let ccy: String = conn.query_row(
        "SELECT currency FROM workspaces WHERE id=?1",
        params![workspace],
        |r| r.get(0),
    )?;
    Ok(ccy)
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
