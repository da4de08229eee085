// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::Ctx;
use crate::commands::records::query_rows;
use crate::models::RecordKind;
use crate::utils::arg;
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("records", sub)) => export_records(conn, sub),
        _ => Ok(()),
    }
}

fn export_records(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let kind: RecordKind = arg(sub, "kind")?.parse()?;
    let fmt = arg(sub, "format")?.to_lowercase();
    let out = arg(sub, "out")?;
    let ctx = Ctx::resolve(conn, sub)?;

    let mut rows = query_rows(conn, kind, sub)?;
    // Oldest first on disk.
    rows.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["id", "date", "category", "amount", "currency", "note"])?;
            for r in &rows {
                wtr.write_record([
                    r.id.to_string(),
                    r.date.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    ctx.currency.clone(),
                    r.note.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|r| {
                    json!({
                        "id": r.id, "date": r.date, "category": r.category,
                        "amount": r.amount, "currency": ctx.currency, "note": r.note
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    tracing::info!(%kind, count = rows.len(), out, "export written");
    println!("Exported {} {} record(s) to {}", rows.len(), kind, out);
    Ok(())
}
