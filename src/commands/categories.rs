// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::Ctx;
use crate::models::RecordKind;
use crate::store::{Store, add_category};
use crate::utils::{arg, opt_arg, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let ctx = Ctx::resolve(conn, sub)?;
            let name = arg(sub, "name")?;
            let kind: RecordKind = arg(sub, "kind")?.parse()?;
            add_category(conn, ctx.workspace, name, kind)?;
            println!("Added {} category '{}'", kind, name);
        }
        Some(("list", sub)) => {
            let ctx = Ctx::resolve(conn, sub)?;
            let only: Option<RecordKind> = opt_arg(sub, "kind")
                .map(|s| s.parse::<RecordKind>())
                .transpose()?;
            let data = conn
                .list_categories(ctx.workspace)?
                .into_iter()
                .filter(|c| only.is_none_or(|k| c.kind == k))
                .map(|c| vec![c.name, c.kind.to_string()])
                .collect();
            println!("{}", pretty_table(&["Category", "Kind"], data));
        }
        Some(("rm", sub)) => {
            let ctx = Ctx::resolve(conn, sub)?;
            let name = arg(sub, "name")?;
            let kind: RecordKind = arg(sub, "kind")?.parse()?;
            let n = conn.execute(
                "DELETE FROM categories WHERE workspace_id=?1 AND kind=?2 AND name=?3",
                params![ctx.workspace, kind, name],
            )?;
            if n == 0 {
                anyhow::bail!("{} category '{}' not found", kind, name);
            }
            println!("Removed {} category '{}'", kind, name);
        }
        _ => {}
    }
    Ok(())
}
