// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::{create_workspace, list_workspaces};
use crate::utils::{arg, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = arg(sub, "name")?;
            let ccy = arg(sub, "currency")?.to_uppercase();
            create_workspace(conn, name, &ccy)?;
            println!("Added workspace '{}' ({}) with default categories", name, ccy);
        }
        Some(("list", _)) => {
            let data = list_workspaces(conn)?
                .into_iter()
                .map(|w| vec![w.id.to_string(), w.name, w.currency])
                .collect();
            println!("{}", pretty_table(&["ID", "Name", "Currency"], data));
        }
        _ => {}
    }
    Ok(())
}
