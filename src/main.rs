// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use moneynest::config::Config;
use moneynest::models::RecordKind;
use moneynest::{cli, commands, db, logging, store, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    logging::init_tracing(matches.get_count("verbose"));

    let mut conn = db::open_or_init()?;

    match matches.subcommand() {
        Some(("init", sub)) => {
            let cfg = Config::load(&conn)?;
            let name = utils::opt_arg(sub, "workspace").unwrap_or(&cfg.default_workspace);
            let exists = store::list_workspaces(&conn)?
                .iter()
                .any(|w| w.name == name);
            if !exists {
                let ccy = utils::opt_arg(sub, "currency").unwrap_or(&cfg.base_currency);
                store::create_workspace(&mut conn, name, &ccy.to_uppercase())?;
                println!("Created workspace '{}' ({})", name, ccy.to_uppercase());
            }
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("workspace", sub)) => commands::workspaces::handle(&mut conn, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("expense", sub)) => commands::records::handle(&conn, RecordKind::Expense, sub)?,
        Some(("income", sub)) => commands::records::handle(&conn, RecordKind::Income, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&conn, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&conn, sub)?,
        Some(("bill", sub)) => commands::bills::handle(&mut conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
