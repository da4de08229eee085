// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod bills;
pub mod budgets;
pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod goals;
pub mod records;
pub mod reports;
pub mod settings;
pub mod workspaces;

use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::config::Config;
use crate::models::WorkspaceId;
use crate::utils::{id_for_workspace, opt_arg, parse_instant};

/// Workspace, clock and settings a command runs against, taken from the
/// global `--workspace` / `--as-of` flags and the settings table.
pub struct Ctx {
    pub workspace: WorkspaceId,
    pub currency: String,
    pub now: NaiveDateTime,
    pub config: Config,
}

impl Ctx {
    pub fn resolve(conn: &Connection, m: &clap::ArgMatches) -> Result<Self> {
        let config = Config::load(conn)?;
        let name = opt_arg(m, "workspace")
            .map(str::to_string)
            .unwrap_or_else(|| config.default_workspace.clone());
        let workspace = id_for_workspace(conn, &name)?;
        let currency = crate::utils::workspace_currency(conn, workspace)?;
        let now = match opt_arg(m, "as-of") {
            Some(s) => parse_instant(s)?,
            None => chrono::Local::now().naive_local(),
        };
        tracing::debug!(workspace, %now, "command context");
        Ok(Self {
            workspace,
            currency,
            now,
            config,
        })
    }
}
