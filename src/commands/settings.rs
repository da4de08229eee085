// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Config, KEYS};
use crate::utils::{arg, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let cfg = Config::load(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cfg)? {
                let rows = KEYS
                    .iter()
                    .map(|k| Ok(vec![k.to_string(), cfg.get(k)?]))
                    .collect::<Result<Vec<_>>>()?;
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("get", sub)) => {
            let cfg = Config::load(conn)?;
            println!("{}", cfg.get(arg(sub, "key")?)?);
        }
        Some(("set", sub)) => {
            let key = arg(sub, "key")?;
            let value = arg(sub, "value")?;
            Config::set(conn, key, value)?;
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}
