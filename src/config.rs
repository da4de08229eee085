// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed view over the `settings` table.

use anyhow::{Context, Result, bail};
use chrono::Weekday;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

pub const KEYS: [&str; 5] = [
    "base_currency",
    "week_start",
    "due_soon_days",
    "alert_threshold",
    "default_workspace",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub base_currency: String,
    #[serde(serialize_with = "serialize_weekday")]
    pub week_start: Weekday,
    pub due_soon_days: i64,
    pub alert_threshold: u8,
    pub default_workspace: String,
}

fn serialize_weekday<S: serde::Serializer>(d: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&d.to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_currency: "USD".to_string(),
            week_start: Weekday::Mon,
            due_soon_days: 7,
            alert_threshold: 80,
            default_workspace: "Personal".to_string(),
        }
    }
}

impl Config {
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut cfg = Config::default();
        for key in KEYS {
            if let Some(v) = get_setting(conn, key)? {
                cfg.apply(key, &v)
                    .with_context(|| format!("Invalid stored setting {}='{}'", key, v))?;
            }
        }
        Ok(cfg)
    }

    /// Validates and persists one setting.
    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        Config::default().apply(key, value)?;
        set_setting(conn, key, value)?;
        tracing::info!(key, value, "setting updated");
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String> {
        Ok(match key {
            "base_currency" => self.base_currency.clone(),
            "week_start" => self.week_start.to_string(),
            "due_soon_days" => self.due_soon_days.to_string(),
            "alert_threshold" => self.alert_threshold.to_string(),
            "default_workspace" => self.default_workspace.clone(),
            _ => bail!("Unknown setting '{}' (known: {})", key, KEYS.join(", ")),
        })
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "base_currency" => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    bail!("Currency must be a 3-letter code, got '{}'", value);
                }
                self.base_currency = value.to_uppercase();
            }
            "week_start" => {
                self.week_start = value
                    .parse::<Weekday>()
                    .map_err(|_| anyhow::anyhow!("Invalid weekday '{}'", value))?;
            }
            "due_soon_days" => {
                let days: i64 = value
                    .parse()
                    .with_context(|| format!("Invalid day count '{}'", value))?;
                if days < 0 {
                    bail!("due_soon_days cannot be negative");
                }
                self.due_soon_days = days;
            }
            "alert_threshold" => {
                let pct: u8 = value
                    .parse()
                    .with_context(|| format!("Invalid percentage '{}'", value))?;
                if pct > 100 {
                    bail!("alert_threshold must be within 0..=100");
                }
                self.alert_threshold = pct;
            }
            "default_workspace" => {
                if value.is_empty() {
                    bail!("default_workspace cannot be empty");
                }
                self.default_workspace = value.to_string();
            }
            _ => bail!("Unknown setting '{}' (known: {})", key, KEYS.join(", ")),
        }
        Ok(())
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
