// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar periods and the inclusive windows they cover.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl PeriodKind {
    pub const ALL: [PeriodKind; 5] = [
        PeriodKind::Daily,
        PeriodKind::Weekly,
        PeriodKind::Monthly,
        PeriodKind::Quarterly,
        PeriodKind::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Daily => "daily",
            PeriodKind::Weekly => "weekly",
            PeriodKind::Monthly => "monthly",
            PeriodKind::Quarterly => "quarterly",
            PeriodKind::Yearly => "yearly",
        }
    }

    /// Moves `from` forward by `n` whole periods.
    ///
    /// Month based steps keep the day of month and clamp it to the end of
    /// shorter months (Jan 31 + 1 month = Feb 28/29). Returns `None` when the
    /// result leaves chrono's representable range.
    pub fn advance(&self, from: NaiveDateTime, n: u32) -> Option<NaiveDateTime> {
        match self {
            PeriodKind::Daily => from.checked_add_days(Days::new(u64::from(n))),
            PeriodKind::Weekly => from.checked_add_days(Days::new(7 * u64::from(n))),
            PeriodKind::Monthly => from.checked_add_months(Months::new(n)),
            PeriodKind::Quarterly => from.checked_add_months(Months::new(n.checked_mul(3)?)),
            PeriodKind::Yearly => from.checked_add_months(Months::new(n.checked_mul(12)?)),
        }
    }
}

impl FromStr for PeriodKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(PeriodKind::Daily),
            "weekly" | "week" => Ok(PeriodKind::Weekly),
            "monthly" | "month" => Ok(PeriodKind::Monthly),
            "quarterly" | "quarter" => Ok(PeriodKind::Quarterly),
            "yearly" | "year" | "annual" => Ok(PeriodKind::Yearly),
            _ => Err(EngineError::InvalidPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Smallest representable step between two instants.
pub fn tick() -> Duration {
    Duration::nanoseconds(1)
}

/// An inclusive `[start, end]` interval of local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }

    /// The window of the same kind that ends one tick before this one starts.
    pub fn preceding(&self, kind: PeriodKind, week_start: Weekday) -> Option<Window> {
        let reference = self.start.checked_sub_signed(tick())?;
        Some(resolve_period_from(reference, kind, week_start))
    }

    /// The window of the same kind that starts one tick after this one ends.
    pub fn following(&self, kind: PeriodKind, week_start: Weekday) -> Option<Window> {
        let reference = self.end.checked_add_signed(tick())?;
        Some(resolve_period_from(reference, kind, week_start))
    }

    /// Short human label, e.g. `2025-03`, `2025-Q1`, `2025`.
    pub fn label(&self, kind: PeriodKind) -> String {
        let d = self.start.date();
        match kind {
            PeriodKind::Daily => d.format("%Y-%m-%d").to_string(),
            PeriodKind::Weekly => format!("week of {}", d.format("%Y-%m-%d")),
            PeriodKind::Monthly => d.format("%Y-%m").to_string(),
            PeriodKind::Quarterly => format!("{}-Q{}", d.year(), d.month0() / 3 + 1),
            PeriodKind::Yearly => d.year().to_string(),
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format("%Y-%m-%d %H:%M:%S"),
            self.end.format("%Y-%m-%d %H:%M:%S%.3f")
        )
    }
}

/// Resolves the window of `kind` containing `reference`, with weeks starting on Monday.
pub fn resolve_period(reference: NaiveDateTime, kind: PeriodKind) -> Window {
    resolve_period_from(reference, kind, Weekday::Mon)
}

/// Resolves the window of `kind` containing `reference`.
///
/// `start <= reference <= end` always holds, and the window of the instant
/// one tick past `end` starts exactly there.
pub fn resolve_period_from(reference: NaiveDateTime, kind: PeriodKind, week_start: Weekday) -> Window {
    let first = first_day(reference.date(), kind, week_start);
    let start = first.and_time(NaiveTime::MIN);
    let end = next_first_day(first, kind)
        .and_then(|next| next.and_time(NaiveTime::MIN).checked_sub_signed(tick()))
        .unwrap_or(NaiveDateTime::MAX);
    Window { start, end }
}

/// Windows of `kind` ending with the one containing `reference`, most recent first.
pub fn trailing_windows(
    reference: NaiveDateTime,
    kind: PeriodKind,
    count: usize,
    week_start: Weekday,
) -> Vec<Window> {
    let mut out = Vec::new();
    let mut current = Some(resolve_period_from(reference, kind, week_start));
    while out.len() < count {
        let Some(w) = current else { break };
        out.push(w);
        current = w.preceding(kind, week_start);
    }
    out
}

fn first_day(date: NaiveDate, kind: PeriodKind, week_start: Weekday) -> NaiveDate {
    match kind {
        PeriodKind::Daily => date,
        PeriodKind::Weekly => {
            let back = (7 + date.weekday().num_days_from_monday()
                - week_start.num_days_from_monday())
                % 7;
            date.checked_sub_days(Days::new(u64::from(back)))
                .unwrap_or(NaiveDate::MIN)
        }
        PeriodKind::Monthly => first_of_month(date),
        PeriodKind::Quarterly => {
            let month = first_of_month(date);
            month
                .checked_sub_months(Months::new(date.month0() % 3))
                .unwrap_or(month)
        }
        PeriodKind::Yearly => date.with_ordinal(1).unwrap_or(date),
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_first_day(first: NaiveDate, kind: PeriodKind) -> Option<NaiveDate> {
    match kind {
        PeriodKind::Daily => first.checked_add_days(Days::new(1)),
        PeriodKind::Weekly => first.checked_add_days(Days::new(7)),
        PeriodKind::Monthly => first.checked_add_months(Months::new(1)),
        PeriodKind::Quarterly => first.checked_add_months(Months::new(3)),
        PeriodKind::Yearly => first.checked_add_months(Months::new(12)),
    }
}
