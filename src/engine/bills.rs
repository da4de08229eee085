// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Days, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::aggregate::checked_total;
use crate::engine::period::PeriodKind;
use crate::error::EngineError;
use crate::models::{BillFrequency, BillReminder, BillStatus};

impl BillFrequency {
    /// Next occurrence after `due`; `None` for one-off bills.
    pub fn next_due(&self, due: NaiveDateTime) -> Option<NaiveDateTime> {
        let kind = match self {
            BillFrequency::Once => return None,
            BillFrequency::Weekly => PeriodKind::Weekly,
            BillFrequency::Monthly => PeriodKind::Monthly,
            BillFrequency::Quarterly => PeriodKind::Quarterly,
            BillFrequency::Yearly => PeriodKind::Yearly,
        };
        kind.advance(due, 1)
    }
}

impl BillReminder {
    /// Status as of `now`: a pending bill past its due date reads as overdue.
    /// The stored status is not touched.
    pub fn effective_status(&self, now: NaiveDateTime) -> BillStatus {
        if self.status == BillStatus::Pending && self.due_date < now {
            BillStatus::Overdue
        } else {
            self.status
        }
    }

    /// Pending and inside its reminder lead time.
    pub fn needs_reminder(&self, now: NaiveDateTime) -> bool {
        if self.status != BillStatus::Pending || now > self.due_date {
            return false;
        }
        let notify_from = self
            .due_date
            .checked_sub_days(Days::new(u64::from(self.reminder_days_before)))
            .unwrap_or(NaiveDateTime::MIN);
        now >= notify_from
    }
}

/// Pending bills due within `[now, now + window_days]`, earliest first.
///
/// Paid and cancelled bills never qualify, whatever their date. A negative
/// window selects nothing.
pub fn due_soon<'a, I>(bills: I, now: NaiveDateTime, window_days: i64) -> Vec<&'a BillReminder>
where
    I: IntoIterator<Item = &'a BillReminder>,
{
    let Ok(days) = u64::try_from(window_days) else {
        return Vec::new();
    };
    let horizon = now
        .checked_add_days(Days::new(days))
        .unwrap_or(NaiveDateTime::MAX);
    let mut out: Vec<&BillReminder> = bills
        .into_iter()
        .filter(|b| b.status == BillStatus::Pending && now <= b.due_date && b.due_date <= horizon)
        .collect();
    out.sort_by_key(|b| b.due_date);
    out
}

/// Unsettled bills past their due date, earliest first: pending bills due
/// before `now` plus bills already marked overdue.
pub fn overdue<'a, I>(bills: I, now: NaiveDateTime) -> Vec<&'a BillReminder>
where
    I: IntoIterator<Item = &'a BillReminder>,
{
    let mut out: Vec<&BillReminder> = bills
        .into_iter()
        .filter(|b| b.effective_status(now) == BillStatus::Overdue)
        .collect();
    out.sort_by_key(|b| b.due_date);
    out
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BillSummary {
    pub total: usize,
    pub pending: usize,
    pub pending_amount: Decimal,
    pub due_soon: usize,
    pub overdue: usize,
}

pub fn summarize_bills(
    bills: &[BillReminder],
    now: NaiveDateTime,
    window_days: i64,
) -> Result<BillSummary, EngineError> {
    let pending: Vec<&BillReminder> = bills
        .iter()
        .filter(|b| b.status == BillStatus::Pending)
        .collect();
    Ok(BillSummary {
        total: bills.len(),
        pending: pending.len(),
        pending_amount: checked_total(pending.iter().map(|b| b.amount), "pending bills")?,
        due_soon: due_soon(bills, now, window_days).len(),
        overdue: overdue(bills, now).len(),
    })
}
