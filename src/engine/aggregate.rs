// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::engine::period::Window;
use crate::error::EngineError;
use crate::models::{CategoryId, MonetaryRecord, WorkspaceId};

/// Optional category/workspace restriction applied on top of a window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub category: Option<CategoryId>,
    pub workspace: Option<WorkspaceId>,
}

impl RecordFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn category(id: CategoryId) -> Self {
        Self {
            category: Some(id),
            workspace: None,
        }
    }

    pub fn in_workspace(mut self, id: WorkspaceId) -> Self {
        self.workspace = Some(id);
        self
    }

    pub fn matches(&self, rec: &MonetaryRecord) -> bool {
        self.category.is_none_or(|c| rec.category_id == c)
            && self.workspace.is_none_or(|w| rec.workspace_id == w)
    }
}

/// Adds `amounts` up, failing instead of overflowing.
pub fn checked_total<I>(amounts: I, what: &'static str) -> Result<Decimal, EngineError>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, a| {
        acc.checked_add(a).ok_or(EngineError::Overflow(what))
    })
}

/// `part * 100 / whole`. `whole` must be non-zero.
pub fn percent_of(part: Decimal, whole: Decimal, what: &'static str) -> Result<Decimal, EngineError> {
    part.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|p| p.checked_div(whole))
        .ok_or(EngineError::Overflow(what))
}

/// Sums the amounts of records inside `window` (inclusive at both ends) that
/// match `filter`. An empty match sums to zero.
pub fn sum<'a, I>(records: I, window: &Window, filter: &RecordFilter) -> Result<Decimal, EngineError>
where
    I: IntoIterator<Item = &'a MonetaryRecord>,
{
    checked_total(
        records
            .into_iter()
            .filter(|r| window.contains(r.occurred_at) && filter.matches(r))
            .map(|r| r.amount),
        "sum",
    )
}

/// Per-category totals for records inside `window`.
pub fn sum_by_category<'a, I>(
    records: I,
    window: &Window,
) -> Result<BTreeMap<CategoryId, Decimal>, EngineError>
where
    I: IntoIterator<Item = &'a MonetaryRecord>,
{
    let mut out: BTreeMap<CategoryId, Decimal> = BTreeMap::new();
    for r in records.into_iter().filter(|r| window.contains(r.occurred_at)) {
        let total = out.entry(r.category_id).or_insert(Decimal::ZERO);
        *total = total
            .checked_add(r.amount)
            .ok_or(EngineError::Overflow("category total"))?;
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    /// `net / income * 100`; `None` when there was no income.
    pub savings_rate: Option<Decimal>,
}

pub fn period_totals(
    incomes: &[MonetaryRecord],
    expenses: &[MonetaryRecord],
    window: &Window,
) -> Result<PeriodTotals, EngineError> {
    let income = sum(incomes, window, &RecordFilter::any())?;
    let spent = sum(expenses, window, &RecordFilter::any())?;
    let net = income
        .checked_sub(spent)
        .ok_or(EngineError::Overflow("net"))?;
    let savings_rate = if income.is_zero() {
        None
    } else {
        Some(percent_of(net, income, "savings rate")?)
    };
    Ok(PeriodTotals {
        income,
        expenses: spent,
        net,
        savings_rate,
    })
}
