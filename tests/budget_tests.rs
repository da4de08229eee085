// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use moneynest::engine::{BudgetStatus, PeriodKind, evaluate_budget, summarize_budgets};
use moneynest::error::EngineError;
use moneynest::models::Budget;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn budget(limit: &str, threshold: u8) -> Budget {
    Budget {
        id: 1,
        workspace_id: 1,
        category_id: 1,
        limit: d(limit),
        period: PeriodKind::Monthly,
        alert_threshold: threshold,
        start_date: NaiveDateTime::parse_from_str("2025-01-01 00:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap(),
        active: true,
    }
}

fn rank(s: BudgetStatus) -> u8 {
    match s {
        BudgetStatus::OnTrack => 0,
        BudgetStatus::Warning => 1,
        BudgetStatus::OverBudget => 2,
    }
}

#[test]
fn under_threshold_is_on_track() {
    let e = evaluate_budget(&budget("600.00", 80), d("425.50")).unwrap();
    assert_eq!(e.percent_used.round_dp(2), d("70.92"));
    assert_eq!(e.remaining, d("174.50"));
    assert_eq!(e.status, BudgetStatus::OnTrack);
}

#[test]
fn overspend_goes_negative() {
    let e = evaluate_budget(&budget("600.00", 80), d("650.00")).unwrap();
    assert_eq!(e.status, BudgetStatus::OverBudget);
    assert_eq!(e.remaining, d("-50.00"));
}

#[test]
fn threshold_tie_warns() {
    let e = evaluate_budget(&budget("600", 80), d("480")).unwrap();
    assert_eq!(e.percent_used, d("80"));
    assert_eq!(e.status, BudgetStatus::Warning);
}

#[test]
fn spending_exactly_the_limit_is_not_over() {
    let e = evaluate_budget(&budget("600", 80), d("600")).unwrap();
    assert_eq!(e.status, BudgetStatus::Warning);
    assert_eq!(e.remaining, Decimal::ZERO);
}

#[test]
fn non_positive_limit_is_rejected() {
    for limit in ["0", "-10"] {
        let err = evaluate_budget(&budget(limit, 80), d("1")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidBudget(_)));
    }
    let err = evaluate_budget(&budget("100", 101), d("1")).unwrap_err();
    assert!(matches!(err, EngineError::InvalidBudget(_)));
}

#[test]
fn status_never_improves_as_spending_grows() {
    let b = budget("500", 75);
    let mut last = 0;
    let mut prev_pct = Decimal::MIN;
    let mut prev_rem = Decimal::MAX;
    for step in 0..=30 {
        let spent = Decimal::from(step * 25);
        let e = evaluate_budget(&b, spent).unwrap();
        assert!(rank(e.status) >= last, "regressed at {}", spent);
        assert!(e.percent_used >= prev_pct, "percent fell at {}", spent);
        assert!(e.remaining <= prev_rem, "remaining grew at {}", spent);
        last = rank(e.status);
        prev_pct = e.percent_used;
        prev_rem = e.remaining;
    }
    assert_eq!(last, 2);
    assert_eq!(prev_pct, d("150"));
    assert_eq!(prev_rem, d("-250"));
}

#[test]
fn out_of_range_usage_is_an_error() {
    let e = evaluate_budget(&budget("0.0000000001", 80), d("100000000000000000000"));
    assert!(matches!(e, Err(EngineError::Overflow(_))));
}

#[test]
fn summary_rolls_up_limits_and_statuses() {
    let a = budget("600", 80);
    let b = budget("200", 80);
    let ea = evaluate_budget(&a, d("425.50")).unwrap();
    let eb = evaluate_budget(&b, d("250")).unwrap();
    let s = summarize_budgets([(a.limit, d("425.50"), &ea), (b.limit, d("250"), &eb)]).unwrap();
    assert_eq!(s.total_limit, d("800"));
    assert_eq!(s.total_spent, d("675.50"));
    assert_eq!(s.total_remaining, d("124.50"));
    assert_eq!(s.on_track, 1);
    assert_eq!(s.over_budget, 1);
    assert_eq!(s.warning, 0);
}
