// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use moneynest::engine::{PeriodKind, RecordFilter, Window, period_totals, resolve_period, sum, sum_by_category};
use moneynest::error::EngineError;
use moneynest::models::MonetaryRecord;
use rust_decimal::Decimal;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn rec(id: i64, category_id: i64, amount: &str, when: &str) -> MonetaryRecord {
    MonetaryRecord {
        id,
        workspace_id: 1,
        category_id,
        amount: d(amount),
        occurred_at: at(when),
        description: None,
    }
}

fn march() -> Window {
    resolve_period(at("2025-03-10 00:00:00"), PeriodKind::Monthly)
}

#[test]
fn sums_exact_decimals() {
    let records = vec![
        rec(1, 1, "125.50", "2025-03-02 10:00:00"),
        rec(2, 1, "45.00", "2025-03-09 10:00:00"),
        rec(3, 2, "30.00", "2025-03-20 10:00:00"),
    ];
    let total = sum(&records, &march(), &RecordFilter::any()).unwrap();
    assert_eq!(total, d("200.50"));
    assert_eq!(format!("{:.2}", total), "200.50");
}

#[test]
fn totals_past_decimal_range_are_errors() {
    let mut records = vec![rec(1, 1, "0", "2025-03-05 12:00:00"), rec(2, 1, "0", "2025-03-06 12:00:00")];
    for r in &mut records {
        r.amount = Decimal::MAX;
    }
    let err = sum(&records, &march(), &RecordFilter::any()).unwrap_err();
    assert!(matches!(err, EngineError::Overflow(_)));
    assert!(sum_by_category(&records, &march()).is_err());
    assert!(period_totals(&records, &[], &march()).is_err());
}

#[test]
fn empty_input_sums_to_zero() {
    let records: Vec<MonetaryRecord> = Vec::new();
    assert_eq!(sum(&records, &march(), &RecordFilter::any()).unwrap(), Decimal::ZERO);
}

#[test]
fn window_bounds_are_inclusive() {
    let w = march();
    let records = vec![
        MonetaryRecord {
            occurred_at: w.start,
            ..rec(1, 1, "1", "2025-03-01 00:00:00")
        },
        MonetaryRecord {
            occurred_at: w.end,
            ..rec(2, 1, "2", "2025-03-31 00:00:00")
        },
        rec(3, 1, "4", "2025-04-01 00:00:00"),
        rec(4, 1, "8", "2025-02-28 23:59:59"),
    ];
    assert_eq!(sum(&records, &w, &RecordFilter::any()).unwrap(), d("3"));
}

#[test]
fn sum_is_additive_over_disjoint_sets() {
    let a = vec![rec(1, 1, "10.10", "2025-03-02 10:00:00"), rec(2, 2, "0.01", "2025-03-03 10:00:00")];
    let b = vec![rec(3, 1, "99.99", "2025-03-04 10:00:00")];
    let both: Vec<MonetaryRecord> = a.iter().chain(b.iter()).cloned().collect();
    let f = RecordFilter::any();
    assert_eq!(
        sum(&both, &march(), &f).unwrap(),
        sum(&a, &march(), &f).unwrap() + sum(&b, &march(), &f).unwrap()
    );
}

#[test]
fn filters_restrict_category_and_workspace() {
    let mut other_ws = rec(3, 1, "500", "2025-03-05 10:00:00");
    other_ws.workspace_id = 2;
    let records = vec![
        rec(1, 1, "20", "2025-03-02 10:00:00"),
        rec(2, 2, "30", "2025-03-02 11:00:00"),
        other_ws,
    ];
    assert_eq!(sum(&records, &march(), &RecordFilter::category(1)).unwrap(), d("520"));
    assert_eq!(
        sum(&records, &march(), &RecordFilter::category(1).in_workspace(1)).unwrap(),
        d("20")
    );
    assert_eq!(
        sum(&records, &march(), &RecordFilter::any().in_workspace(2)).unwrap(),
        d("500")
    );
}

#[test]
fn groups_by_category() {
    let records = vec![
        rec(1, 1, "20", "2025-03-02 10:00:00"),
        rec(2, 2, "30", "2025-03-02 11:00:00"),
        rec(3, 1, "5.5", "2025-03-03 11:00:00"),
        rec(4, 3, "70", "2025-04-03 11:00:00"),
    ];
    let by_cat = sum_by_category(&records, &march()).unwrap();
    assert_eq!(by_cat.len(), 2);
    assert_eq!(by_cat[&1], d("25.5"));
    assert_eq!(by_cat[&2], d("30"));
}

#[test]
fn period_totals_and_savings_rate() {
    let incomes = vec![rec(1, 10, "4000", "2025-03-01 09:00:00")];
    let expenses = vec![
        rec(2, 1, "1000", "2025-03-05 09:00:00"),
        rec(3, 2, "600", "2025-03-06 09:00:00"),
    ];
    let t = period_totals(&incomes, &expenses, &march()).unwrap();
    assert_eq!(t.income, d("4000"));
    assert_eq!(t.expenses, d("1600"));
    assert_eq!(t.net, d("2400"));
    assert_eq!(t.savings_rate, Some(d("60")));

    let none = period_totals(&[], &expenses, &march()).unwrap();
    assert_eq!(none.net, d("-1600"));
    assert_eq!(none.savings_rate, None);
}
