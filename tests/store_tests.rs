// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDateTime, Weekday};
use moneynest::db;
use moneynest::engine::{BudgetStatus, PeriodKind, resolve_period};
use moneynest::models::{
    BillFrequency, BillReminder, BillStatus, Budget, MonetaryRecord, Priority, RecordKind,
    SavingsGoal, WorkspaceId,
};
use moneynest::overview::{self, AlertKind};
use moneynest::store::{self, Store};
use moneynest::utils::id_for_category;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> (Connection, WorkspaceId) {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let ws = store::create_workspace(&mut conn, "Home", "usd").unwrap();
    (conn, ws)
}

fn spend(conn: &Connection, ws: WorkspaceId, category: &str, amount: &str, when: &str) {
    let category_id = id_for_category(conn, ws, RecordKind::Expense, category).unwrap();
    store::insert_record(
        conn,
        RecordKind::Expense,
        &MonetaryRecord {
            id: 0,
            workspace_id: ws,
            category_id,
            amount: d(amount),
            occurred_at: at(when),
            description: None,
        },
    )
    .unwrap();
}

fn earn(conn: &Connection, ws: WorkspaceId, amount: &str, when: &str) {
    let category_id = id_for_category(conn, ws, RecordKind::Income, "Salary").unwrap();
    store::insert_record(
        conn,
        RecordKind::Income,
        &MonetaryRecord {
            id: 0,
            workspace_id: ws,
            category_id,
            amount: d(amount),
            occurred_at: at(when),
            description: Some("payroll".into()),
        },
    )
    .unwrap();
}

fn monthly_budget(conn: &Connection, ws: WorkspaceId, category: &str, limit: &str) -> Budget {
    Budget {
        id: 0,
        workspace_id: ws,
        category_id: id_for_category(conn, ws, RecordKind::Expense, category).unwrap(),
        limit: d(limit),
        period: PeriodKind::Monthly,
        alert_threshold: 80,
        start_date: at("2025-01-01 00:00:00"),
        active: true,
    }
}

fn bill(ws: WorkspaceId, name: &str, due: &str, frequency: BillFrequency) -> BillReminder {
    BillReminder {
        id: 0,
        workspace_id: ws,
        category_id: None,
        name: name.into(),
        amount: d("120.00"),
        due_date: at(due),
        frequency,
        reminder_days_before: 2,
        status: BillStatus::Pending,
    }
}

#[test]
fn new_workspace_gets_default_categories() {
    let (conn, ws) = setup();
    let cats = conn.list_categories(ws).unwrap();
    let expense = cats.iter().filter(|c| c.kind == RecordKind::Expense).count();
    let income = cats.iter().filter(|c| c.kind == RecordKind::Income).count();
    assert_eq!(expense, store::DEFAULT_EXPENSE_CATEGORIES.len());
    assert_eq!(income, store::DEFAULT_INCOME_CATEGORIES.len());
    let all = store::list_workspaces(&conn).unwrap();
    assert_eq!(all[0].currency, "USD");
}

#[test]
fn record_range_query_is_inclusive() {
    let (conn, ws) = setup();
    spend(&conn, ws, "Dining", "10", "2025-03-01 00:00:00");
    spend(&conn, ws, "Dining", "20", "2025-03-31 23:59:59");
    spend(&conn, ws, "Dining", "40", "2025-04-01 00:00:00");
    let march = resolve_period(at("2025-03-15 00:00:00"), PeriodKind::Monthly);
    let rows = conn
        .list_records(RecordKind::Expense, ws, None, Some(&march))
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].amount, d("20"));
    let all = conn.list_records(RecordKind::Expense, ws, None, None).unwrap();
    assert_eq!(all.len(), 3);
}

#[test]
fn negative_amounts_are_refused() {
    let (conn, ws) = setup();
    let category_id = id_for_category(&conn, ws, RecordKind::Expense, "Dining").unwrap();
    let rec = MonetaryRecord {
        id: 0,
        workspace_id: ws,
        category_id,
        amount: d("-1"),
        occurred_at: at("2025-03-01 10:00:00"),
        description: None,
    };
    assert!(store::insert_record(&conn, RecordKind::Expense, &rec).is_err());
}

#[test]
fn budget_upsert_validates_and_replaces() {
    let (conn, ws) = setup();
    let mut b = monthly_budget(&conn, ws, "Dining", "0");
    assert!(store::upsert_budget(&conn, &b).is_err());

    b.limit = d("300");
    let first = store::upsert_budget(&conn, &b).unwrap();
    b.limit = d("450");
    let second = store::upsert_budget(&conn, &b).unwrap();
    assert_eq!(first, second);
    let stored = conn.list_budgets(ws).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].limit, d("450"));
}

#[test]
fn budget_report_uses_current_period_spending() {
    let (conn, ws) = setup();
    store::upsert_budget(&conn, &monthly_budget(&conn, ws, "Food & Groceries", "600.00")).unwrap();
    spend(&conn, ws, "Food & Groceries", "125.50", "2025-03-02 12:00:00");
    spend(&conn, ws, "Food & Groceries", "300.00", "2025-03-18 12:00:00");
    spend(&conn, ws, "Food & Groceries", "200.00", "2025-02-27 12:00:00");
    spend(&conn, ws, "Dining", "99.00", "2025-03-05 12:00:00");

    let lines = overview::budget_report(&conn, ws, at("2025-03-20 08:00:00"), Weekday::Mon).unwrap();
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line.category, "Food & Groceries");
    assert_eq!(line.spent, d("425.50"));
    assert_eq!(line.evaluation.status, BudgetStatus::OnTrack);
    assert_eq!(line.evaluation.remaining, d("174.50"));

    let summary = overview::budget_summary(&lines).unwrap();
    assert_eq!(summary.on_track, 1);
}

#[test]
fn future_and_inactive_budgets_are_skipped() {
    let (conn, ws) = setup();
    let mut later = monthly_budget(&conn, ws, "Dining", "100");
    later.start_date = at("2025-06-01 00:00:00");
    store::upsert_budget(&conn, &later).unwrap();
    let mut off = monthly_budget(&conn, ws, "Shopping", "100");
    off.active = false;
    store::upsert_budget(&conn, &off).unwrap();

    let lines = overview::budget_report(&conn, ws, at("2025-03-20 08:00:00"), Weekday::Mon).unwrap();
    assert!(lines.is_empty());
}

#[test]
fn goal_contributions_keep_balance_non_negative() {
    let (conn, ws) = setup();
    let goal = SavingsGoal {
        id: 0,
        workspace_id: ws,
        name: "Vacation".into(),
        target_amount: d("3000"),
        current_amount: d("500"),
        target_date: Some(at("2025-12-01 00:00:00")),
        priority: Priority::Medium,
        auto_contribute: false,
        auto_contribute_amount: None,
        auto_contribute_frequency: None,
    };
    store::insert_goal(&conn, &goal).unwrap();
    assert_eq!(store::contribute_to_goal(&conn, ws, "Vacation", d("250")).unwrap(), d("750"));
    assert!(store::contribute_to_goal(&conn, ws, "Vacation", d("-800")).is_err());
    assert!(store::contribute_to_goal(&conn, ws, "Car", d("10")).is_err());

    let lines = overview::goal_report(&conn, ws, at("2025-03-01 00:00:00")).unwrap();
    assert_eq!(lines[0].progress.percent_complete, d("25"));
}

#[test]
fn paying_a_recurring_bill_schedules_the_next_one() {
    let (mut conn, ws) = setup();
    let id = store::insert_bill(&conn, &bill(ws, "Rent", "2025-01-31 00:00:00", BillFrequency::Monthly)).unwrap();
    let next = store::mark_bill_paid(&mut conn, ws, id).unwrap().unwrap();

    assert_eq!(store::bill_by_id(&conn, ws, id).unwrap().status, BillStatus::Paid);
    let n = store::bill_by_id(&conn, ws, next).unwrap();
    assert_eq!(n.status, BillStatus::Pending);
    assert_eq!(n.due_date, at("2025-02-28 00:00:00"));
    assert!(store::mark_bill_paid(&mut conn, ws, id).is_err());

    let once = store::insert_bill(&conn, &bill(ws, "Repair", "2025-02-10 00:00:00", BillFrequency::Once)).unwrap();
    assert_eq!(store::mark_bill_paid(&mut conn, ws, once).unwrap(), None);
}

#[test]
fn overdue_sweep_persists_transition() {
    let (conn, ws) = setup();
    store::insert_bill(&conn, &bill(ws, "Power", "2025-03-01 00:00:00", BillFrequency::Monthly)).unwrap();
    store::insert_bill(&conn, &bill(ws, "Water", "2025-03-25 00:00:00", BillFrequency::Monthly)).unwrap();
    let now = at("2025-03-10 00:00:00");
    assert_eq!(store::mark_overdue(&conn, ws, now).unwrap(), 1);
    assert_eq!(store::mark_overdue(&conn, ws, now).unwrap(), 0);
    let bills = conn.list_bill_reminders(ws).unwrap();
    assert_eq!(bills[0].status, BillStatus::Overdue);
    assert_eq!(bills[1].status, BillStatus::Pending);
}

#[test]
fn swept_bills_still_raise_overdue_alerts() {
    let (conn, ws) = setup();
    store::insert_bill(&conn, &bill(ws, "Power", "2025-03-01 00:00:00", BillFrequency::Monthly)).unwrap();
    let now = at("2025-03-10 00:00:00");
    let before = overview::bill_report(&conn, ws, now, 7).unwrap();
    assert_eq!(before.summary.overdue, 1);

    assert_eq!(store::mark_overdue(&conn, ws, now).unwrap(), 1);
    let found = overview::alerts(&conn, ws, now, Weekday::Mon).unwrap();
    let overdue: Vec<&str> = found
        .iter()
        .filter(|a| a.kind == AlertKind::BillOverdue)
        .map(|a| a.subject.as_str())
        .collect();
    assert_eq!(overdue, vec!["Power"]);

    let after = overview::bill_report(&conn, ws, now, 7).unwrap();
    assert_eq!(after.summary.overdue, 1);
    assert_eq!(after.overdue.len(), 1);
    assert!(after.due_soon.is_empty());
}

#[test]
fn cashflow_and_category_breakdown() {
    let (conn, ws) = setup();
    earn(&conn, ws, "4000", "2025-01-25 09:00:00");
    earn(&conn, ws, "4000", "2025-03-25 09:00:00");
    spend(&conn, ws, "Dining", "100", "2025-01-10 19:00:00");
    spend(&conn, ws, "Dining", "300", "2025-03-10 19:00:00");
    spend(&conn, ws, "Utilities", "100", "2025-03-12 19:00:00");

    let rows = overview::cashflow(&conn, ws, PeriodKind::Monthly, at("2025-03-28 00:00:00"), 3, Weekday::Mon).unwrap();
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["2025-03", "2025-02", "2025-01"]);
    assert_eq!(rows[0].totals.net, d("3600"));
    assert_eq!(rows[1].totals.income, Decimal::ZERO);
    assert_eq!(rows[1].totals.savings_rate, None);
    assert_eq!(rows[2].totals.expenses, d("100"));

    let march = resolve_period(at("2025-03-28 00:00:00"), PeriodKind::Monthly);
    let spend = overview::spending_by_category(&conn, ws, &march).unwrap();
    assert_eq!(spend[0].category, "Dining");
    assert_eq!(spend[0].share, d("75"));
    assert_eq!(spend[1].category, "Utilities");

    let t = overview::totals(&conn, ws, &march).unwrap();
    assert_eq!(t.expenses, d("400"));
}

#[test]
fn alerts_collect_budget_and_bill_problems() {
    let (conn, ws) = setup();
    store::upsert_budget(&conn, &monthly_budget(&conn, ws, "Dining", "100")).unwrap();
    spend(&conn, ws, "Dining", "150", "2025-03-05 12:00:00");
    store::insert_bill(&conn, &bill(ws, "Internet", "2025-03-01 00:00:00", BillFrequency::Monthly)).unwrap();
    store::insert_bill(&conn, &bill(ws, "Phone", "2025-03-11 00:00:00", BillFrequency::Monthly)).unwrap();

    let alerts = overview::alerts(&conn, ws, at("2025-03-10 08:00:00"), Weekday::Mon).unwrap();
    let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
    assert!(kinds.contains(&AlertKind::BudgetExceeded));
    assert!(kinds.contains(&AlertKind::BillOverdue));
    assert!(kinds.contains(&AlertKind::BillReminder));
}
