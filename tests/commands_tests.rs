// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDateTime, Weekday};
use moneynest::commands::{bills, budgets, doctor, goals, records, settings};
use moneynest::config::Config;
use moneynest::engine::BudgetStatus;
use moneynest::models::{BillStatus, RecordKind};
use moneynest::store::{self, Store};
use moneynest::{cli, db};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    store::create_workspace(&mut conn, "Personal", "USD").unwrap();
    conn
}

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

/// Parses a command line and returns the matches of `moneynest <group> <leaf>`.
fn leaf(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["moneynest"];
    argv.extend_from_slice(args);
    let m = cli::build_cli().get_matches_from(argv);
    let (_, group) = m.subcommand().unwrap();
    group.clone()
}

#[test]
fn budget_set_then_status() {
    let conn = setup();
    let m = leaf(&["--as-of", "2025-03-20", "budget", "set", "--category", "Dining", "--limit", "200"]);
    budgets::handle(&conn, &m).unwrap();

    let b = &conn.list_budgets(1).unwrap()[0];
    assert_eq!(b.limit, d("200"));
    assert_eq!(b.alert_threshold, 80);
    assert_eq!(b.start_date, at("2025-03-01 00:00:00"));

    let m = leaf(&["--as-of", "2025-03-20", "expense", "add", "--amount", "170", "--category", "Dining", "--date", "2025-03-05"]);
    records::handle(&conn, RecordKind::Expense, &m).unwrap();

    let m = leaf(&["--as-of", "2025-03-20", "budget", "status"]);
    let (_, status) = m.subcommand().unwrap();
    let report = budgets::status_report(&conn, status).unwrap();
    assert_eq!(report.lines.len(), 1);
    assert_eq!(report.lines[0].spent, d("170"));
    assert_eq!(report.lines[0].evaluation.status, BudgetStatus::Warning);
    assert_eq!(report.summary.warning, 1);
}

#[test]
fn zero_budget_limit_is_rejected_at_entry() {
    let conn = setup();
    let m = leaf(&["budget", "set", "--category", "Dining", "--limit", "0"]);
    assert!(budgets::handle(&conn, &m).is_err());
    assert!(conn.list_budgets(1).unwrap().is_empty());
}

#[test]
fn record_listing_is_newest_first_and_limited() {
    let conn = setup();
    for (amount, date) in [("10", "2025-03-01"), ("20", "2025-03-02"), ("30", "2025-03-03"), ("40", "2025-02-03")] {
        let m = leaf(&["expense", "add", "--amount", amount, "--category", "Shopping", "--date", date]);
        records::handle(&conn, RecordKind::Expense, &m).unwrap();
    }
    let m = leaf(&["--as-of", "2025-03-15", "expense", "list", "--period", "monthly", "--limit", "2"]);
    let (_, list) = m.subcommand().unwrap();
    let rows = records::query_rows(&conn, RecordKind::Expense, list).unwrap();
    let amounts: Vec<&str> = rows.iter().map(|r| r.amount.as_str()).collect();
    assert_eq!(amounts, vec!["30.00", "20.00"]);
    assert_eq!(rows[0].category, "Shopping");
}

#[test]
fn negative_expense_is_refused() {
    let conn = setup();
    let m = leaf(&["expense", "add", "--amount=-5", "--category", "Shopping"]);
    assert!(records::handle(&conn, RecordKind::Expense, &m).is_err());
}

#[test]
fn bill_pay_rolls_recurring_bill_forward() {
    let mut conn = setup();
    let m = leaf(&["bill", "add", "--name", "Rent", "--amount", "1500", "--due", "2025-04-01", "--frequency", "monthly"]);
    bills::handle(&mut conn, &m).unwrap();
    let m = leaf(&["bill", "pay", "--id", "1"]);
    bills::handle(&mut conn, &m).unwrap();

    let all = conn.list_bill_reminders(1).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].status, BillStatus::Paid);
    assert_eq!(all[1].status, BillStatus::Pending);
    assert_eq!(all[1].due_date, at("2025-05-01 00:00:00"));

    let m = leaf(&["--as-of", "2025-05-03", "bill", "sweep"]);
    bills::handle(&mut conn, &m).unwrap();
    assert_eq!(conn.list_bill_reminders(1).unwrap()[1].status, BillStatus::Overdue);
}

#[test]
fn goal_add_and_contribute() {
    let conn = setup();
    let m = leaf(&["goal", "add", "--name", "House", "--target", "15000", "--current", "8500", "--target-date", "2025-12-31"]);
    goals::handle(&conn, &m).unwrap();
    let m = leaf(&["goal", "contribute", "--name", "House", "--amount", "-500"]);
    goals::handle(&conn, &m).unwrap();
    assert_eq!(conn.list_goals(1).unwrap()[0].current_amount, d("8000"));

    let m = leaf(&["goal", "add", "--name", "Broken", "--target", "0"]);
    assert!(goals::handle(&conn, &m).is_err());
}

#[test]
fn settings_round_trip_through_config() {
    let conn = setup();
    let m = leaf(&["config", "set", "--key", "week_start", "--value", "sun"]);
    settings::handle(&conn, &m).unwrap();
    Config::set(&conn, "due_soon_days", "14").unwrap();

    let cfg = Config::load(&conn).unwrap();
    assert_eq!(cfg.week_start, Weekday::Sun);
    assert_eq!(cfg.due_soon_days, 14);
    assert_eq!(cfg.get("alert_threshold").unwrap(), "80");

    assert!(Config::set(&conn, "alert_threshold", "150").is_err());
    assert!(Config::set(&conn, "due_soon_days", "soon").is_err());
    assert!(Config::set(&conn, "colour", "blue").is_err());
}

#[test]
fn unknown_workspace_is_an_error() {
    let conn = setup();
    let m = leaf(&["-w", "Business", "budget", "list"]);
    assert!(budgets::handle(&conn, &m).is_err());
}

#[test]
fn doctor_flags_bad_rows() {
    let conn = setup();
    conn.execute(
        "INSERT INTO expenses(workspace_id, category_id, amount, occurred_at) VALUES (1, 1, 'abc', '2025-03-01 00:00:00')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO budgets(workspace_id, category_id, amount_limit, period, start_date) VALUES (1, 1, '0', 'monthly', '2025-01-01 00:00:00')",
        [],
    )
    .unwrap();
    let salary: i64 = conn
        .query_row(
            "SELECT id FROM categories WHERE workspace_id=1 AND kind='income' AND name='Salary'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    conn.execute(
        "INSERT INTO budgets(workspace_id, category_id, amount_limit, period, start_date) VALUES (1, ?1, '10', 'monthly', '2025-01-01 00:00:00')",
        params![salary],
    )
    .unwrap();

    let issues = doctor::diagnose(&conn, at("2025-03-10 00:00:00")).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert!(kinds.contains(&"bad_amount"));
    assert!(kinds.contains(&"invalid_budget"));
    assert!(kinds.contains(&"budget_on_income"));
}

#[test]
fn doctor_reports_unreadable_rows_and_keeps_going() {
    let conn = setup();
    for (limit, period) in [("abc", "monthly"), ("0", "weekly")] {
        conn.execute(
            "INSERT INTO budgets(workspace_id, category_id, amount_limit, period, start_date) VALUES (1, 1, ?1, ?2, '2025-01-01 00:00:00')",
            params![limit, period],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO savings_goals(workspace_id, name, target_amount, current_amount) VALUES (1, 'Trip', 'lots', '0')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO bill_reminders(workspace_id, name, amount, due_date, frequency, status) VALUES (1, 'Gym', '??', '2025-03-01 00:00:00', 'monthly', 'pending')",
        [],
    )
    .unwrap();
    assert!(conn.list_budgets(1).is_err());

    let issues = doctor::diagnose(&conn, at("2025-03-10 00:00:00")).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert!(kinds.contains(&"bad_budget_row"));
    assert!(kinds.contains(&"invalid_budget"));
    assert!(kinds.contains(&"bad_goal_row"));
    assert!(kinds.contains(&"bad_bill_row"));
}

#[test]
fn cashflow_count_is_bounded() {
    let too_many = cli::build_cli().try_get_matches_from([
        "moneynest", "report", "cashflow", "--count", "18446744073709551615",
    ]);
    assert!(too_many.is_err());
    let zero = cli::build_cli().try_get_matches_from(["moneynest", "report", "cashflow", "--count", "0"]);
    assert!(zero.is_err());
    let m = leaf(&["report", "cashflow", "--count", "12"]);
    let (_, cf) = m.subcommand().unwrap();
    assert_eq!(cf.get_one::<usize>("count"), Some(&12));
}

#[test]
fn bill_list_runs_on_loaded_bills() {
    let mut conn = setup();
    let m = leaf(&["bill", "add", "--name", "Rent", "--amount", "1500", "--due", "2025-04-01"]);
    bills::handle(&mut conn, &m).unwrap();
    let m = leaf(&["--as-of", "2025-03-28", "bill", "list"]);
    bills::handle(&mut conn, &m).unwrap();
}
