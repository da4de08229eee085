// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::builder::RangedU64ValueParser;
use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn period_arg(default: &'static str) -> Arg {
    Arg::new("period")
        .long("period")
        .default_value(default)
        .help("daily|weekly|monthly|quarterly|yearly")
}

fn req(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn records_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .subcommand(
            Command::new("add")
                .about("Record an entry")
                .arg(req("amount", "Amount, never negative"))
                .arg(req("category", "Category name"))
                .arg(opt("date", "YYYY-MM-DD[ HH:MM[:SS]], defaults to now"))
                .arg(opt("note", "Free-form description")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List entries")
                .arg(opt("period", "Only the current daily|weekly|monthly|quarterly|yearly period"))
                .arg(opt("category", "Category name"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
}

pub fn build_cli() -> Command {
    Command::new("moneynest")
        .version(crate_version!())
        .about("Household finance tracking: spending, budgets, savings goals and bills")
        .arg(
            Arg::new("workspace")
                .short('w')
                .long("workspace")
                .global(true)
                .help("Workspace name (defaults to the default_workspace setting)"),
        )
        .arg(
            Arg::new("as-of")
                .long("as-of")
                .global(true)
                .help("Evaluate as of this date/time instead of now"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity"),
        )
        .subcommand(
            Command::new("init")
                .about("Create the database and the default workspace")
                .arg(opt("currency", "Currency of the default workspace")),
        )
        .subcommand(
            Command::new("workspace")
                .about("Manage workspaces")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Workspace name"))
                        .arg(Arg::new("currency").long("currency").default_value("USD")),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Category name"))
                        .arg(Arg::new("kind").long("kind").default_value("expense")),
                )
                .subcommand(Command::new("list").arg(opt("kind", "expense|income")))
                .subcommand(
                    Command::new("rm")
                        .arg(req("name", "Category name"))
                        .arg(Arg::new("kind").long("kind").default_value("expense")),
                ),
        )
        .subcommand(records_cmd("expense", "Log and list expenses"))
        .subcommand(records_cmd("income", "Log and list income"))
        .subcommand(
            Command::new("budget")
                .about("Spending limits per category")
                .subcommand(
                    Command::new("set")
                        .arg(req("category", "Expense category name"))
                        .arg(req("limit", "Spending limit, must be positive"))
                        .arg(period_arg("monthly"))
                        .arg(
                            Arg::new("threshold")
                                .long("threshold")
                                .value_parser(value_parser!(u8))
                                .help("Alert threshold percent (defaults to alert_threshold setting)"),
                        )
                        .arg(opt("start", "Start date, defaults to the start of the current period")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(Command::new("status"))),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Goal name"))
                        .arg(req("target", "Target amount, must be positive"))
                        .arg(Arg::new("current").long("current").default_value("0"))
                        .arg(opt("target-date", "YYYY-MM-DD"))
                        .arg(Arg::new("priority").long("priority").default_value("medium"))
                        .arg(opt("auto-amount", "Automatic contribution amount"))
                        .arg(opt("auto-frequency", "daily|weekly|monthly")),
                )
                .subcommand(
                    Command::new("contribute")
                        .arg(req("name", "Goal name"))
                        .arg(
                            req("amount", "Amount to add; negative withdraws")
                                .allow_hyphen_values(true),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(Command::new("status"))),
        )
        .subcommand(
            Command::new("bill")
                .about("Bill reminders")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Bill name"))
                        .arg(req("amount", "Amount due"))
                        .arg(req("due", "Due date YYYY-MM-DD"))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .default_value("monthly")
                                .help("once|weekly|monthly|quarterly|yearly"),
                        )
                        .arg(opt("category", "Expense category name"))
                        .arg(
                            Arg::new("remind-days")
                                .long("remind-days")
                                .value_parser(value_parser!(u32))
                                .default_value("1"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("pay").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(json_flags(
                    Command::new("due").about("Pending bills due soon").arg(
                        Arg::new("days")
                            .long("days")
                            .allow_hyphen_values(true)
                            .value_parser(value_parser!(i64))
                            .help("Look-ahead window (defaults to due_soon_days setting)"),
                    ),
                ))
                .subcommand(
                    Command::new("sweep").about("Mark pending bills past their due date as overdue"),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Derived figures")
                .subcommand(json_flags(
                    Command::new("period")
                        .about("Show the window of a period kind")
                        .arg(period_arg("monthly")),
                ))
                .subcommand(json_flags(
                    Command::new("totals")
                        .about("Income, expenses and savings rate for the current period")
                        .arg(period_arg("monthly")),
                ))
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .arg(period_arg("monthly"))
                        .arg(
                            Arg::new("count")
                                .long("count")
                                .value_parser(RangedU64ValueParser::<usize>::new().range(1..=600))
                                .default_value("6")
                                .help("Number of periods, 1-600"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("spend-by-category").arg(period_arg("monthly")),
                ))
                .subcommand(json_flags(Command::new("alerts"))),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("records")
                    .arg(Arg::new("kind").long("kind").default_value("expense"))
                    .arg(Arg::new("format").long("format").default_value("csv"))
                    .arg(req("out", "Output file"))
                    .arg(opt("period", "Only the current period of this kind"))
                    .arg(opt("category", "Category name"))
                    .arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
            ),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(Command::new("get").arg(req("key", "Setting name")))
                .subcommand(
                    Command::new("set")
                        .arg(req("key", "Setting name"))
                        .arg(req("value", "New value")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check stored data for problems"))
}
