// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    ]
}

fn req(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn period_arg() -> Arg {
    Arg::new("period")
        .long("period")
        .default_value("monthly")
        .help("monthly | quarterly | yearly")
}

pub fn build_cli() -> Command {
    Command::new("budgetplanner")
        .version(clap::crate_version!())
        .about("Personal budgeting: recurring items, period budgets and salary-aware forecasts")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("BUDGETPLANNER_DB")
                .help("SQLite database file (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .value_parser(value_parser!(i64))
                .help("Act on this user id instead of the active user"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging on stderr"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("config")
                .about("Runtime settings")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("user")
                .about("Users and the active user")
                .subcommand(
                    Command::new("add")
                        .arg(req("first", "First name"))
                        .arg(opt("last", "Last name"))
                        .arg(req("income", "Monthly income"))
                        .arg(
                            req("hours", "Monthly work hours")
                                .value_parser(value_parser!(i32)),
                        ),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("activate")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                )
                .subcommand(
                    Command::new("pay")
                        .about("Update monthly income and work hours")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(req("income", "Monthly income"))
                        .arg(
                            req("hours", "Monthly work hours")
                                .value_parser(value_parser!(i32)),
                        ),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Categories")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Category name"))
                        .arg(req("type", "income | expense | savings")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(opt("type", "Only this type"))
                        .args(json_args()),
                )
                .subcommand(Command::new("rm").arg(req("name", "Category name")))
                .subcommand(
                    Command::new("retype")
                        .arg(req("name", "Category name"))
                        .arg(req("type", "income | expense | savings")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(req("date", "YYYY-MM-DD"))
                        .arg(req("type", "income | expense | savings"))
                        .arg(req("amount", "Amount (> 0)"))
                        .arg(req("category", "Category name"))
                        .arg(
                            opt("recurrence", "once | monthly | yearly").default_value("once"),
                        )
                        .arg(opt("until", "Monthly: last month, YYYY-MM"))
                        .arg(
                            opt("yearly-month", "Yearly: month paid, defaults to the date's")
                                .value_parser(value_parser!(u32)),
                        )
                        .arg(
                            opt("until-year", "Yearly: last year")
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(opt("note", "Free text"))
                        .arg(opt(
                            "deduct",
                            "Charge against the monthly | quarterly | yearly plan",
                        )),
                )
                .subcommand(
                    Command::new("list")
                        .arg(opt("month", "YYYY-MM"))
                        .arg(opt("type", "income | expense | savings"))
                        .arg(opt("limit", "Max rows").value_parser(value_parser!(usize)))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("absence")
                .about("Sick leave and parental care")
                .subcommand(
                    Command::new("add")
                        .arg(req("start", "YYYY-MM-DD"))
                        .arg(opt("end", "YYYY-MM-DD, defaults to start"))
                        .arg(req("hours", "Hours absent").value_parser(value_parser!(i32)))
                        .arg(opt("kind", "sick | parental-care").default_value("sick")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Category budgets")
                .subcommand(
                    Command::new("set")
                        .arg(period_arg())
                        .arg(req("month", "Any month inside the period, YYYY-MM"))
                        .arg(req("category", "Category name"))
                        .arg(req("amount", "Budget for the whole period; 0 clears")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(opt("category", "Only this category"))
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("progress")
                        .arg(period_arg())
                        .arg(opt("date", "YYYY-MM-DD inside the period, defaults to today"))
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Income plan and allocations")
                .subcommand(
                    Command::new("income")
                        .arg(req("month", "YYYY-MM"))
                        .arg(
                            Arg::new("line")
                                .long("line")
                                .action(ArgAction::Append)
                                .help("CATEGORY=AMOUNT[@YYYY-MM], repeatable"),
                        )
                        .arg(opt("monthly", "Monthly allocation").default_value("0"))
                        .arg(opt("quarterly", "Quarterly allocation").default_value("0"))
                        .arg(opt("yearly", "Yearly allocation").default_value("0")),
                )
                .subcommand(Command::new("show").args(json_args())),
        )
        .subcommand(
            Command::new("savings")
                .about("Savings deposits and withdrawals")
                .subcommand(
                    Command::new("deposit")
                        .arg(req("category", "Savings category"))
                        .arg(req("amount", "Amount (> 0)"))
                        .arg(opt("date", "YYYY-MM-DD, defaults to today")),
                )
                .subcommand(
                    Command::new("withdraw")
                        .arg(req("category", "Savings category"))
                        .arg(req("income-category", "Income category to credit"))
                        .arg(req("amount", "Amount (> 0)"))
                        .arg(opt("date", "YYYY-MM-DD, defaults to today")),
                )
                .subcommand(
                    Command::new("summary")
                        .arg(opt("date", "Reference day, defaults to today"))
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("forecast")
                .about("Monthly forecast including absence pay impact")
                .arg(req("month", "YYYY-MM"))
                .args(json_args()),
        )
        .subcommand(
            Command::new("balance")
                .about("All-time income minus expenses")
                .args(json_args()),
        )
        .subcommand(
            Command::new("month")
                .about("Month close")
                .subcommand(Command::new("close").arg(req("month", "YYYY-MM")))
                .subcommand(Command::new("status").arg(req("month", "YYYY-MM"))),
        )
}
