// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn req(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

pub fn build_cli() -> Command {
    Command::new("budgetbook")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Household budgeting: expenses, recurring bills, monthly income and carry-over")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .help("Email of the acting user (defaults to `user use`)"),
        )
        .arg(
            Arg::new("as")
                .long("as")
                .global(true)
                .help("Act on another user's data (admin only)"),
        )
        .subcommand(Command::new("init").about("Create the database if missing"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .arg(req("email", "Login email"))
                        .arg(opt("first-name", "First name"))
                        .arg(opt("last-name", "Last name"))
                        .arg(
                            Arg::new("admin")
                                .long("admin")
                                .action(ArgAction::SetTrue)
                                .help("Grant admin capability"),
                        ),
                )
                .subcommand(Command::new("use").arg(req("email", "Email to act as by default")))
                .subcommand(Command::new("whoami")),
        )
        .subcommand(
            Command::new("category")
                .about("Manage expense categories")
                .subcommand(Command::new("add").arg(req("name", "Category name")))
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(req("name", "Category name"))),
        )
        .subcommand(
            Command::new("expense")
                .about("Record and list expenses")
                .subcommand(
                    Command::new("add")
                        .arg(req("amount", "Positive amount"))
                        .arg(req("category", "Existing category name"))
                        .arg(opt("date", "Accrual date YYYY-MM-DD (default: today)"))
                        .arg(opt("description", "Free text")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(opt("month", "Only this month (YYYY-MM)"))
                        .arg(opt("category", "Only this category"))
                        .arg(opt("search", "Case-insensitive regex over descriptions"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .help("Maximum rows"),
                        ),
                ))
                .subcommand(Command::new("rm").arg(req("id", "Expense id"))),
        )
        .subcommand(
            Command::new("recurring")
                .about("Manage monthly recurring expenses")
                .subcommand(
                    Command::new("add")
                        .arg(req("name", "Name shown on projected expenses"))
                        .arg(req("amount", "Positive amount"))
                        .arg(req("category", "Existing category name"))
                        .arg(
                            Arg::new("day")
                                .long("day")
                                .required(true)
                                .value_parser(value_parser!(u32))
                                .help("Day of month 1-31, clamped to short months"),
                        ),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(req("id", "Recurring expense id"))),
        )
        .subcommand(
            Command::new("income")
                .about("Default and per-month income")
                .subcommand(
                    Command::new("set")
                        .arg(req("amount", "Non-negative amount; 0 for a month removes the override"))
                        .arg(opt("month", "Month override YYYY-MM (omit for the default)")),
                )
                .subcommand(Command::new("clear").arg(req("month", "Month override to remove")))
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("summary")
                .about("Monthly and yearly budget views")
                .subcommand(json_flags(
                    Command::new("month")
                        .arg(opt("month", "Month YYYY-MM (default: current)"))
                        .arg(opt("today", "Reference date YYYY-MM-DD (default: today)")),
                ))
                .subcommand(json_flags(
                    Command::new("year").arg(opt("year", "Calendar year (default: current)")),
                )),
        )
        .subcommand(
            Command::new("admin")
                .about("Admin-only user management")
                .subcommand(json_flags(Command::new("users")))
                .subcommand(json_flags(Command::new("show").arg(req("email", "User email"))))
                .subcommand(Command::new("rm").arg(req("email", "User email"))),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("expenses")
                        .arg(req("format", "csv|json"))
                        .arg(req("out", "Output file"))
                        .arg(opt("month", "Only this month (YYYY-MM)")),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("expenses")
                        .arg(req("path", "CSV with date,amount,category,description")),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Display settings")
                .subcommand(Command::new("show"))
                .subcommand(Command::new("currency").arg(req("code", "Currency label, e.g. EUR"))),
        )
        .subcommand(Command::new("doctor").about("Check data consistency"))
}
