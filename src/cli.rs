// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .short('u')
        .required(true)
        .help("Email of the user acting")
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("filter")
            .long("filter")
            .short('f')
            .help("day|week|month|year|none; overrides --start/--end"),
    )
    .arg(
        Arg::new("start")
            .long("start")
            .help("Inclusive start: YYYY-MM-DD or RFC 3339"),
    )
    .arg(
        Arg::new("end")
            .long("end")
            .help("Inclusive end: YYYY-MM-DD or RFC 3339"),
    )
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn type_arg(required: bool) -> Arg {
    Arg::new("type")
        .long("type")
        .short('t')
        .required(required)
        .help("Income or Expense")
}

pub fn build_cli() -> Command {
    Command::new("finsight")
        .version(crate_version!())
        .about("Track income and expenses, see where the money goes")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("Path to the SQLite database (overrides FINSIGHT_DB)"),
        )
        .subcommand(Command::new("init").about("Create the database and default categories"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(type_arg(true)),
                )
                .subcommand(Command::new("list").arg(type_arg(false)))
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(type_arg(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and list transactions")
                .subcommand(
                    Command::new("add")
                        .arg(user_arg())
                        .arg(type_arg(true))
                        .arg(Arg::new("category").long("category").short('c').required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .short('a')
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .short('d')
                                .help("YYYY-MM-DD or RFC 3339; defaults to now"),
                        )
                        .arg(Arg::new("note").long("note").short('n')),
                )
                .subcommand(json_flags(period_args(
                    Command::new("list").arg(user_arg()).arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize)),
                    ),
                )))
                .subcommand(
                    Command::new("rm").arg(user_arg()).arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(json_flags(period_args(
            Command::new("dashboard")
                .about("Totals, category breakdown, trend and recent transactions")
                .arg(user_arg()),
        )))
        .subcommand(
            Command::new("export")
                .about("Write reports to files")
                .subcommand(period_args(
                    Command::new("report")
                        .arg(user_arg())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .required(true)
                                .help("csv|json|html"),
                        )
                        .arg(Arg::new("out").long("out").short('o').required(true)),
                )),
        )
}
