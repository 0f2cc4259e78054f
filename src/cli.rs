// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("smartbudget")
        .about("40/30/20/10 budgeting over classified transactions")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the state directory"))
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(
                    Command::new("add")
                        .about("Add one transaction, free text or explicit fields")
                        .arg(Arg::new("text").help("Free text routed through the classifier"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("month").long("month"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete one transaction (no-op when absent)")
                        .arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(
                    Command::new("set-category")
                        .about("Reassign a transaction's category")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("category").long("category").required(true)),
                ),
        )
        .subcommand(
            Command::new("import").about("Bulk import").subcommand(
                Command::new("statement")
                    .about("Import one bank statement through the classifier")
                    .arg(Arg::new("path").long("path").required(true))
                    .arg(
                        Arg::new("pre-parsed")
                            .long("pre-parsed")
                            .action(ArgAction::SetTrue)
                            .help("Treat the file as an already-produced classifier response"),
                    ),
            ),
        )
        .subcommand(
            Command::new("document")
                .about("Imported statements")
                .subcommand(json_flags(Command::new("list").about("List imported documents")))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a document and every transaction it owns")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .action(ArgAction::SetTrue)
                                .help("Confirm the cascading delete"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("balances").about("Balance sheet of imported accounts"),
                )),
        )
        .subcommand(
            Command::new("budget").about("Budget targets").subcommand(json_flags(
                Command::new("report")
                    .about("Spend vs 40/30/20/10 target per category")
                    .arg(Arg::new("month").long("month").help("YYYY-MM, default latest")),
            )),
        )
        .subcommand(
            Command::new("report")
                .about("Derived views")
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .about("Monthly income/expense buckets with cumulative savings")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("annual")
                        .about("Year roll-up")
                        .arg(Arg::new("year").long("year").required(true)),
                ))
                .subcommand(json_flags(
                    Command::new("breakdown")
                        .about("Per-description totals within one category")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("month").long("month"))
                        .arg(
                            Arg::new("top")
                                .long("top")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("rules")
                .about("Local classification rules")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("pattern").long("pattern").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("rewrite").long("rewrite")),
                )
                .subcommand(Command::new("list"))
                .subcommand(Command::new("rm").arg(Arg::new("id").long("id").required(true))),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(Arg::new("format").long("format").default_value("csv"))
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("income")
                .about("Nominal monthly income fallback")
                .subcommand(Command::new("set").arg(Arg::new("amount").long("amount").required(true)))
                .subcommand(Command::new("show")),
        )
        .subcommand(Command::new("doctor").about("Consistency scan over the stored state"))
}
