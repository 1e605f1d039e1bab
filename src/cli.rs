// Copyright (c) AlphaVelocity.
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
    Command::new("credtrack")
        .about("Credit-card spend tracking, EMI recurrence, and billing-cycle settlement")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(
            Command::new("category")
                .about("Manage billing categories (cards/accounts)")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("color").long("color").default_value("#6366f1"))
                        .arg(
                            Arg::new("next-bill-date")
                                .long("next-bill-date")
                                .help("Next statement date, YYYY-MM-DD"),
                        )
                        .arg(Arg::new("icon").long("icon"))
                        .arg(Arg::new("group").long("group"))
                        .arg(Arg::new("card-number").long("card-number")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List categories with balances"),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit a category")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("rename").long("rename"))
                        .arg(Arg::new("color").long("color"))
                        .arg(Arg::new("next-bill-date").long("next-bill-date"))
                        .arg(
                            Arg::new("clear-bill-date")
                                .long("clear-bill-date")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("next-bill-date"),
                        )
                        .arg(Arg::new("icon").long("icon"))
                        .arg(Arg::new("group").long("group"))
                        .arg(Arg::new("card-number").long("card-number")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a category (its spends are kept)")
                        .arg(Arg::new("name").long("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("spend")
                .about("Manage spend records")
                .subcommand(
                    Command::new("add")
                        .about("Record a spend")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("subcategory").long("subcategory"))
                        .arg(
                            Arg::new("recurring")
                                .long("recurring")
                                .action(ArgAction::SetTrue)
                                .help("Recurring charge (EMI)"),
                        )
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .value_parser(["monthly", "yearly"])
                                .default_value("monthly"),
                        )
                        .arg(Arg::new("due-date").long("due-date"))
                        .arg(
                            Arg::new("emi-end-date")
                                .long("emi-end-date")
                                .requires("recurring"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List spends")
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("unpaid")
                                .long("unpaid")
                                .action(ArgAction::SetTrue)
                                .help("Only unpaid spends"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("pay")
                        .about("Mark one spend paid (recurring spends roll forward)")
                        .arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(
                    Command::new("unpay")
                        .about("Mark one spend unpaid (does not retract a generated occurrence)")
                        .arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a spend")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("settle")
                .about("Settle a category's unpaid spends, oldest first")
                .arg(Arg::new("category").long("category").required(true))
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .help("Custom payment amount; omit to pay the full outstanding balance"),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Derived views")
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Spent and pending totals for a month")
                        .arg(Arg::new("month").long("month").help("YYYY-MM, default current")),
                ))
                .subcommand(json_flags(
                    Command::new("history")
                        .about("Monthly totals for the trailing months")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(u32))
                                .default_value("6"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("breakdown")
                        .about("Spending by category")
                        .arg(Arg::new("month").long("month").help("Restrict to YYYY-MM"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Break one category down by subcategory"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("upcoming")
                        .about("Bills and EMIs due soon")
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .value_parser(value_parser!(u64))
                                .default_value("7"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("balances").about("Net and pending balance per category"),
                )),
        )
        .subcommand(
            Command::new("import")
                .about("Replace all data from a backup file")
                .arg(Arg::new("path").long("path").required(true)),
        )
        .subcommand(
            Command::new("export")
                .about("Write a backup file")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .help("Output path, default credtrack_backup_<date>.json"),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the data for inconsistencies"))
}
