// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{CategoryPatch, Ledger, NewCategory};
use crate::store::EntityStore;
use crate::utils::{fmt_amount, id_for_category, maybe_print_json, parse_date, pretty_table};
use crate::views;
use anyhow::Result;
use serde::Serialize;

pub fn handle<S: EntityStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("edit", sub)) => edit(ledger, sub)?,
        Some(("rm", sub)) => rm(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<S: EntityStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let color = sub.get_one::<String>("color").unwrap().to_string();
    let next_bill_date = sub
        .get_one::<String>("next-bill-date")
        .map(|s| parse_date(s))
        .transpose()?;
    ledger.add_category(NewCategory {
        name: name.clone(),
        color,
        group: sub.get_one::<String>("group").cloned(),
        card_number: sub.get_one::<String>("card-number").cloned(),
        next_bill_date,
        icon: sub.get_one::<String>("icon").cloned(),
    })?;
    println!("Added category '{}'", name);
    Ok(())
}

#[derive(Serialize)]
pub struct CategoryRow {
    pub name: String,
    pub group: String,
    pub next_bill_date: String,
    pub net: String,
    pub pending: String,
}

pub fn list_rows<S: EntityStore>(ledger: &Ledger<S>) -> Vec<CategoryRow> {
    ledger
        .categories()
        .iter()
        .map(|c| CategoryRow {
            name: c.name.clone(),
            group: c.group.clone().unwrap_or_default(),
            next_bill_date: c
                .next_bill_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            net: fmt_amount(&views::net_balance(ledger.spends(), c.id)),
            pending: fmt_amount(&views::pending_balance(ledger.spends(), c.id)),
        })
        .collect()
}

fn list<S: EntityStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = list_rows(ledger);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.name.clone(),
                    r.group.clone(),
                    r.next_bill_date.clone(),
                    r.net.clone(),
                    r.pending.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Group", "Next Bill", "Net", "Pending"], rows)
        );
    }
    Ok(())
}

fn edit<S: EntityStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let id = id_for_category(ledger, name)?;

    let next_bill_date = if sub.get_flag("clear-bill-date") {
        Some(None)
    } else {
        sub.get_one::<String>("next-bill-date")
            .map(|s| parse_date(s).map(Some))
            .transpose()?
    };

    ledger.update_category(
        id,
        CategoryPatch {
            name: sub.get_one::<String>("rename").cloned(),
            color: sub.get_one::<String>("color").cloned(),
            group: sub.get_one::<String>("group").cloned(),
            card_number: sub.get_one::<String>("card-number").cloned(),
            next_bill_date,
            icon: sub.get_one::<String>("icon").cloned(),
        },
    )?;
    println!("Updated category '{}'", name);
    Ok(())
}

fn rm<S: EntityStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let id = id_for_category(ledger, name)?;
    ledger.delete_category(id)?;
    println!("Removed category '{}' (spends kept)", name);
    Ok(())
}
