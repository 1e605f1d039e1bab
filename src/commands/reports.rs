// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::store::EntityStore;
use crate::utils::{fmt_amount, id_for_category, maybe_print_json, month_key, parse_month, pretty_table};
use crate::views;
use anyhow::Result;

pub fn handle<S: EntityStore>(ledger: &Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(ledger, sub)?,
        Some(("history", sub)) => history(ledger, sub)?,
        Some(("breakdown", sub)) => breakdown(ledger, sub)?,
        Some(("upcoming", sub)) => upcoming(ledger, sub)?,
        Some(("balances", sub)) => balances(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary<S: EntityStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = match sub.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => month_key(chrono::Utc::now().date_naive()),
    };
    let data = views::monthly_summary(ledger.spends(), &month);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &["Month", "Spent", "Pending"],
                vec![vec![month, fmt_amount(&data.spent), fmt_amount(&data.pending)]],
            )
        );
    }
    Ok(())
}

fn history<S: EntityStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: u32 = *sub.get_one::<u32>("months").unwrap();
    let today = chrono::Utc::now().date_naive();
    let data = views::monthly_history(ledger.spends(), today, months);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|(month, total)| vec![month, fmt_amount(&total)])
            .collect();
        println!("{}", pretty_table(&["Month", "Total"], rows));
    }
    Ok(())
}

fn breakdown<S: EntityStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;

    if let Some(name) = sub.get_one::<String>("category") {
        let category_id = id_for_category(ledger, name)?;
        let data = views::subcategory_breakdown(ledger.spends(), category_id);
        if !maybe_print_json(json_flag, jsonl_flag, &data)? {
            let rows = data
                .into_iter()
                .map(|(bucket, total)| vec![bucket, fmt_amount(&total)])
                .collect();
            println!("{}", pretty_table(&["Subcategory", "Total"], rows));
        }
        return Ok(());
    }

    let data = views::category_breakdown(ledger.categories(), ledger.spends(), month.as_deref());
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|e| vec![e.name.clone(), fmt_amount(&e.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Total"], rows));
    }
    Ok(())
}

fn upcoming<S: EntityStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let days: u64 = *sub.get_one::<u64>("days").unwrap();
    let today = chrono::Utc::now().date_naive();
    let data = views::upcoming(ledger.categories(), ledger.spends(), today, days);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|item| {
                let left = (item.date - today).num_days();
                vec![
                    match item.kind {
                        views::UpcomingKind::Bill => "bill",
                        views::UpcomingKind::Emi => "EMI",
                    }
                    .to_string(),
                    item.name.clone(),
                    item.date.to_string(),
                    if left == 0 {
                        "today".to_string()
                    } else {
                        format!("{}d", left)
                    },
                    item.amount.map(|a| fmt_amount(&a)).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Kind", "Name", "Due", "In", "Amount"], rows)
        );
    }
    Ok(())
}

fn balances<S: EntityStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = super::categories::list_rows(ledger);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .iter()
            .map(|r| vec![r.name.clone(), r.net.clone(), r.pending.clone()])
            .collect();
        println!("{}", pretty_table(&["Category", "Net", "Pending"], rows));
    }
    Ok(())
}
