// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{Ledger, NewSpend};
use crate::models::RecurringFrequency;
use crate::store::EntityStore;
use crate::utils::{
    fmt_amount, id_for_category, maybe_print_json, month_key, parse_date, parse_decimal, parse_id,
    parse_month, pretty_table,
};
use anyhow::Result;
use serde::Serialize;

pub fn handle<S: EntityStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("pay", sub)) => set_paid(ledger, sub, true)?,
        Some(("unpay", sub)) => set_paid(ledger, sub, false)?,
        Some(("rm", sub)) => rm(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<S: EntityStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap().to_string();
    let category_name = sub.get_one::<String>("category").unwrap();
    let category_id = id_for_category(ledger, category_name)?;
    let is_recurring = sub.get_flag("recurring");
    let recurring_frequency = if is_recurring {
        match sub.get_one::<String>("frequency").map(|s| s.as_str()) {
            Some("yearly") => Some(RecurringFrequency::Yearly),
            _ => Some(RecurringFrequency::Monthly),
        }
    } else {
        None
    };
    let due_date = sub
        .get_one::<String>("due-date")
        .map(|s| parse_date(s))
        .transpose()?;
    let emi_end_date = sub
        .get_one::<String>("emi-end-date")
        .map(|s| parse_date(s))
        .transpose()?;

    let id = ledger.add_spend(NewSpend {
        amount,
        description: description.clone(),
        date,
        category_id,
        subcategory: sub.get_one::<String>("subcategory").cloned(),
        is_recurring,
        recurring_frequency,
        due_date,
        emi_end_date,
    })?;
    println!(
        "Recorded {} on {} '{}' (cat: {}, id: {})",
        amount, date, description, category_name, id
    );
    Ok(())
}

#[derive(Serialize)]
pub struct SpendRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
    pub subcategory: String,
    pub paid: bool,
    pub recurring: bool,
    pub due_date: String,
}

pub fn query_rows<S: EntityStore>(
    ledger: &Ledger<S>,
    sub: &clap::ArgMatches,
) -> Result<Vec<SpendRow>> {
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;
    let category_id = sub
        .get_one::<String>("category")
        .map(|name| id_for_category(ledger, name))
        .transpose()?;
    let unpaid_only = sub.get_flag("unpaid");

    let mut spends: Vec<_> = ledger
        .spends()
        .iter()
        .filter(|s| month.as_deref().is_none_or(|m| month_key(s.date) == m))
        .filter(|s| category_id.is_none_or(|id| s.category_id == id))
        .filter(|s| !unpaid_only || !s.is_paid)
        .collect();
    spends.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.created_at.cmp(&a.created_at)));
    if let Some(&limit) = sub.get_one::<usize>("limit") {
        spends.truncate(limit);
    }

    Ok(spends
        .into_iter()
        .map(|s| SpendRow {
            id: s.id.to_string(),
            date: s.date.to_string(),
            description: s.description.clone(),
            amount: fmt_amount(&s.amount),
            category: ledger
                .category(s.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| crate::views::UNKNOWN_CATEGORY.to_string()),
            subcategory: s.subcategory.clone().unwrap_or_default(),
            paid: s.is_paid,
            recurring: s.is_recurring,
            due_date: s.due_date.map(|d| d.to_string()).unwrap_or_default(),
        })
        .collect())
}

fn list<S: EntityStore>(ledger: &Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.subcategory.clone(),
                    if r.paid { "paid" } else { "due" }.to_string(),
                    if r.recurring { "EMI" } else { "" }.to_string(),
                    r.due_date.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Description", "Amount", "Category", "Sub", "Status", "Rec", "Due"],
                rows,
            )
        );
    }
    Ok(())
}

fn set_paid<S: EntityStore>(
    ledger: &mut Ledger<S>,
    sub: &clap::ArgMatches,
    paid: bool,
) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    let outcome = ledger.set_spend_paid(id, paid)?;
    if !outcome.changed {
        println!("No change");
        return Ok(());
    }
    println!("Marked spend {}", if paid { "paid" } else { "unpaid" });
    if outcome.generated {
        println!("Generated next occurrence");
    }
    if outcome.bill_date_advanced {
        println!("Next bill date advanced by one month");
    }
    Ok(())
}

fn rm<S: EntityStore>(ledger: &mut Ledger<S>, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(sub.get_one::<String>("id").unwrap())?;
    if ledger.delete_spend(id)? {
        println!("Deleted spend {}", id);
    } else {
        println!("No spend with id {}", id);
    }
    Ok(())
}
