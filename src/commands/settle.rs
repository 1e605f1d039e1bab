// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::store::EntityStore;
use crate::utils::{fmt_amount, id_for_category, parse_decimal};
use anyhow::{Result, bail};
use rust_decimal::Decimal;

pub fn handle<S: EntityStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    let name = m.get_one::<String>("category").unwrap();
    let category_id = id_for_category(ledger, name)?;
    let paid_amount = m
        .get_one::<String>("amount")
        .map(|s| parse_decimal(s))
        .transpose()?;
    if let Some(amount) = paid_amount {
        if amount < Decimal::ZERO {
            bail!("Payment amount must be non-negative, got {}", amount);
        }
    }

    let outcome = ledger.mark_all_paid(category_id, paid_amount)?;
    if outcome.paid == 0 && outcome.adjustment.is_none() {
        println!("Nothing to settle for '{}'", name);
        return Ok(());
    }
    println!("Settled {} spend(s) for '{}'", outcome.paid, name);
    if outcome.generated > 0 {
        println!("Generated {} next occurrence(s)", outcome.generated);
    }
    if let Some(adjustment) = outcome.adjustment {
        println!("Booked adjustment of {}", fmt_amount(&adjustment));
    }
    if outcome.bill_date_advanced {
        println!("Next bill date advanced by one month");
    }
    Ok(())
}
