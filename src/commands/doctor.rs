// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use crate::ledger::Ledger;
use crate::store::EntityStore;
use crate::utils::pretty_table;
use anyhow::Result;
use uuid::Uuid;

pub fn handle<S: EntityStore>(ledger: &Ledger<S>) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Spends pointing at a deleted category
    let known: HashSet<Uuid> = ledger.categories().iter().map(|c| c.id).collect();
    for spend in ledger.spends() {
        if !known.contains(&spend.category_id) {
            rows.push(vec![
                "orphaned_spend".into(),
                format!("{} '{}'", spend.id, spend.description),
            ]);
        }
    }

    // 2) Paid flag out of sync with the paid date (possible via import)
    for spend in ledger.spends() {
        if spend.is_paid != spend.paid_date.is_some() {
            rows.push(vec![
                "paid_date_mismatch".into(),
                format!("{} '{}'", spend.id, spend.description),
            ]);
        }
    }

    // 3) EMIs that ended before they started
    for spend in ledger.spends() {
        if spend.is_recurring {
            if let Some(end) = spend.emi_end_date {
                if end < spend.date {
                    rows.push(vec![
                        "emi_ends_before_start".into(),
                        format!("{} '{}'", spend.id, spend.description),
                    ]);
                }
            }
        }
    }

    // 4) Duplicate ids (import does not enforce uniqueness)
    let mut seen: HashSet<Uuid> = HashSet::new();
    for spend in ledger.spends() {
        if !seen.insert(spend.id) {
            rows.push(vec!["duplicate_spend_id".into(), spend.id.to_string()]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
