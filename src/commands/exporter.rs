// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::store::EntityStore;
use anyhow::Result;

pub fn handle<S: EntityStore>(ledger: &Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    let backup = ledger.export();
    let out = match m.get_one::<String>("out") {
        Some(path) => path.clone(),
        None => format!(
            "credtrack_backup_{}.json",
            backup.export_date.format("%Y-%m-%d")
        ),
    };
    std::fs::write(&out, serde_json::to_string_pretty(&backup)?)?;
    println!(
        "Exported {} categories and {} spends to {}",
        backup.categories.len(),
        backup.spends.len(),
        out
    );
    Ok(())
}
