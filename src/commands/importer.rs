// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::store::EntityStore;
use anyhow::{Context, Result};

pub fn handle<S: EntityStore>(ledger: &mut Ledger<S>, m: &clap::ArgMatches) -> Result<()> {
    let path = m.get_one::<String>("path").unwrap().trim();
    let raw = std::fs::read_to_string(path).with_context(|| format!("Open backup {}", path))?;
    let doc: serde_json::Value =
        serde_json::from_str(&raw).context("Failed to parse backup file")?;
    let (categories, spends) = ledger.import(&doc)?;
    println!(
        "Imported {} categories and {} spends from {}",
        categories, spends, path
    );
    Ok(())
}
