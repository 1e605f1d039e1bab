// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashMap};

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Category, Spend};
use crate::utils::month_key;

pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Sum over all of a category's spends, paid and unpaid. Paid negative
/// adjustments reduce this naturally.
pub fn net_balance(spends: &[Spend], category_id: Uuid) -> Decimal {
    spends
        .iter()
        .filter(|s| s.category_id == category_id)
        .map(|s| s.amount)
        .sum()
}

pub fn pending_balance(spends: &[Spend], category_id: Uuid) -> Decimal {
    spends
        .iter()
        .filter(|s| s.category_id == category_id && !s.is_paid)
        .map(|s| s.amount)
        .sum()
}

#[derive(Debug, Default, Serialize)]
pub struct MonthlySummary {
    pub spent: Decimal,
    pub pending: Decimal,
}

/// Totals for spends dated in the given `YYYY-MM` month.
pub fn monthly_summary(spends: &[Spend], month: &str) -> MonthlySummary {
    let mut summary = MonthlySummary::default();
    for spend in spends {
        if month_key(spend.date) == month {
            summary.spent += spend.amount;
            if !spend.is_paid {
                summary.pending += spend.amount;
            }
        }
    }
    summary
}

/// Per-month totals for the trailing `months` calendar months ending at
/// `today`'s month, oldest first. Months without spends show as zero.
pub fn monthly_history(spends: &[Spend], today: NaiveDate, months: u32) -> Vec<(String, Decimal)> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for back in (0..months).rev() {
        if let Some(d) = today.checked_sub_months(Months::new(back)) {
            totals.insert(month_key(d), Decimal::ZERO);
        }
    }
    for spend in spends {
        if let Some(total) = totals.get_mut(&month_key(spend.date)) {
            *total += spend.amount;
        }
    }
    totals.into_iter().collect()
}

#[derive(Debug, Serialize)]
pub struct BreakdownEntry {
    pub category_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub total: Decimal,
}

/// Group spends by category and sum. Zero and negative totals are dropped,
/// the rest sorted descending. Dangling category ids keep their slice under
/// an "Unknown" label.
pub fn category_breakdown(
    categories: &[Category],
    spends: &[Spend],
    month: Option<&str>,
) -> Vec<BreakdownEntry> {
    let mut agg: HashMap<Uuid, Decimal> = HashMap::new();
    for spend in spends {
        if let Some(m) = month {
            if month_key(spend.date) != m {
                continue;
            }
        }
        *agg.entry(spend.category_id).or_insert(Decimal::ZERO) += spend.amount;
    }
    let mut entries: Vec<BreakdownEntry> = agg
        .into_iter()
        .filter(|(_, total)| *total > Decimal::ZERO)
        .map(|(category_id, total)| {
            let cat = categories.iter().find(|c| c.id == category_id);
            BreakdownEntry {
                category_id,
                name: cat
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
                color: cat.map(|c| c.color.clone()),
                total,
            }
        })
        .collect();
    entries.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    entries
}

/// Per-subcategory totals within one category; spends without a subcategory
/// land in an "Other" bucket. Same drop/sort rules as the category breakdown.
pub fn subcategory_breakdown(spends: &[Spend], category_id: Uuid) -> Vec<(String, Decimal)> {
    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for spend in spends.iter().filter(|s| s.category_id == category_id) {
        let bucket = spend
            .subcategory
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Other".to_string());
        *agg.entry(bucket).or_insert(Decimal::ZERO) += spend.amount;
    }
    let mut entries: Vec<(String, Decimal)> = agg
        .into_iter()
        .filter(|(_, total)| *total > Decimal::ZERO)
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpcomingKind {
    Bill,
    Emi,
}

#[derive(Debug, Serialize)]
pub struct UpcomingItem {
    pub kind: UpcomingKind,
    pub name: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    pub category_id: Uuid,
}

/// Bills and EMIs falling due within `[today, today + days]`: category bill
/// dates, plus unpaid recurring spends whose due date is in the window and
/// whose EMI end date (if any) has not passed.
pub fn upcoming(
    categories: &[Category],
    spends: &[Spend],
    today: NaiveDate,
    days: u64,
) -> Vec<UpcomingItem> {
    let horizon = today
        .checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX);
    let in_window = |d: NaiveDate| d >= today && d <= horizon;

    let mut items: Vec<UpcomingItem> = Vec::new();
    for cat in categories {
        if let Some(bill_date) = cat.next_bill_date {
            if in_window(bill_date) {
                items.push(UpcomingItem {
                    kind: UpcomingKind::Bill,
                    name: cat.name.clone(),
                    date: bill_date,
                    amount: None,
                    category_id: cat.id,
                });
            }
        }
    }
    for spend in spends {
        if !spend.is_recurring || spend.is_paid {
            continue;
        }
        if spend.emi_end_date.is_some_and(|end| end < today) {
            continue;
        }
        if let Some(due) = spend.due_date {
            if in_window(due) {
                items.push(UpcomingItem {
                    kind: UpcomingKind::Emi,
                    name: spend.description.clone(),
                    date: due,
                    amount: Some(spend.amount),
                    category_id: spend.category_id,
                });
            }
        }
    }
    items.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
    items
}
