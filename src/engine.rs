// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::StoreError;
use crate::ledger::Ledger;
use crate::models::Spend;
use crate::recur::next_occurrence;
use crate::store::EntityStore;

pub const PARTIAL_PAYMENT_DESC: &str = "Partial Payment / Credit";
pub const BILL_ADJUSTMENT_DESC: &str = "Bill Adjustment / Fees";

// Tolerance for amounts that went through float rounding in imported backups.
fn settle_epsilon() -> Decimal {
    Decimal::new(1, 2)
}

#[derive(Debug, Default)]
pub struct SettlementOutcome {
    pub paid: usize,
    pub generated: usize,
    pub adjustment: Option<Decimal>,
    pub bill_date_advanced: bool,
}

#[derive(Debug, Default)]
pub struct ToggleOutcome {
    pub changed: bool,
    pub generated: bool,
    pub bill_date_advanced: bool,
}

impl<S: EntityStore> Ledger<S> {
    /// Settle a category's unpaid spends with a waterfall allocation.
    ///
    /// With no `paid_amount` every unpaid spend is settled in full. With one,
    /// spends are walked oldest-first and accepted only while they fit in the
    /// remaining budget; a spend is never split. Whatever is left over (or
    /// overshot) books a synthetic adjustment record: an open credit when
    /// unpaid spends remain, a settled fee/credit entry otherwise. Paying a
    /// recurring spend queues its next occurrence and advances the category's
    /// next bill date by one month.
    ///
    /// A category id with no unpaid spends is an empty selection, not an
    /// error; stale ids are safe to retry.
    pub fn mark_all_paid(
        &mut self,
        category_id: Uuid,
        paid_amount: Option<Decimal>,
    ) -> Result<SettlementOutcome, StoreError> {
        let now = Utc::now();
        let eps = settle_epsilon();

        // Oldest debts clear first, mirroring statement behavior.
        let mut due: Vec<usize> = self
            .spends
            .iter()
            .enumerate()
            .filter(|(_, s)| s.category_id == category_id && !s.is_paid)
            .map(|(i, _)| i)
            .collect();
        due.sort_by_key(|&i| self.spends[i].date);

        let total_unpaid: Decimal = due.iter().map(|&i| self.spends[i].amount).sum();
        let mut remaining = paid_amount.unwrap_or(total_unpaid);

        let mut accepted: Vec<usize> = Vec::new();
        for &i in &due {
            let amount = self.spends[i].amount;
            if paid_amount.is_none() || amount <= remaining + eps {
                remaining -= amount;
                accepted.push(i);
            }
        }

        let mut generated: Vec<Spend> = accepted
            .iter()
            .filter(|&&i| self.spends[i].is_recurring)
            .filter_map(|&i| next_occurrence(&self.spends[i]))
            .collect();

        let leftover_unpaid = accepted.len() < due.len();
        let recurring_paid = accepted.iter().any(|&i| self.spends[i].is_recurring);

        // A custom payment that does not land on the accepted total books the
        // difference as an adjustment spend. Skipped when the call selected
        // nothing and consumed nothing, so a stale retry stays a no-op.
        let adjustment: Option<Spend> = match paid_amount {
            Some(_)
                if remaining.abs() > eps
                    && !(accepted.is_empty() && (remaining - total_unpaid).abs() <= eps) =>
            {
                let settled = !leftover_unpaid;
                Some(Spend {
                    id: Uuid::new_v4(),
                    amount: -remaining,
                    description: if leftover_unpaid {
                        PARTIAL_PAYMENT_DESC.to_string()
                    } else {
                        BILL_ADJUSTMENT_DESC.to_string()
                    },
                    date: now.date_naive(),
                    category_id,
                    subcategory: None,
                    is_paid: settled,
                    is_recurring: false,
                    recurring_frequency: None,
                    due_date: None,
                    emi_end_date: None,
                    paid_date: settled.then_some(now),
                    created_at: now,
                })
            }
            _ => None,
        };

        if accepted.is_empty() && generated.is_empty() && adjustment.is_none() {
            return Ok(SettlementOutcome::default());
        }

        for &i in &accepted {
            self.spends[i].is_paid = true;
            self.spends[i].paid_date = Some(now);
        }
        let outcome = SettlementOutcome {
            paid: accepted.len(),
            generated: generated.len(),
            adjustment: adjustment.as_ref().map(|a| a.amount),
            bill_date_advanced: false,
        };
        self.spends.append(&mut generated);
        if let Some(adj) = adjustment {
            self.spends.push(adj);
        }

        let advanced = recurring_paid && self.advance_bill_date(category_id);

        if advanced {
            self.store.replace_all(&self.categories, &self.spends)?;
        } else {
            self.store.replace_spends(&self.spends)?;
        }
        Ok(SettlementOutcome {
            bill_date_advanced: advanced,
            ..outcome
        })
    }

    /// Flip a single spend's paid state. Marking a recurring spend paid
    /// generates its next occurrence and advances the category's bill date;
    /// marking it unpaid again does NOT retract the generated occurrence.
    /// Unknown ids are a no-op.
    pub fn set_spend_paid(&mut self, id: Uuid, paid: bool) -> Result<ToggleOutcome, StoreError> {
        let now = Utc::now();
        let Some(idx) = self.spends.iter().position(|s| s.id == id) else {
            return Ok(ToggleOutcome::default());
        };
        if self.spends[idx].is_paid == paid {
            return Ok(ToggleOutcome::default());
        }

        self.spends[idx].is_paid = paid;
        self.spends[idx].paid_date = paid.then_some(now);
        let category_id = self.spends[idx].category_id;

        let mut generated = false;
        let mut advanced = false;
        if paid && self.spends[idx].is_recurring {
            if let Some(next) = next_occurrence(&self.spends[idx]) {
                self.spends.push(next);
                generated = true;
            }
            advanced = self.advance_bill_date(category_id);
        }

        if advanced {
            self.store.replace_all(&self.categories, &self.spends)?;
        } else {
            self.store.replace_spends(&self.spends)?;
        }
        Ok(ToggleOutcome {
            changed: true,
            generated,
            bill_date_advanced: advanced,
        })
    }

    // Statement cycles are monthly regardless of the paid spend's own
    // frequency. Only categories with a bill date set are advanced.
    fn advance_bill_date(&mut self, category_id: Uuid) -> bool {
        let Some(cat) = self.categories.iter_mut().find(|c| c.id == category_id) else {
            return false;
        };
        match cat.next_bill_date {
            Some(d) => {
                cat.next_bill_date = d.checked_add_months(Months::new(1));
                true
            }
            None => false,
        }
    }
}
