// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{BACKUP_VERSION, Backup, Category, RecurringFrequency, Spend};
use crate::store::EntityStore;

/// The in-memory collections plus their durable store.
///
/// Every mutation is a read-modify-write over the full collection followed by
/// a full replacement persist. Memory is updated before the durable write; if
/// that write fails the in-memory state stays as-is and the error propagates,
/// so the caller can warn that the change may not have been saved.
pub struct Ledger<S: EntityStore> {
    pub(crate) categories: Vec<Category>,
    pub(crate) spends: Vec<Spend>,
    pub(crate) store: S,
}

pub struct NewCategory {
    pub name: String,
    pub color: String,
    pub group: Option<String>,
    pub card_number: Option<String>,
    pub next_bill_date: Option<NaiveDate>,
    pub icon: Option<String>,
}

/// `None` leaves a field alone; for the bill date, `Some(None)` clears it.
#[derive(Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub group: Option<String>,
    pub card_number: Option<String>,
    pub next_bill_date: Option<Option<NaiveDate>>,
    pub icon: Option<String>,
}

pub struct NewSpend {
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
    pub category_id: Uuid,
    pub subcategory: Option<String>,
    pub is_recurring: bool,
    pub recurring_frequency: Option<RecurringFrequency>,
    pub due_date: Option<NaiveDate>,
    pub emi_end_date: Option<NaiveDate>,
}

#[derive(Default)]
pub struct SpendPatch {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub subcategory: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub emi_end_date: Option<NaiveDate>,
}

impl<S: EntityStore> Ledger<S> {
    pub fn load(mut store: S) -> Result<Self, StoreError> {
        let (categories, spends) = store.load()?;
        Ok(Self {
            categories,
            spends,
            store,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn spends(&self) -> &[Spend] {
        &self.spends
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn spend(&self, id: Uuid) -> Option<&Spend> {
        self.spends.iter().find(|s| s.id == id)
    }

    pub fn add_category(&mut self, new: NewCategory) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.categories.push(Category {
            id,
            name: new.name,
            color: new.color,
            group: new.group,
            card_number: new.card_number,
            next_bill_date: new.next_bill_date,
            icon: new.icon,
            created_at: Utc::now(),
        });
        self.store.replace_categories(&self.categories)?;
        Ok(id)
    }

    pub fn update_category(&mut self, id: Uuid, patch: CategoryPatch) -> Result<bool, StoreError> {
        let Some(cat) = self.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        if let Some(name) = patch.name {
            cat.name = name;
        }
        if let Some(color) = patch.color {
            cat.color = color;
        }
        if let Some(group) = patch.group {
            cat.group = Some(group);
        }
        if let Some(card_number) = patch.card_number {
            cat.card_number = Some(card_number);
        }
        if let Some(next_bill_date) = patch.next_bill_date {
            cat.next_bill_date = next_bill_date;
        }
        if let Some(icon) = patch.icon {
            cat.icon = Some(icon);
        }
        self.store.replace_categories(&self.categories)?;
        Ok(true)
    }

    /// Spends of a deleted category are kept with their dangling id; views
    /// render them as "Unknown".
    pub fn delete_category(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        if self.categories.len() == before {
            return Ok(false);
        }
        self.store.replace_categories(&self.categories)?;
        Ok(true)
    }

    pub fn add_spend(&mut self, new: NewSpend) -> Result<Uuid, StoreError> {
        let id = Uuid::new_v4();
        self.spends.push(Spend {
            id,
            amount: new.amount,
            description: new.description,
            date: new.date,
            category_id: new.category_id,
            subcategory: new.subcategory,
            is_paid: false,
            is_recurring: new.is_recurring,
            recurring_frequency: new.recurring_frequency,
            due_date: new.due_date,
            emi_end_date: new.emi_end_date,
            paid_date: None,
            created_at: Utc::now(),
        });
        self.store.replace_spends(&self.spends)?;
        Ok(id)
    }

    pub fn update_spend(&mut self, id: Uuid, patch: SpendPatch) -> Result<bool, StoreError> {
        let Some(spend) = self.spends.iter_mut().find(|s| s.id == id) else {
            return Ok(false);
        };
        if let Some(amount) = patch.amount {
            spend.amount = amount;
        }
        if let Some(description) = patch.description {
            spend.description = description;
        }
        if let Some(date) = patch.date {
            spend.date = date;
        }
        if let Some(subcategory) = patch.subcategory {
            spend.subcategory = Some(subcategory);
        }
        if let Some(due_date) = patch.due_date {
            spend.due_date = Some(due_date);
        }
        if let Some(emi_end_date) = patch.emi_end_date {
            spend.emi_end_date = Some(emi_end_date);
        }
        self.store.replace_spends(&self.spends)?;
        Ok(true)
    }

    pub fn delete_spend(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let before = self.spends.len();
        self.spends.retain(|s| s.id != id);
        if self.spends.len() == before {
            return Ok(false);
        }
        self.store.replace_spends(&self.spends)?;
        Ok(true)
    }

    /// Replaces both collections wholesale from a backup document. The only
    /// validation is that `categories` and `spends` are arrays of records;
    /// on failure nothing is mutated.
    pub fn import(&mut self, doc: &serde_json::Value) -> Result<(usize, usize), StoreError> {
        let categories = doc
            .get("categories")
            .filter(|v| v.is_array())
            .ok_or_else(|| StoreError::Validation("`categories` must be an array".into()))?;
        let spends = doc
            .get("spends")
            .filter(|v| v.is_array())
            .ok_or_else(|| StoreError::Validation("`spends` must be an array".into()))?;

        let categories: Vec<Category> = serde_json::from_value(categories.clone())
            .map_err(|e| StoreError::Validation(e.to_string()))?;
        let spends: Vec<Spend> = serde_json::from_value(spends.clone())
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        self.categories = categories;
        self.spends = spends;
        self.store.replace_all(&self.categories, &self.spends)?;
        Ok((self.categories.len(), self.spends.len()))
    }

    pub fn export(&self) -> Backup {
        Backup {
            categories: self.categories.clone(),
            spends: self.spends.clone(),
            export_date: Utc::now(),
            version: BACKUP_VERSION.to_string(),
        }
    }
}
