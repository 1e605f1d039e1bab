// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::models::{Category, Spend};

pub const CATEGORIES_KEY: &str = "credtrack_categories";
pub const SPENDS_KEY: &str = "credtrack_spends";

/// Durable backing for the two entity collections. Writes are always full
/// replacements; there is no per-record mutation at this boundary.
pub trait EntityStore {
    fn load(&mut self) -> Result<(Vec<Category>, Vec<Spend>), StoreError>;
    fn replace_categories(&mut self, categories: &[Category]) -> Result<(), StoreError>;
    fn replace_spends(&mut self, spends: &[Spend]) -> Result<(), StoreError>;
    /// Writes both collections inside one transactional boundary, for
    /// operations that must not leave them inconsistent with each other.
    fn replace_all(
        &mut self,
        categories: &[Category],
        spends: &[Spend],
    ) -> Result<(), StoreError>;
}

/// Stores each collection as one JSON document in the `documents` key-value
/// table, under the same keys the app used in browser storage.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    fn read_doc<T: DeserializeOwned>(
        &self,
        key: &str,
        collection: &'static str,
    ) -> Result<Vec<T>, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM documents WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()
            .map_err(|e| StoreError::load(collection, e))?;
        match raw {
            Some(s) => serde_json::from_str(&s).map_err(|e| StoreError::load(collection, e)),
            None => Ok(Vec::new()),
        }
    }

    fn write_doc<T: Serialize>(
        conn: &Connection,
        key: &str,
        collection: &'static str,
        items: &[T],
    ) -> Result<(), StoreError> {
        let value =
            serde_json::to_string(items).map_err(|e| StoreError::persistence(collection, e))?;
        conn.execute(
            "INSERT INTO documents(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )
        .map_err(|e| StoreError::persistence(collection, e))?;
        Ok(())
    }
}

impl EntityStore for SqliteStore {
    fn load(&mut self) -> Result<(Vec<Category>, Vec<Spend>), StoreError> {
        let categories = self.read_doc(CATEGORIES_KEY, "categories")?;
        let spends = self.read_doc(SPENDS_KEY, "spends")?;
        Ok((categories, spends))
    }

    fn replace_categories(&mut self, categories: &[Category]) -> Result<(), StoreError> {
        Self::write_doc(&self.conn, CATEGORIES_KEY, "categories", categories)
    }

    fn replace_spends(&mut self, spends: &[Spend]) -> Result<(), StoreError> {
        Self::write_doc(&self.conn, SPENDS_KEY, "spends", spends)
    }

    fn replace_all(
        &mut self,
        categories: &[Category],
        spends: &[Spend],
    ) -> Result<(), StoreError> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| StoreError::persistence("categories+spends", e))?;
        Self::write_doc(&tx, CATEGORIES_KEY, "categories", categories)?;
        Self::write_doc(&tx, SPENDS_KEY, "spends", spends)?;
        tx.commit()
            .map_err(|e| StoreError::persistence("categories+spends", e))?;
        Ok(())
    }
}

/// In-memory fake for tests. `fail_next_write` makes the next replace fail
/// once, to exercise the optimistic-update error path.
#[derive(Default)]
pub struct MemoryStore {
    pub categories: Vec<Category>,
    pub spends: Vec<Spend>,
    pub fail_next_write: bool,
}

impl MemoryStore {
    fn check_write(&mut self, collection: &'static str) -> Result<(), StoreError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(StoreError::persistence(collection, "injected write failure"));
        }
        Ok(())
    }
}

impl EntityStore for MemoryStore {
    fn load(&mut self) -> Result<(Vec<Category>, Vec<Spend>), StoreError> {
        Ok((self.categories.clone(), self.spends.clone()))
    }

    fn replace_categories(&mut self, categories: &[Category]) -> Result<(), StoreError> {
        self.check_write("categories")?;
        self.categories = categories.to_vec();
        Ok(())
    }

    fn replace_spends(&mut self, spends: &[Spend]) -> Result<(), StoreError> {
        self.check_write("spends")?;
        self.spends = spends.to_vec();
        Ok(())
    }

    fn replace_all(
        &mut self,
        categories: &[Category],
        spends: &[Spend],
    ) -> Result<(), StoreError> {
        self.check_write("categories+spends")?;
        self.categories = categories.to_vec();
        self.spends = spends.to_vec();
        Ok(())
    }
}
