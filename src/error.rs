// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised at the entity-store boundary.
///
/// `Persistence` means the in-memory state was already updated and is NOT
/// rolled back; the caller should warn that the change may not have been
/// saved. `Validation` means nothing was mutated.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid backup document: {0}")]
    Validation(String),

    #[error("failed to persist {collection}")]
    Persistence {
        collection: &'static str,
        #[source]
        source: Source,
    },

    #[error("failed to load {collection}")]
    Load {
        collection: &'static str,
        #[source]
        source: Source,
    },
}

impl StoreError {
    pub fn persistence(collection: &'static str, source: impl Into<Source>) -> Self {
        StoreError::Persistence {
            collection,
            source: source.into(),
        }
    }

    pub fn load(collection: &'static str, source: impl Into<Source>) -> Self {
        StoreError::Load {
            collection,
            source: source.into(),
        }
    }
}
