// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use super::{LedgerStore, StoreError};
use crate::models::{Category, Transaction};

/// A store held entirely in memory. Handy for tests and one-off reports built
/// from imported data.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    categories: BTreeMap<i64, Category>,
    transactions: Vec<Transaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        for c in categories {
            self.categories.insert(c.id, c);
        }
        self
    }

    pub fn push(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }
}

impl LedgerStore for MemoryStore {
    fn transactions_for_user(&self, user_id: i64) -> Result<Vec<Transaction>, StoreError> {
        Ok(self
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    fn category(&self, id: i64) -> Result<Option<Category>, StoreError> {
        Ok(self.categories.get(&id).cloned())
    }
}
