// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read access to users' transactions and categories.
//!
//! The dashboard engine only ever sees a [`LedgerStore`]; the CLI hands it a
//! [`SqliteStore`] and tests hand it a [`MemoryStore`].

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

use crate::models::{Category, Transaction};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("corrupt row in {table}: {detail}")]
    Corrupt { table: &'static str, detail: String },
}

pub trait LedgerStore {
    /// Every transaction owned by `user_id`, in insertion order. The returned
    /// vector is a complete snapshot.
    fn transactions_for_user(&self, user_id: i64) -> Result<Vec<Transaction>, StoreError>;

    fn category(&self, id: i64) -> Result<Option<Category>, StoreError>;
}
