// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard aggregation.
//!
//! [`build_report`] is a pure function of a store snapshot, a query and a
//! single reading of the clock. It either returns a complete report or an
//! error; nothing partial escapes.

pub mod rollup;
pub mod trend;
pub mod window;

use std::collections::HashMap;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Category, Transaction};
use crate::store::{LedgerStore, StoreError};

pub use rollup::{CategoryBreakdown, CategoryTotal, Totals};
pub use trend::{Granularity, TrendPoint};
pub use window::{DashboardQuery, DateFilter, TimeWindow};

pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub totals: Totals,
    pub category_breakdown: CategoryBreakdown,
    pub trend_data: Vec<TrendPoint>,
    pub recent_transactions: Vec<RecentTransaction>,
}

/// The transactions a query selects, newest first, with every category they
/// reference that could be resolved.
#[derive(Debug, Clone)]
pub struct Selection {
    pub filter: DateFilter,
    pub window: TimeWindow,
    pub transactions: Vec<Transaction>,
    pub categories: HashMap<i64, Category>,
}

impl Selection {
    pub fn category_name(&self, tx: &Transaction) -> Option<&str> {
        self.categories.get(&tx.category_id).map(|c| c.name.as_str())
    }
}

/// Validate `query`, resolve it against `now` and load the matching slice of
/// `user_id`'s transactions. Shared by the dashboard, listing and export so
/// they always agree on what a period contains.
pub fn select<S, Tz>(
    store: &S,
    user_id: i64,
    query: &DashboardQuery,
    now: &DateTime<Tz>,
) -> Result<Selection, EngineError>
where
    S: LedgerStore + ?Sized,
    Tz: TimeZone,
{
    let filter = query.parse()?;
    let window = filter.resolve(now)?;
    let snapshot = store.transactions_for_user(user_id)?;
    let transactions = rollup::select(snapshot, user_id, &window);

    let mut categories = HashMap::new();
    let mut missing = Vec::new();
    for tx in &transactions {
        if categories.contains_key(&tx.category_id) || missing.contains(&tx.category_id) {
            continue;
        }
        match store.category(tx.category_id)? {
            Some(c) => {
                categories.insert(c.id, c);
            }
            None => {
                let err = EngineError::NotFound {
                    entity: "category",
                    id: tx.category_id,
                };
                tracing::warn!(%err, tx_id = tx.id, "excluding from category breakdown");
                missing.push(tx.category_id);
            }
        }
    }
    tracing::debug!(
        user_id,
        selected = transactions.len(),
        categories = categories.len(),
        "selected transactions"
    );
    Ok(Selection {
        filter,
        window,
        transactions,
        categories,
    })
}

pub fn build_report<S, Tz>(
    store: &S,
    user_id: i64,
    query: &DashboardQuery,
    now: &DateTime<Tz>,
) -> Result<DashboardReport, EngineError>
where
    S: LedgerStore + ?Sized,
    Tz: TimeZone,
{
    let selection = select(store, user_id, query, now)?;
    Ok(report_from(&selection, &now.timezone()))
}

/// Aggregate an existing selection. `tz` decides local hours and days for
/// trend labels.
pub fn report_from<Tz: TimeZone>(selection: &Selection, tz: &Tz) -> DashboardReport {
    let txs = &selection.transactions;
    let recent_transactions = txs
        .iter()
        .take(RECENT_LIMIT)
        .map(|t| RecentTransaction {
            transaction: t.clone(),
            category: selection.category_name(t).map(str::to_string),
        })
        .collect();
    DashboardReport {
        totals: rollup::totals(txs),
        category_breakdown: rollup::breakdown(txs, &selection.categories),
        trend_data: trend::bucket(txs, selection.filter.granularity(), tz),
        recent_transactions,
    }
}
