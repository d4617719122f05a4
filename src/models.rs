// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of money flow. A category and every transaction filed under it
/// share the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "Income",
            TxKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            other => Err(format!(
                "Invalid transaction type '{}', expected Income or Expense",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub note: Option<String>,
}

/// Categories created by `init`, mirroring a fresh install of the tracker.
pub const DEFAULT_CATEGORIES: &[(&str, TxKind)] = &[
    ("Salary", TxKind::Income),
    ("Freelance", TxKind::Income),
    ("Investments", TxKind::Income),
    ("Business", TxKind::Income),
    ("Gifts", TxKind::Income),
    ("Other Income", TxKind::Income),
    ("Food & Dining", TxKind::Expense),
    ("Transportation", TxKind::Expense),
    ("Housing", TxKind::Expense),
    ("Utilities", TxKind::Expense),
    ("Healthcare", TxKind::Expense),
    ("Entertainment", TxKind::Expense),
    ("Shopping", TxKind::Expense),
    ("Education", TxKind::Expense),
    ("Personal Care", TxKind::Expense),
    ("Travel", TxKind::Expense),
    ("Insurance", TxKind::Expense),
    ("Debt Payments", TxKind::Expense),
    ("Savings", TxKind::Expense),
    ("Other Expenses", TxKind::Expense),
];
