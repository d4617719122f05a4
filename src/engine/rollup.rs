// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::window::TimeWindow;
use crate::models::{Category, Transaction, TxKind};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub amount: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub expenses: Vec<CategoryTotal>,
    pub income: Vec<CategoryTotal>,
}

/// Keep `user_id`'s transactions inside `window`, newest first. The sort is
/// stable, so equal timestamps keep their storage order.
pub fn select(transactions: Vec<Transaction>, user_id: i64, window: &TimeWindow) -> Vec<Transaction> {
    let mut selected: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| t.user_id == user_id && window.contains(&t.date))
        .collect();
    selected.sort_by(|a, b| b.date.cmp(&a.date));
    selected
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let mut out = Totals::default();
    for tx in transactions {
        match tx.kind {
            TxKind::Income => out.total_income += tx.amount,
            TxKind::Expense => out.total_expenses += tx.amount,
        }
    }
    out.balance = out.total_income - out.total_expenses;
    out
}

/// Group by transaction type and category *name*. Categories sharing a name
/// merge into one row even when their ids differ. Transactions whose category
/// is missing from `categories` are skipped here but still count in [`totals`].
pub fn breakdown(
    transactions: &[Transaction],
    categories: &HashMap<i64, Category>,
) -> CategoryBreakdown {
    let mut groups: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<(TxKind, &str), usize> = HashMap::new();

    for tx in transactions {
        let Some(cat) = categories.get(&tx.category_id) else {
            continue;
        };
        let i = *index.entry((tx.kind, cat.name.as_str())).or_insert_with(|| {
            groups.push(CategoryTotal {
                name: cat.name.clone(),
                kind: tx.kind,
                amount: Decimal::ZERO,
                count: 0,
            });
            groups.len() - 1
        });
        groups[i].amount += tx.amount;
        groups[i].count += 1;
    }

    let (mut income, mut expenses): (Vec<_>, Vec<_>) =
        groups.into_iter().partition(|g| g.kind == TxKind::Income);
    income.sort_by(|a, b| b.amount.cmp(&a.amount));
    expenses.sort_by(|a, b| b.amount.cmp(&a.amount));
    CategoryBreakdown { expenses, income }
}
