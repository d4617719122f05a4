// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Transaction, TxKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// `H:00`, hour of day in local time. The label carries no date, so the
    /// same hour on two days (the `day` window reaches 24h past now) shares a
    /// bucket.
    Hour,
    /// `M/D/YYYY`, local calendar day.
    Day,
    /// `Mon YYYY`.
    Month,
}

impl Granularity {
    pub fn label<Tz: TimeZone>(&self, t: &DateTime<Utc>, tz: &Tz) -> String {
        let local = t.with_timezone(tz).naive_local();
        match self {
            Granularity::Hour => format!("{}:00", local.hour()),
            Granularity::Day => format!("{}/{}/{}", local.month(), local.day(), local.year()),
            Granularity::Month => local.format("%b %Y").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub period: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

struct Bucket {
    period: String,
    earliest: DateTime<Utc>,
    income: Decimal,
    expenses: Decimal,
}

/// Sum income and expenses per period label. Points come out in
/// chronological order of the earliest transaction seen in each bucket, so
/// ordering never depends on how a label happens to parse.
pub fn bucket<Tz: TimeZone>(
    transactions: &[Transaction],
    granularity: Granularity,
    tz: &Tz,
) -> Vec<TrendPoint> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for tx in transactions {
        let period = granularity.label(&tx.date, tz);
        let i = *index.entry(period.clone()).or_insert_with(|| {
            buckets.push(Bucket {
                period,
                earliest: tx.date,
                income: Decimal::ZERO,
                expenses: Decimal::ZERO,
            });
            buckets.len() - 1
        });
        let b = &mut buckets[i];
        if tx.date < b.earliest {
            b.earliest = tx.date;
        }
        match tx.kind {
            TxKind::Income => b.income += tx.amount,
            TxKind::Expense => b.expenses += tx.amount,
        }
    }

    buckets.sort_by_key(|b| b.earliest);
    buckets
        .into_iter()
        .map(|b| TrendPoint {
            net: b.income - b.expenses,
            period: b.period,
            income: b.income,
            expenses: b.expenses,
        })
        .collect()
}
