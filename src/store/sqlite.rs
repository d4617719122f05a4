// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use super::{LedgerStore, StoreError};
use crate::models::{Category, Transaction, TxKind};

pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

fn corrupt(table: &'static str, detail: String) -> StoreError {
    StoreError::Corrupt { table, detail }
}

fn decode_kind(table: &'static str, s: &str) -> Result<TxKind, StoreError> {
    s.parse::<TxKind>().map_err(|e| corrupt(table, e))
}

fn decode_amount(s: &str) -> Result<Decimal, StoreError> {
    s.parse::<Decimal>()
        .map_err(|e| corrupt("transactions", format!("amount '{}': {}", s, e)))
}

fn decode_date(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| corrupt("transactions", format!("date '{}': {}", s, e)))
}

impl LedgerStore for SqliteStore<'_> {
    fn transactions_for_user(&self, user_id: i64) -> Result<Vec<Transaction>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, category_id, type, amount, date, note
             FROM transactions WHERE user_id=?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![user_id], |r| {
            Ok((
                r.get::<_, i64>(0)?,
                r.get::<_, i64>(1)?,
                r.get::<_, i64>(2)?,
                r.get::<_, String>(3)?,
                r.get::<_, String>(4)?,
                r.get::<_, String>(5)?,
                r.get::<_, Option<String>>(6)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (id, user_id, category_id, kind, amount, date, note) = row?;
            out.push(Transaction {
                id,
                user_id,
                category_id,
                kind: decode_kind("transactions", &kind)?,
                amount: decode_amount(&amount)?,
                date: decode_date(&date)?,
                note,
            });
        }
        Ok(out)
    }

    fn category(&self, id: i64) -> Result<Option<Category>, StoreError> {
        let row: Option<(i64, String, String)> = self
            .conn
            .query_row(
                "SELECT id, name, type FROM categories WHERE id=?1",
                params![id],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?;
        match row {
            Some((id, name, kind)) => Ok(Some(Category {
                id,
                name,
                kind: decode_kind("categories", &kind)?,
            })),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn conn() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO users(id, name, email) VALUES (1, 'Ada', 'ada@example.com')",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn reads_back_rows_in_insertion_order() {
        let conn = conn();
        for (amount, date) in [("1.50", "2024-01-02T00:00:00Z"), ("2", "2024-01-01T00:00:00Z")] {
            conn.execute(
                "INSERT INTO transactions(user_id, category_id, type, amount, date) VALUES (1, 1, 'Income', ?1, ?2)",
                params![amount, date],
            )
            .unwrap();
        }
        let store = SqliteStore::new(&conn);
        let txs = store.transactions_for_user(1).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].amount, Decimal::new(150, 2));
        assert!(txs[0].id < txs[1].id);
        assert_eq!(store.category(1).unwrap().unwrap().name, "Salary");
        assert!(store.category(9999).unwrap().is_none());
    }

    #[test]
    fn corrupt_amount_is_reported() {
        let conn = conn();
        conn.execute(
            "INSERT INTO transactions(user_id, category_id, type, amount, date) VALUES (1, 1, 'Income', 'lots', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        let err = SqliteStore::new(&conn).transactions_for_user(1).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { table: "transactions", .. }));
    }
}
