// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine;
use crate::store::SqliteStore;
use crate::utils::{
    category_for_name, fmt_money, id_for_user, maybe_print_json, parse_amount, parse_kind,
    parse_timestamp, pretty_table, query_from_args,
};
use anyhow::{Result, bail};
use chrono::{DateTime, Local, TimeZone, Utc};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let now = Local::now();
    match m.subcommand() {
        Some(("add", sub)) => {
            add(conn, sub, &now)?;
        }
        Some(("list", sub)) => list(conn, sub, &now)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Record a transaction and return its id. The category must carry the same
/// type as the transaction.
pub fn add<Tz: TimeZone>(conn: &Connection, sub: &clap::ArgMatches, now: &DateTime<Tz>) -> Result<i64> {
    let email = sub.get_one::<String>("user").unwrap();
    let kind = parse_kind(sub.get_one::<String>("type").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_timestamp(d, &now.timezone())?,
        None => now.with_timezone(&Utc),
    };
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let user_id = id_for_user(conn, email)?;
    let (category_id, category_kind) = category_for_name(conn, category, Some(kind))
        .or_else(|_| category_for_name(conn, category, None))?;
    if category_kind != kind {
        bail!(
            "Category '{}' is {}, which does not match transaction type {}",
            category.trim(),
            category_kind,
            kind
        );
    }

    conn.execute(
        "INSERT INTO transactions(user_id, category_id, type, amount, date, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user_id,
            category_id,
            kind.as_str(),
            amount.to_string(),
            date.to_rfc3339(),
            note
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, user_id, %kind, %amount, "recorded transaction");
    println!(
        "Recorded {} {} on {} in '{}' (id {})",
        kind,
        fmt_money(&amount),
        date.with_timezone(&now.timezone()).naive_local().date(),
        category.trim(),
        id
    );
    Ok(id)
}

fn list<Tz: TimeZone>(conn: &Connection, sub: &clap::ArgMatches, now: &DateTime<Tz>) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub, now)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.category.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Category", "Type", "Amount", "Note"], rows)
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub r#type: String,
    pub amount: String,
    pub note: String,
}

/// Rows for `tx list`, newest first, selected with the same period rules as
/// the dashboard.
pub fn query_rows<Tz: TimeZone>(
    conn: &Connection,
    sub: &clap::ArgMatches,
    now: &DateTime<Tz>,
) -> Result<Vec<TransactionRow>> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let query = query_from_args(sub);
    let store = SqliteStore::new(conn);
    let selection = engine::select(&store, user_id, &query, now)?;
    let limit = sub
        .get_one::<usize>("limit")
        .copied()
        .unwrap_or(usize::MAX);
    let tz = now.timezone();

    Ok(selection
        .transactions
        .iter()
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.with_timezone(&tz).naive_local().format("%Y-%m-%d").to_string(),
            category: selection.category_name(t).unwrap_or_default().to_string(),
            r#type: t.kind.to_string(),
            amount: fmt_money(&t.amount),
            note: t.note.clone().unwrap_or_default(),
        })
        .collect())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = id_for_user(conn, sub.get_one::<String>("user").unwrap())?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    if n == 0 {
        bail!("Transaction {} not found", id);
    }
    tracing::info!(id, user_id, "removed transaction");
    println!("Removed transaction {}", id);
    Ok(())
}
