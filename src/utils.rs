// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::engine::{DashboardQuery, window::local_midnight};
use crate::models::TxKind;

/// A calendar date (`YYYY-MM-DD`, taken as local midnight in `tz`) or an
/// RFC 3339 timestamp.
pub fn parse_timestamp<Tz: TimeZone>(s: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(local_midnight(tz, d)?);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD or RFC 3339", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Amounts are magnitudes; the transaction type carries the sign.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(anyhow!("Amount must not be negative, got {}", d));
    }
    Ok(d)
}

pub fn parse_kind(s: &str) -> Result<TxKind> {
    s.parse::<TxKind>().map_err(|e| anyhow!(e))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_user(conn: &Connection, email: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM users WHERE email=?1")?;
    let id: i64 = stmt
        .query_row(params![email.trim().to_lowercase()], |r| r.get(0))
        .with_context(|| format!("User '{}' not found", email))?;
    Ok(id)
}

pub fn category_for_name(conn: &Connection, name: &str, kind: Option<TxKind>) -> Result<(i64, TxKind)> {
    let name = name.trim();
    let mut stmt = conn.prepare(
        "SELECT id, type FROM categories WHERE name=?1 AND (?2 IS NULL OR type=?2) ORDER BY id",
    )?;
    let rows = stmt.query_map(params![name, kind.map(|k| k.as_str())], |r| {
        Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut found = Vec::new();
    for row in rows {
        let (id, k) = row?;
        found.push((id, parse_kind(&k)?));
    }
    match found.as_slice() {
        [] => Err(anyhow!("Category '{}' not found", name)),
        [one] => Ok(*one),
        _ => Err(anyhow!(
            "Category '{}' exists for both Income and Expense, pass --type",
            name
        )),
    }
}

/// The `--filter/--start/--end` triple shared by listing, dashboard and export.
pub fn query_from_args(sub: &clap::ArgMatches) -> DashboardQuery {
    DashboardQuery {
        filter: sub.get_one::<String>("filter").cloned(),
        start_date: sub.get_one::<String>("start").cloned(),
        end_date: sub.get_one::<String>("end").cloned(),
    }
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
