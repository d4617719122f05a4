// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{self, CategoryTotal, DashboardReport};
use crate::store::SqliteStore;
use crate::utils::{fmt_money, id_for_user, maybe_print_json, pretty_table, query_from_args};
use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let now = Local::now();
    let report = report(conn, m, &now)?;
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let t = &report.totals;
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses", "Balance"],
            vec![vec![
                fmt_money(&t.total_income),
                fmt_money(&t.total_expenses),
                fmt_money(&t.balance),
            ]],
        )
    );
    println!("Expenses by category");
    println!("{}", breakdown_table(&report.category_breakdown.expenses));
    println!("Income by category");
    println!("{}", breakdown_table(&report.category_breakdown.income));

    let trend = report
        .trend_data
        .iter()
        .map(|p| {
            vec![
                p.period.clone(),
                fmt_money(&p.income),
                fmt_money(&p.expenses),
                fmt_money(&p.net),
            ]
        })
        .collect();
    println!("Trend");
    println!(
        "{}",
        pretty_table(&["Period", "Income", "Expenses", "Net"], trend)
    );

    let tz = now.timezone();
    let recent = report
        .recent_transactions
        .iter()
        .map(|r| {
            vec![
                r.transaction
                    .date
                    .with_timezone(&tz)
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
                r.category.clone().unwrap_or_else(|| "(unknown)".into()),
                r.transaction.kind.to_string(),
                fmt_money(&r.transaction.amount),
            ]
        })
        .collect();
    println!("Recent transactions");
    println!(
        "{}",
        pretty_table(&["Date", "Category", "Type", "Amount"], recent)
    );
    Ok(())
}

/// Build the dashboard for the `--user` in `m` as of `now`.
pub fn report<Tz: TimeZone>(
    conn: &Connection,
    m: &clap::ArgMatches,
    now: &DateTime<Tz>,
) -> Result<DashboardReport> {
    let user_id = id_for_user(conn, m.get_one::<String>("user").unwrap())?;
    let query = query_from_args(m);
    let store = SqliteStore::new(conn);
    Ok(engine::build_report(&store, user_id, &query, now)?)
}

fn breakdown_table(rows: &[CategoryTotal]) -> comfy_table::Table {
    let data = rows
        .iter()
        .map(|c| vec![c.name.clone(), fmt_money(&c.amount), c.count.to_string()])
        .collect();
    pretty_table(&["Category", "Amount", "Count"], data)
}
