// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{self, Selection, Totals};
use crate::models::TxKind;
use crate::store::SqliteStore;
use crate::utils::{fmt_money, id_for_user, query_from_args};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, TimeZone};
use maud::{DOCTYPE, PreEscaped, html};
use rusqlite::{Connection, params};
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("report", sub)) => export_report(conn, sub, &Local::now()),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Csv,
    Json,
    Html,
}

fn parse_format(s: &str) -> Result<Format> {
    match s.trim().to_lowercase().as_str() {
        "csv" => Ok(Format::Csv),
        "json" => Ok(Format::Json),
        "html" => Ok(Format::Html),
        other => bail!("Unknown format: {} (use csv|json|html)", other),
    }
}

/// Write the filtered transactions and their totals to `--out`. Selection
/// goes through the same engine path as the dashboard.
pub fn export_report<Tz: TimeZone>(
    conn: &Connection,
    sub: &clap::ArgMatches,
    now: &DateTime<Tz>,
) -> Result<()> {
    let fmt = parse_format(sub.get_one::<String>("format").unwrap())?;
    let out = sub.get_one::<String>("out").unwrap();
    let email = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, email)?;
    let user_name: String = conn.query_row(
        "SELECT name FROM users WHERE id=?1",
        params![user_id],
        |r| r.get(0),
    )?;

    let store = SqliteStore::new(conn);
    let selection = engine::select(&store, user_id, &query_from_args(sub), now)?;
    let totals = engine::rollup::totals(&selection.transactions);
    let tz = now.timezone();

    match fmt {
        Format::Csv => write_csv(out, &selection, &tz)?,
        Format::Json => {
            let doc = json_document(&selection, &totals, &user_name, now);
            std::fs::write(out, serde_json::to_string_pretty(&doc)?)
                .with_context(|| format!("Write {}", out))?;
        }
        Format::Html => {
            let html = html_document(&selection, &totals, &user_name, now);
            std::fs::write(out, html).with_context(|| format!("Write {}", out))?;
        }
    }
    tracing::info!(
        out = %out,
        format = ?fmt,
        transactions = selection.transactions.len(),
        "exported report"
    );
    println!(
        "Exported {} transactions to {}",
        selection.transactions.len(),
        out
    );
    Ok(())
}

fn local_date<Tz: TimeZone>(t: &DateTime<chrono::Utc>, tz: &Tz) -> chrono::NaiveDate {
    t.with_timezone(tz).naive_local().date()
}

fn write_csv<Tz: TimeZone>(out: &str, selection: &Selection, tz: &Tz) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out).with_context(|| format!("Create {}", out))?;
    wtr.write_record(["date", "category", "type", "amount", "note"])?;
    for t in &selection.transactions {
        wtr.write_record([
            local_date(&t.date, tz).to_string(),
            selection.category_name(t).unwrap_or_default().to_string(),
            t.kind.to_string(),
            fmt_money(&t.amount),
            t.note.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn json_document<Tz: TimeZone>(
    selection: &Selection,
    totals: &Totals,
    user_name: &str,
    now: &DateTime<Tz>,
) -> serde_json::Value {
    let tz = now.timezone();
    let items: Vec<_> = selection
        .transactions
        .iter()
        .map(|t| {
            json!({
                "date": local_date(&t.date, &tz).to_string(),
                "category": selection.category_name(t),
                "type": t.kind,
                "amount": fmt_money(&t.amount),
                "note": t.note,
            })
        })
        .collect();
    json!({
        "user": user_name,
        "period": selection.filter.describe(),
        "generatedOn": now.date_naive().to_string(),
        "totals": totals,
        "transactions": items,
    })
}

const REPORT_CSS: &str = "body{font-family:Arial,sans-serif;font-size:12px;color:#333;margin:0;padding:20px}\
.header{text-align:center;border-bottom:2px solid #e5e7eb;padding-bottom:20px;margin-bottom:30px}\
.summary{display:flex;justify-content:space-between;gap:20px;margin-bottom:30px}\
.summary-box{flex:1;border:1px solid #e5e7eb;border-radius:8px;padding:15px;text-align:center}\
.income{color:#059669}.expense{color:#dc2626}\
table{width:100%;border-collapse:collapse}th,td{border:1px solid #e5e7eb;padding:8px;text-align:left}\
td.amount{text-align:right;font-weight:600}.empty{text-align:center;padding:40px;color:#6b7280}";

fn amount_style(kind: TxKind) -> (&'static str, &'static str) {
    match kind {
        TxKind::Income => ("amount income", "+"),
        TxKind::Expense => ("amount expense", "-"),
    }
}

fn html_document<Tz: TimeZone>(
    selection: &Selection,
    totals: &Totals,
    user_name: &str,
    now: &DateTime<Tz>,
) -> String {
    let tz = now.timezone();
    let markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "Financial Report" }
                style { (PreEscaped(REPORT_CSS)) }
            }
            body {
                div.header {
                    h1 { "Personal Finance Report" }
                    p { (user_name) " \u{2022} " (selection.filter.describe()) }
                    p { "Generated on " (now.date_naive().format("%B %d, %Y").to_string()) }
                }
                div.summary {
                    div."summary-box" {
                        h3 { "Total Income" }
                        p.income { "$" (fmt_money(&totals.total_income)) }
                    }
                    div."summary-box" {
                        h3 { "Total Expenses" }
                        p.expense { "$" (fmt_money(&totals.total_expenses)) }
                    }
                    div."summary-box" {
                        h3 { "Balance" }
                        p { "$" (fmt_money(&totals.balance)) }
                    }
                }
                h2 { "Transaction History (" (selection.transactions.len()) " transactions)" }
                @if selection.transactions.is_empty() {
                    div.empty { "No transactions found for the selected period." }
                } @else {
                    table {
                        thead {
                            tr {
                                th { "Date" }
                                th { "Category" }
                                th { "Type" }
                                th { "Amount" }
                                th { "Notes" }
                            }
                        }
                        tbody {
                            @for t in &selection.transactions {
                                @let (class, sign) = amount_style(t.kind);
                                tr {
                                    td { (local_date(&t.date, &tz).format("%b %d, %Y").to_string()) }
                                    td { (selection.category_name(t).unwrap_or("-")) }
                                    td { (t.kind.as_str()) }
                                    td class=(class) { (sign) "$" (fmt_money(&t.amount)) }
                                    td { (t.note.as_deref().unwrap_or("-")) }
                                }
                            }
                        }
                    }
                }
            }
        }
    };
    markup.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DateFilter, TimeWindow, rollup};
    use crate::models::{Category, Transaction};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    #[test]
    fn escapes_markup_in_user_text() {
        let selection = Selection {
            filter: DateFilter::All,
            window: TimeWindow::unbounded(),
            transactions: vec![Transaction {
                id: 1,
                user_id: 1,
                category_id: 7,
                kind: TxKind::Expense,
                amount: Decimal::new(1999, 2),
                date: Utc.with_ymd_and_hms(2025, 1, 5, 12, 0, 0).unwrap(),
                note: Some("<b>Tom & \"Jerry\"</b>".into()),
            }],
            categories: HashMap::from([(
                7,
                Category {
                    id: 7,
                    name: "Fun & Games".into(),
                    kind: TxKind::Expense,
                },
            )]),
        };
        let totals = rollup::totals(&selection.transactions);
        let now = Utc.with_ymd_and_hms(2025, 1, 20, 9, 0, 0).unwrap();
        let html = html_document(&selection, &totals, "<i>Ada</i>", &now);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("&lt;b&gt;Tom &amp; &quot;Jerry&quot;&lt;/b&gt;"));
        assert!(html.contains("Fun &amp; Games"));
        assert!(html.contains("&lt;i&gt;Ada&lt;/i&gt;"));
        assert!(!html.contains("<i>"));
        assert!(html.contains("-$19.99"));
        assert!(html.contains("All Time"));
    }

    #[test]
    fn format_names_are_case_insensitive() {
        assert_eq!(parse_format(" CSV ").unwrap(), Format::Csv);
        assert!(parse_format("pdf").is_err());
    }
}
