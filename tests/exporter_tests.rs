// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, Utc};
use finsight::{cli, commands::exporter, db};
use rusqlite::{Connection, params};
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO users(id, name, email) VALUES (1, 'Ada <Admin>', 'ada@example.com')",
        [],
    )
    .unwrap();
    conn
}

fn insert(conn: &Connection, category: &str, kind: &str, amount: &str, date: &str, note: Option<&str>) {
    let cat_id: i64 = conn
        .query_row(
            "SELECT id FROM categories WHERE name=?1 AND type=?2",
            params![category, kind],
            |r| r.get(0),
        )
        .unwrap();
    conn.execute(
        "INSERT INTO transactions(user_id, category_id, type, amount, date, note) VALUES (1, ?1, ?2, ?3, ?4, ?5)",
        params![cat_id, kind, amount, date, note],
    )
    .unwrap();
}

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-01-20T09:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn run(conn: &Connection, extra: &[&str]) -> anyhow::Result<()> {
    let mut args = vec!["finsight", "export", "report", "--user", "ada@example.com"];
    args.extend_from_slice(extra);
    let matches = cli::build_cli().get_matches_from(args);
    if let Some(("export", export_m)) = matches.subcommand() {
        if let Some(("report", report_m)) = export_m.subcommand() {
            return exporter::export_report(conn, report_m, &now());
        }
    }
    panic!("no export report subcommand");
}

#[test]
fn export_report_writes_json_for_the_month() {
    let conn = base_conn();
    insert(&conn, "Food & Dining", "Expense", "12.34", "2025-01-02T10:00:00+00:00", Some("Weekly run"));
    insert(&conn, "Salary", "Income", "2500", "2025-01-15T08:00:00+00:00", None);
    insert(&conn, "Travel", "Expense", "300", "2024-12-30T08:00:00+00:00", None);

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("report.json");
    let out_str = out_path.to_string_lossy().to_string();
    run(&conn, &["--format", "json", "--out", &out_str, "--filter", "month"]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["period"], json!("This Month"));
    assert_eq!(parsed["generatedOn"], json!("2025-01-20"));
    assert_eq!(
        parsed["transactions"],
        json!([
            {
                "date": "2025-01-15",
                "category": "Salary",
                "type": "Income",
                "amount": "2500.00",
                "note": null
            },
            {
                "date": "2025-01-02",
                "category": "Food & Dining",
                "type": "Expense",
                "amount": "12.34",
                "note": "Weekly run"
            }
        ])
    );
    assert_eq!(parsed["totals"]["balance"], json!("2487.66"));
}

#[test]
fn export_report_writes_csv_rows() {
    let conn = base_conn();
    insert(&conn, "Housing", "Expense", "1200", "2025-01-01T00:00:00+00:00", Some("Jan, rent"));

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("report.csv");
    let out_str = out_path.to_string_lossy().to_string();
    run(&conn, &["--format", "CSV", "--out", &out_str]).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["date", "category", "type", "amount", "note"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].iter().collect::<Vec<_>>(),
        vec!["2025-01-01", "Housing", "Expense", "1200.00", "Jan, rent"]
    );
}

#[test]
fn export_report_html_escapes_user_text() {
    let conn = base_conn();
    insert(&conn, "Shopping", "Expense", "5", "2025-01-05T00:00:00+00:00", Some("<script>"));

    let dir = tempdir().unwrap();
    let out_path = dir.path().join("report.html");
    let out_str = out_path.to_string_lossy().to_string();
    run(
        &conn,
        &["--format", "html", "--out", &out_str, "--start", "2025-01-01", "--end", "2025-01-31"],
    )
    .unwrap();

    let html = std::fs::read_to_string(&out_path).unwrap();
    assert!(html.contains("Ada &lt;Admin&gt;"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("Jan 01, 2025 - Jan 31, 2025"));
    assert!(html.contains("Transaction History (1 transactions)"));
}

#[test]
fn export_report_rejects_unknown_format() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("report.pdf");
    let out_str = out_path.to_string_lossy().to_string();
    assert!(run(&conn, &["--format", "pdf", "--out", &out_str]).is_err());
    assert!(!out_path.exists());
}

#[test]
fn export_report_rejects_bad_filter_without_writing() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("report.json");
    let out_str = out_path.to_string_lossy().to_string();
    let err = run(&conn, &["--format", "json", "--out", &out_str, "--filter", "decade"]).unwrap_err();
    assert!(err.to_string().contains("Unknown filter"), "{}", err);
    assert!(!out_path.exists());
}
