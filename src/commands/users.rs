// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let email = sub.get_one::<String>("email").unwrap().trim().to_lowercase();
            if name.is_empty() {
                bail!("User name must not be empty");
            }
            if !email.contains('@') {
                bail!("Invalid email '{}'", email);
            }
            conn.execute(
                "INSERT INTO users(name, email) VALUES (?1, ?2)",
                params![name, email],
            )
            .with_context(|| format!("User '{}' already exists", email))?;
            tracing::info!(%email, "added user");
            println!("Added user '{}' <{}>", name, email);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare("SELECT id, name, email FROM users ORDER BY id")?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (id, name, email) = row?;
                data.push(vec![id.to_string(), name, email]);
            }
            println!("{}", pretty_table(&["ID", "Name", "Email"], data));
        }
        _ => {}
    }
    Ok(())
}
