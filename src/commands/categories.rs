// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Category;
use crate::utils::{parse_kind, pretty_table};
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let kind = parse_kind(sub.get_one::<String>("type").unwrap())?;
            if name.is_empty() {
                bail!("Category name must not be empty");
            }
            conn.execute(
                "INSERT INTO categories(name, type) VALUES (?1, ?2)",
                params![name, kind.as_str()],
            )
            .with_context(|| format!("{} category '{}' already exists", kind, name))?;
            println!("Added {} category '{}'", kind, name);
        }
        Some(("list", sub)) => {
            let kind = sub
                .get_one::<String>("type")
                .map(|s| parse_kind(s))
                .transpose()?;
            let data = list(conn)?
                .into_iter()
                .filter(|c| kind.is_none_or(|k| c.kind == k))
                .map(|c| vec![c.name, c.kind.to_string()])
                .collect();
            println!("{}", pretty_table(&["Category", "Type"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let kind = parse_kind(sub.get_one::<String>("type").unwrap())?;
            let in_use: i64 = conn.query_row(
                "SELECT COUNT(*) FROM transactions t JOIN categories c ON t.category_id=c.id
                 WHERE c.name=?1 AND c.type=?2",
                params![name, kind.as_str()],
                |r| r.get(0),
            )?;
            if in_use > 0 {
                bail!(
                    "{} category '{}' is used by {} transaction(s)",
                    kind,
                    name,
                    in_use
                );
            }
            let n = conn.execute(
                "DELETE FROM categories WHERE name=?1 AND type=?2",
                params![name, kind.as_str()],
            )?;
            if n == 0 {
                bail!("{} category '{}' not found", kind, name);
            }
            println!("Removed {} category '{}'", kind, name);
        }
        _ => {}
    }
    Ok(())
}

/// All categories, ordered by type then name.
pub fn list(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, type FROM categories ORDER BY type, name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, kind) = row?;
        out.push(Category {
            id,
            name,
            kind: parse_kind(&kind)?,
        });
    }
    Ok(out)
}
