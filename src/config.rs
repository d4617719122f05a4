// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::env;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.finsight", "Finsight", "finsight"));

pub const DB_ENV: &str = "FINSIGHT_DB";
pub const LOG_ENV: &str = "FINSIGHT_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Build from the environment. `db_override` (the `--db` flag) wins over
    /// `FINSIGHT_DB`, which wins over the platform data dir.
    pub fn load(db_override: Option<&str>) -> Result<Self> {
        let db_path = match db_override {
            Some(p) => PathBuf::from(p),
            None => match env::var(DB_ENV) {
                Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
                _ => default_db_path()?,
            },
        };
        let log_filter = env::var(LOG_ENV)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Ok(Self {
            db_path,
            log_filter,
        })
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("finsight.sqlite"))
}
