//! Environment-driven configuration

use crate::context::SendStrategy;
use crate::db::{Database, DatabaseStore};
use crate::store::StoreError;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_FILTER: &str = "chatnav=info";

/// Settings for a bot process embedding the navigator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavConfig {
    /// SQLite file backing the conversation store
    pub db_path: PathBuf,
    /// Strategy new contexts start with
    pub default_strategy: SendStrategy,
    /// `tracing` filter directive
    pub log_filter: String,
    /// Emit JSON log lines instead of plain text
    pub log_json: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(std::env::var("HOME").ok()),
            default_strategy: SendStrategy::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_json: false,
        }
    }
}

impl NavConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source. Unset or unparsable values fall back
    /// to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("CHATNAV_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_db_path(lookup("HOME")));

        let default_strategy = match lookup("CHATNAV_DEFAULT_STRATEGY") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "Ignoring CHATNAV_DEFAULT_STRATEGY");
                SendStrategy::default()
            }),
            None => SendStrategy::default(),
        };

        let log_json = lookup("CHATNAV_LOG_JSON")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

        Self {
            db_path,
            default_strategy,
            log_filter: lookup("CHATNAV_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_json,
        }
    }

    /// Open the SQLite store at `db_path`, creating its directory if needed
    pub fn open_store(&self) -> Result<DatabaseStore, StoreError> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Unavailable(format!("{}: {e}", parent.display())))?;
        }
        tracing::info!(path = %self.db_path.display(), "Opening database");
        Ok(DatabaseStore::new(Database::open(&self.db_path)?))
    }
}

fn default_db_path(home: Option<String>) -> PathBuf {
    let home = home.unwrap_or_else(|| "/tmp".to_string());
    Path::new(&home).join(".chatnav").join("chatnav.db")
}
