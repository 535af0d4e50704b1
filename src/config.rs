//! Configuration handling
//!
//! `AppConfig` is loaded from an optional JSON file with every field
//! defaulted. `SelectionOptions` holds the day and room lists that are read
//! from the occupation store once at startup and injected into the wizard.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::LabCheckError;
use crate::store::OccupationStore;
use crate::types::ClockTime;

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// SQLite schedule database produced by `labcheck import`
    pub database: PathBuf,
    /// Busy timeout for each schedule query, in milliseconds
    pub query_timeout_ms: u64,
    /// Time selection at the start of a session and after reset
    pub default_time: ClockTime,
    /// Minutes added or removed per key press on the time step
    pub time_step_minutes: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("jadwal.db"),
            query_timeout_ms: 5000,
            default_time: ClockTime::default(),
            time_step_minutes: 15,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        debug!("Loaded configuration from {:?}: {:?}", path.as_ref(), config);
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.as_os_str().is_empty() {
            anyhow::bail!("Database path must be specified");
        }
        if self.query_timeout_ms == 0 {
            anyhow::bail!("Query timeout must be greater than zero");
        }
        if self.time_step_minutes == 0 || self.time_step_minutes > 60 {
            anyhow::bail!("Time step must be between 1 and 60 minutes");
        }
        Ok(())
    }

    /// Query timeout as a `Duration`
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

/// Day and room lists offered by the wizard.
///
/// Both lists must be non-empty; there is no partial mode without them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionOptions {
    days: Vec<String>,
    rooms: Vec<String>,
}

impl SelectionOptions {
    /// Build option lists, rejecting empty ones.
    pub fn new(days: Vec<String>, rooms: Vec<String>) -> crate::error::Result<Self> {
        if days.is_empty() {
            return Err(LabCheckError::configuration(
                "no days found in the schedule data",
            ));
        }
        if rooms.is_empty() {
            return Err(LabCheckError::configuration(
                "no rooms found in the schedule data",
            ));
        }
        Ok(Self { days, rooms })
    }

    /// Read the option lists from the store.
    ///
    /// Any failure here is a configuration error: the wizard cannot start.
    pub fn load(store: &dyn OccupationStore) -> crate::error::Result<Self> {
        let days = store.distinct_days().map_err(|e| {
            LabCheckError::configuration(format!("failed to load day options: {}", e))
        })?;
        let rooms = store.distinct_rooms().map_err(|e| {
            LabCheckError::configuration(format!("failed to load room options: {}", e))
        })?;
        info!("Loaded {} day(s) and {} room(s)", days.len(), rooms.len());
        Self::new(days, rooms)
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn rooms(&self) -> &[String] {
        &self.rooms
    }

    pub fn has_day(&self, day: &str) -> bool {
        self.days.iter().any(|d| d == day)
    }

    pub fn has_room(&self, room: &str) -> bool {
        self.rooms.iter().any(|r| r == room)
    }
}
