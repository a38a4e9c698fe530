// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// When a stored file has a lower version it is migrated on load.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

pub const CONFIG_ENV_VAR: &str = "MYFLIGHT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Absent in files written before versioning, which reads as v0.
    #[serde(default)]
    pub schema_version: u32,
    /// Scheduled durations shorter than this are treated as timezone errors.
    /// Empirical; no commercial sector is scheduled below it.
    pub min_plausible_minutes: i64,
    /// Effective block speed for the distance fallback (13.5 km/min ~ 810 km/h).
    pub cruise_km_per_minute: f64,
    pub ground_allowance_minutes: f64,
    /// Optional `iata,name,city,lat,lon` table layered over the built-in one.
    pub airports_csv: Option<PathBuf>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            min_plausible_minutes: 20,
            cruise_km_per_minute: 13.5,
            ground_allowance_minutes: 30.0,
            airports_csv: None,
        }
    }
}

pub fn get_config_root() -> PathBuf {
    ProjectDirs::from("org", "myflight", "myflight")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl NormalizerConfig {
    pub fn default_path() -> PathBuf {
        get_config_root().join("config.json")
    }

    /// Loads the configuration, returning defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("[Config] No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: NormalizerConfig = serde_json::from_str(&content)
            .map_err(|e| {
                log::error!("[Config] JSON parse error for {:?}: {}", path, e);
                e
            })
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        if config.schema_version < CURRENT_SCHEMA_VERSION {
            config.migrate();
        }

        if let Some(csv) = config.airports_csv.take() {
            // Relative table paths are relative to the config file, not the cwd
            config.airports_csv = Some(if csv.is_relative() {
                path.parent().map(|p| p.join(&csv)).unwrap_or(csv)
            } else {
                csv
            });
        }

        config.validate()?;
        Ok(config)
    }

    fn migrate(&mut self) {
        log::info!(
            "[Config] Migrating config from schema v{} to v{}",
            self.schema_version,
            CURRENT_SCHEMA_VERSION
        );

        // v0 files predate versioning and share the v1 layout; only the stamp changes
        self.schema_version = CURRENT_SCHEMA_VERSION;
    }

    fn validate(&self) -> Result<()> {
        if !(self.cruise_km_per_minute.is_finite() && self.cruise_km_per_minute > 0.0) {
            anyhow::bail!(
                "cruise_km_per_minute must be a positive number, got {}",
                self.cruise_km_per_minute
            );
        }
        if self.min_plausible_minutes < 0 {
            anyhow::bail!(
                "min_plausible_minutes must not be negative, got {}",
                self.min_plausible_minutes
            );
        }
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        log::debug!("[Config] Saved config to {:?}", path);
        Ok(())
    }
}
