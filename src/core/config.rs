use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::builders::validator::{ConfigValidator, StandardValidator};
use crate::core::tree::DEFAULT_INDENT_UNIT;

/// File name looked up in the current directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "dirtree.toml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ScanSettings {
    /// Descend into symlinked directories. Off by default so that a link cycle
    /// on disk can never make the scan recurse forever.
    pub follow_symlinks: bool,
    /// Directories at this depth are kept but not descended into.
    pub max_depth: Option<usize>,
    /// Sort children by name instead of keeping the listing order.
    pub sort_entries: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DisplaySettings {
    pub indent_unit: String,
    pub show_sizes: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ReportSettings {
    pub verbose: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DirTreeConfig {
    pub version: String,
    pub scan: ScanSettings,
    pub display: DisplaySettings,
    pub report: ReportSettings,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            indent_unit: DEFAULT_INDENT_UNIT.to_string(),
            show_sizes: true,
        }
    }
}

impl Default for DirTreeConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            scan: ScanSettings::default(),
            display: DisplaySettings::default(),
            report: ReportSettings::default(),
        }
    }
}

/// Command-line values that take precedence over the configuration file.
/// `None`/`false` means "keep what the file says".
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub follow_symlinks: bool,
    pub max_depth: Option<usize>,
    pub sort_entries: bool,
    pub verbose: bool,
}

impl DirTreeConfig {
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if overrides.follow_symlinks {
            self.scan.follow_symlinks = true;
        }
        if overrides.max_depth.is_some() {
            self.scan.max_depth = overrides.max_depth;
        }
        if overrides.sort_entries {
            self.scan.sort_entries = true;
        }
        if overrides.verbose {
            self.report.verbose = true;
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Uses `dirtree.toml` in the current working directory.
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to read current directory")?;
        Ok(Self::new_at(current_dir.join(DEFAULT_CONFIG_FILE)))
    }

    pub fn new_at(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Writes the default configuration unless a file already exists.
    /// Returns `true` when a new file was written.
    pub fn initialize(&self) -> Result<bool> {
        if self.config_path.exists() {
            debug!(path = %self.config_path.display(), "config already present");
            return Ok(false);
        }

        let default_config = DirTreeConfig::default();
        self.save_config(&default_config)?;
        Ok(true)
    }

    pub fn validate_config(&self) -> Result<()> {
        let config = self.load_config()?;
        let validator = StandardValidator::new();
        let issues = validator.validate_config(&config)?;

        if issues.is_empty() {
            println!("✓ Configuration is valid.");
            Ok(())
        } else {
            println!("⚠️  Found issues in configuration:");
            for issue in issues {
                println!("  - {issue}");
            }
            anyhow::bail!("Configuration validation failed.");
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

pub trait ConfigProvider {
    fn load_config(&self) -> Result<DirTreeConfig>;
    fn save_config(&self, config: &DirTreeConfig) -> Result<()>;
    fn get_config_path(&self) -> Result<PathBuf>;
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> Result<DirTreeConfig> {
        if !self.config_path.exists() {
            debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(DirTreeConfig::default());
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    fn save_config(&self, config: &DirTreeConfig) -> Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn get_config_path(&self) -> Result<PathBuf> {
        Ok(self.config_path.clone())
    }
}
