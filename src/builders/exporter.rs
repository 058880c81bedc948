use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::core::engine::ScanOutcome;
use crate::core::report::ScanSummary;
use crate::core::tree::DirectoryEntry;

/// Output formats understood by `export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Json,
    Yaml,
    #[default]
    Toml,
}

impl FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            "toml" => Ok(ExportFormat::Toml),
            other => anyhow::bail!("Unsupported export format: {other}"),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Yaml => write!(f, "yaml"),
            ExportFormat::Toml => write!(f, "toml"),
        }
    }
}

/// Everything written by an export: the tree and its counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub summary: ScanSummary,
    pub root: DirectoryEntry,
}

impl From<&ScanOutcome> for ExportDocument {
    fn from(outcome: &ScanOutcome) -> Self {
        Self {
            summary: outcome.summary(),
            root: outcome.root.clone(),
        }
    }
}

pub trait TreeExporter {
    fn export_to_string(&self, document: &ExportDocument) -> Result<String>;

    fn export_to_file(&self, document: &ExportDocument, path: &Path) -> Result<()> {
        let content = self.export_to_string(document)?;
        std::fs::write(path, content).context("Failed to write export file")?;
        Ok(())
    }
}

/// Serializes export documents with serde in the selected format.
pub struct SerdeExporter {
    format: ExportFormat,
}

impl SerdeExporter {
    pub fn new(format: ExportFormat) -> Self {
        Self { format }
    }
}

impl TreeExporter for SerdeExporter {
    fn export_to_string(&self, document: &ExportDocument) -> Result<String> {
        let content = match self.format {
            ExportFormat::Json => {
                serde_json::to_string_pretty(document).context("Failed to serialize to JSON")?
            }
            ExportFormat::Yaml => {
                serde_yaml::to_string(document).context("Failed to serialize to YAML")?
            }
            ExportFormat::Toml => {
                toml::to_string_pretty(document).context("Failed to serialize to TOML")?
            }
        };
        Ok(content)
    }
}
