use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::builders::exporter::{ExportDocument, ExportFormat, SerdeExporter, TreeExporter};
use crate::builders::observer::TracingObserver;
use crate::builders::reporter::{ConsoleReporter, StatusReporter};
use crate::core::config::{ConfigManager, ConfigOverrides, ConfigProvider, DirTreeConfig};
use crate::core::engine::{ScanOutcome, TreeScanner};

/// Installs the global `tracing` subscriber. Logs go to stderr so they never
/// mix with the rendered tree on stdout. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn initialize_config(config_path: Option<PathBuf>) -> Result<()> {
    let config_manager = get_config_manager(config_path)?;
    if config_manager.initialize()? {
        println!(
            "✓ Wrote default configuration to {}",
            config_manager.config_path().display()
        );
    } else {
        println!(
            "ℹ️  Configuration already exists at {}",
            config_manager.config_path().display()
        );
    }
    Ok(())
}

pub fn validate_config(config_path: Option<PathBuf>) -> Result<()> {
    get_config_manager(config_path)?.validate_config()
}

/// Loads the configuration and layers the command-line overrides on top.
pub fn load_effective_config(
    config_path: Option<PathBuf>,
    overrides: &ConfigOverrides,
) -> Result<DirTreeConfig> {
    let mut config = get_config_manager(config_path)?.load_config()?;
    config.apply_overrides(overrides);
    Ok(config)
}

pub fn run_scan(config: &DirTreeConfig, root: &Path) -> ScanOutcome {
    TreeScanner::new(config.scan.clone())
        .with_observer(Box::new(TracingObserver))
        .scan(root)
}

/// `scan` command: print the tree, then optionally the report.
pub fn show_tree(config: &DirTreeConfig, root: &Path, with_report: bool) -> Result<()> {
    let outcome = run_scan(config, root);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    outcome
        .root
        .render(
            &mut out,
            "",
            &config.display.indent_unit,
            config.display.show_sizes,
        )
        .context("Failed to write tree")?;

    if with_report {
        writeln!(out)?;
        ConsoleReporter::new(config.report.verbose).generate_scan_report(&mut out, &outcome)?;
    }
    Ok(())
}

/// `export` command: scan and write the result in a structured format.
pub fn export_tree(
    config: &DirTreeConfig,
    root: &Path,
    output: &Path,
    format: ExportFormat,
) -> Result<()> {
    let outcome = run_scan(config, root);
    let document = ExportDocument::from(&outcome);
    SerdeExporter::new(format).export_to_file(&document, output)?;
    println!(
        "✓ Exported {} files and {} directories to {} ({format})",
        document.summary.files,
        document.summary.directories,
        output.display()
    );
    Ok(())
}

// Helper function to create ConfigManager instance
fn get_config_manager(config_path: Option<PathBuf>) -> Result<ConfigManager> {
    match config_path {
        Some(path) => Ok(ConfigManager::new_at(path)),
        None => ConfigManager::new(),
    }
}
