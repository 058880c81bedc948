//! dirtree: walk a directory and show it as a tree.
//!
//! Every directory becomes a node owning its files and sub-directories, so
//! the whole hierarchy can be printed, summarised or exported in one pass.
//! Nothing found on the way stops the scan; entries that cannot be read
//! are left out and listed in the report instead.
use anyhow::Result;
use clap::{Parser, Subcommand};
use dirtree::builders::exporter::ExportFormat;
use dirtree::core::config::ConfigOverrides;
use dirtree::utils;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirtree")]
#[command(about = "Scan a directory and display it as an indented tree")]
struct Cli {
    /// Configuration file (defaults to ./dirtree.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging and a detailed report
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ScanArgs {
    /// Directory to scan
    path: PathBuf,

    /// Sort entries by name instead of listing order
    #[arg(long)]
    sort: bool,

    /// Descend into symlinked directories
    #[arg(long)]
    follow_symlinks: bool,

    /// Keep directories at this depth but do not list their contents
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_depth: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Check the configuration file for problems
    Validate,
    /// Print the directory tree
    Scan {
        #[command(flatten)]
        args: ScanArgs,

        /// Also print what happened to each entry
        #[arg(long)]
        report: bool,
    },
    /// Write the directory tree as JSON, YAML or TOML
    Export {
        #[command(flatten)]
        args: ScanArgs,

        /// Destination file
        #[arg(short, long)]
        output: PathBuf,

        /// json, yaml or toml
        #[arg(short, long, default_value = "toml")]
        format: ExportFormat,
    },
}

impl ScanArgs {
    fn overrides(&self, verbose: bool) -> ConfigOverrides {
        ConfigOverrides {
            follow_symlinks: self.follow_symlinks,
            max_depth: self.max_depth.map(|d| d as usize),
            sort_entries: self.sort,
            verbose,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);

    match cli.command {
        Commands::Init => utils::initialize_config(cli.config),
        Commands::Validate => utils::validate_config(cli.config),
        Commands::Scan { args, report } => {
            let config = utils::load_effective_config(cli.config, &args.overrides(cli.verbose))?;
            utils::show_tree(&config, &args.path, report)
        }
        Commands::Export {
            args,
            output,
            format,
        } => {
            let config = utils::load_effective_config(cli.config, &args.overrides(cli.verbose))?;
            utils::export_tree(&config, &args.path, &output, format)
        }
    }
}
