use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use crate::core::engine::ScanOutcome;
use crate::core::report::{EntryOutcome, EntryRecord, ScanSummary};

pub trait StatusReporter {
    fn generate_scan_report(&self, out: &mut dyn Write, outcome: &ScanOutcome) -> Result<()>;
}

/// A concrete implementation of `StatusReporter` that writes a human-readable
/// report, used by `scan --report`.
pub struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    /// Constructs a new `ConsoleReporter`. In verbose mode every recorded entry
    /// is listed, not only the problems.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Formats a single report line with an icon describing the outcome.
    ///
    /// 🟢: added normally.
    /// 🟡: added, but with missing information or not descended into.
    /// 🔴: left out of the tree.
    fn format_record(&self, record: &EntryRecord) -> String {
        let status_icon = match record.outcome {
            EntryOutcome::Added => "🟢",
            EntryOutcome::AddedWithoutSize { .. } | EntryOutcome::Truncated { .. } => "🟡",
            EntryOutcome::SkippedUnsupported { .. } | EntryOutcome::SkippedError { .. } => "🔴",
        };
        format!("{} {} ({})", status_icon, record.path.display(), record.outcome)
    }

    fn write_summary(&self, out: &mut dyn Write, summary: &ScanSummary) -> Result<()> {
        writeln!(out, "\n📈 Summary:")?;
        writeln!(out, "  Files: {}", summary.files)?;
        writeln!(out, "  Directories: {}", summary.directories)?;
        writeln!(out, "  Total bytes: {}", summary.total_bytes)?;
        writeln!(out, "  Unknown sizes: {}", summary.unknown_sizes)?;
        writeln!(out, "  Skipped (unknown type): {}", summary.skipped_unsupported)?;
        writeln!(out, "  Skipped (errors): {}", summary.skipped_errors)?;
        writeln!(out, "  Not descended: {}", summary.truncated)?;
        Ok(())
    }
}

impl StatusReporter for ConsoleReporter {
    fn generate_scan_report(&self, out: &mut dyn Write, outcome: &ScanOutcome) -> Result<()> {
        let report = &outcome.report;
        writeln!(out, "📊 Scan Report for {}", report.root.display())?;
        writeln!(out, "=====================================")?;

        // The root could not be read at all, so there is nothing else to say.
        if let Some(reason) = &report.root_error {
            writeln!(
                out,
                "{}",
                format!("⚠️  Root unavailable: {reason}").yellow().bold()
            )?;
            return Ok(());
        }

        if self.verbose {
            for record in &report.entries {
                writeln!(out, "{}", self.format_record(record))?;
            }
        } else if report.is_clean() {
            writeln!(out, "{}", "✓ Every entry was added.".green())?;
        } else {
            for record in report.problems() {
                writeln!(out, "{}", self.format_record(record))?;
            }
        }

        self.write_summary(out, &outcome.summary())?;
        Ok(())
    }
}
