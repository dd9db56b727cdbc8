//! Output formatting for the CLI.
//!
//! This module provides human-readable and JSON output for the aggregated
//! ownership data and the delivery outcome.

use crate::cli::endor::Submission;
use colored::Colorize;
use owners_inventory_core::{AggregateStats, CodeOwnersPayload, OwnershipMap};
use std::io::Write;

/// Writes the payload as plain pretty-printed JSON.
pub fn write_json_payload<W: Write>(
    writer: &mut W,
    payload: &CodeOwnersPayload<'_>,
) -> std::io::Result<()> {
    let json = payload.to_json_pretty().map_err(std::io::Error::other)?;
    writeln!(writer, "{}", json)
}

/// Output formatter for human-readable console output.
pub struct HumanOutput<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> HumanOutput<W> {
    /// Creates a new human output formatter.
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Writes a section header.
    pub fn write_header(&mut self, title: &str) -> std::io::Result<()> {
        let header = format!("==> {}", title);
        if self.use_colors {
            writeln!(self.writer, "\n{}", header.cyan().bold())?;
        } else {
            writeln!(self.writer, "\n{}", header)?;
        }
        Ok(())
    }

    /// Writes every directory with its declarations.
    pub fn write_ownership(&mut self, map: &OwnershipMap) -> std::io::Result<()> {
        self.write_header("Ownership")?;

        if map.is_empty() {
            writeln!(self.writer, "  (no declarations found)")?;
            return Ok(());
        }

        for (directory, entry) in map.iter() {
            let name = if directory.is_empty() { "/" } else { directory };
            if self.use_colors {
                writeln!(self.writer, "  {}", name.bold())?;
            } else {
                writeln!(self.writer, "  {}", name)?;
            }
            for (label, owner) in entry.pairs() {
                writeln!(self.writer, "    {}: {}", label, owner)?;
            }
        }
        Ok(())
    }

    /// Writes a summary of the aggregation pass.
    pub fn write_summary(&mut self, stats: &AggregateStats, directories: usize) -> std::io::Result<()> {
        writeln!(self.writer)?;

        let message = format!(
            "✓ Collected {} director(ies) from {} OWNERS file(s)",
            directories, stats.discovered
        );
        if self.use_colors {
            writeln!(self.writer, "{}", message.green().bold())?;
        } else {
            writeln!(self.writer, "{}", message)?;
        }

        let skipped = [
            (stats.empty, "without declarations"),
            (stats.missing, "missing"),
            (stats.failed, "unreadable"),
            (stats.replaced, "replacing an earlier entry"),
        ];
        for (count, reason) in skipped.into_iter().filter(|(count, _)| *count > 0) {
            let note = format!("  {} file(s) {}", count, reason);
            if self.use_colors {
                writeln!(self.writer, "{}", note.yellow())?;
            } else {
                writeln!(self.writer, "{}", note)?;
            }
        }
        Ok(())
    }

    /// Writes the request a dry run would have sent.
    pub fn write_dry_run(&mut self, url: &str, payload: &CodeOwnersPayload<'_>) -> std::io::Result<()> {
        self.write_header("Payload")?;
        let json = payload.to_json_pretty().map_err(std::io::Error::other)?;
        writeln!(self.writer, "{}", json)?;
        writeln!(self.writer)?;

        let message = format!("Dry run: not posting to {}", url);
        if self.use_colors {
            writeln!(self.writer, "{}", message.yellow().bold())?;
        } else {
            writeln!(self.writer, "{}", message)?;
        }
        writeln!(self.writer, "Pass --no-dry-run to send the payload.")?;
        Ok(())
    }

    /// Writes a successful submission.
    pub fn write_submission(&mut self, url: &str, submission: &Submission) -> std::io::Result<()> {
        let message = format!("✓ Posted code owner data to {} ({})", url, submission.status);
        if self.use_colors {
            writeln!(self.writer, "{}", message.green().bold())?;
        } else {
            writeln!(self.writer, "{}", message)?;
        }
        if !submission.body.is_empty() {
            writeln!(self.writer, "Response body: {}", submission.body)?;
        }
        Ok(())
    }

    /// Writes a startup or delivery error.
    pub fn write_error(&mut self, message: &str) -> std::io::Result<()> {
        if self.use_colors {
            writeln!(self.writer, "{} {}", "Error:".red().bold(), message)?;
        } else {
            writeln!(self.writer, "Error: {}", message)?;
        }
        Ok(())
    }
}
