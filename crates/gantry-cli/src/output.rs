//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use gantry_domain::{identifier, ContainerRecord, ExtractionSet};
use std::fs;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tracing::info;

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the extracted record set.
    pub fn format_records(&self, records: &ExtractionSet) -> Result<String> {
        match self.format {
            CliFormat::Json => self.format_records_json(records),
            CliFormat::Table => Ok(self.format_records_table(records)),
            CliFormat::Quiet => Ok(self.format_records_quiet(records)),
        }
    }

    /// Format records as JSON.
    fn format_records_json(&self, records: &ExtractionSet) -> Result<String> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    /// Format records as a table.
    fn format_records_table(&self, records: &ExtractionSet) -> String {
        if records.is_empty() {
            return self.colorize("No containers found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Container ID", "Check", "Carrier", "Type", "Length", "Height"]);

        for (index, record) in records.iter().enumerate() {
            builder.push_record([
                &(index + 1).to_string(),
                &record.container_id,
                status_mark(record),
                &record.carrier,
                &record.container_type,
                &record.dimensions.length,
                &record.dimensions.height,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format records in quiet mode (container IDs only).
    fn format_records_quiet(&self, records: &ExtractionSet) -> String {
        let ids: Vec<&str> = records.iter().map(|r| r.container_id.as_str()).collect();
        ids.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    fn colorize(&self, message: &str, color: &str) -> String {
        if !self.color_enabled {
            return message.to_string();
        }
        match color {
            "green" => message.green().to_string(),
            "yellow" => message.yellow().to_string(),
            "red" => message.red().to_string(),
            _ => message.to_string(),
        }
    }
}

/// Check-digit status mark for one record.
fn status_mark(record: &ContainerRecord) -> &'static str {
    if record.is_unresolved() {
        return "?";
    }
    if identifier::validate(&record.container_id).is_valid() {
        "✓"
    } else {
        "✗"
    }
}

/// Write the final record set to disk as pretty JSON.
pub fn save_results(records: &ExtractionSet, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    info!("Results saved to {}", path.display());
    Ok(())
}
