//! SBOM writers (CSV and JSON).
//!
//! Both writers truncate an existing file at the target path.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::inventory::SbomRecord;

pub const CSV_FILE: &str = "sbom.csv";
pub const JSON_FILE: &str = "sbom.json";

const CSV_COLUMNS: [&str; 5] = ["name", "version", "type", "file_path", "git_commit"];

/// Write records as CSV. The header row is written even for an empty slice.
pub fn write_csv(records: &[SbomRecord], path: &Path) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer
        .write_record(CSV_COLUMNS)
        .context("Failed to write CSV header")?;
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write CSV row for {}", record.name))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Write records as a JSON array indented with four spaces.
pub fn write_json(records: &[SbomRecord], path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    records
        .serialize(&mut serializer)
        .context("Failed to serialize SBOM")?;

    out.flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}
