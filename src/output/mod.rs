//! Output module.
//!
//! Writes the final inventory to a line-delimited file (JSON Lines or CSV)
//! and provides the console message helpers.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{write_csv, CSV_HEADER};
pub use json_format::write_jsonl;
pub use plain::{
    print_error, print_info, print_range_summary, print_success, print_warning, written_message,
};

use crate::cli::OutputFormat;
use crate::error::{OutputError, OutputResult};
use crate::types::HostRecord;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Write `records` to `path` in `format`, replacing any existing file.
///
/// Returns the number of records written.
pub fn write_inventory(records: &[HostRecord], path: &Path, format: OutputFormat) -> OutputResult<usize> {
    let file = File::create(path).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let out = BufWriter::new(file);

    match format {
        OutputFormat::Jsonl => write_jsonl(out, records)?,
        OutputFormat::Csv => write_csv(out, records)?,
    }

    info!(records = records.len(), path = %path.display(), %format, "inventory written");
    Ok(records.len())
}
