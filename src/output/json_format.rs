//! JSON Lines output formatting.

use crate::error::OutputResult;
use crate::types::HostRecord;
use std::io::Write;

/// Write one self-contained JSON object per record, newline terminated.
pub fn write_jsonl<W: Write>(mut out: W, records: &[HostRecord]) -> OutputResult<()> {
    for record in records {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
