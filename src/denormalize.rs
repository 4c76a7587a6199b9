//! File-to-file denormalization: SDMX-JSON in, wide spreadsheet out.

use std::path::Path;

use log::{debug, info};

use crate::{
    decode::decode,
    error::Result,
    output,
    pivot::{WideTable, pivot},
    sdmx::DataMessage,
};

/// Loads, decodes and pivots `input` without writing anything.
pub fn load_table(input: &Path) -> Result<WideTable> {
    let message = DataMessage::load(input)?;
    let rows = decode(&message)?;
    info!("Decoded {} observation row(s) from {input:?}", rows.len());
    let table = pivot(&rows)?;
    debug!(
        "Wide table has {} row(s), {} tax type column(s), {} conflict(s)",
        table.rows.len(),
        table.columns.len(),
        table.conflicts.len()
    );
    Ok(table)
}

/// Full denormalize pass. Output exists only if every step succeeded.
pub fn run(input: &Path, output: &Path, delimiter: Option<u8>) -> Result<WideTable> {
    let table = load_table(input)?;
    let format = output::resolve_output_format(output, delimiter);
    debug!("Writing {output:?} as {format:?}");
    output::write_table(&table, output, format)?;
    Ok(table)
}
