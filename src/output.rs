//! Spreadsheet output for the wide table.
//!
//! `.xlsx` paths get an Excel workbook with numeric cells stored as numbers;
//! any other path gets delimited text (tab for `.tsv`, comma otherwise). The
//! `-` path writes delimited text to stdout.
//!
//! Files are staged in a temporary file next to the destination and renamed
//! into place after the final flush, so a failed run never leaves a partial
//! table behind.

use std::{
    fs::{self, Permissions},
    io::{self, Write},
    path::Path,
};

use csv::QuoteStyle;
use log::debug;
use rust_xlsxwriter::Workbook;
use serde_json::Value as JsonValue;
use tempfile::NamedTempFile;

use crate::{
    error::{DivError, Result},
    pivot::{WideTable, render_value},
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Delimited(u8),
    Workbook,
}

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

pub fn resolve_output_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| {
        if has_extension(path, "tsv") {
            DEFAULT_TSV_DELIMITER
        } else {
            DEFAULT_CSV_DELIMITER
        }
    })
}

/// Picks the output format from the destination. A delimiter only applies to text output.
pub fn resolve_output_format(path: &Path, delimiter: Option<u8>) -> OutputFormat {
    if !is_dash(path) && has_extension(path, "xlsx") {
        OutputFormat::Workbook
    } else {
        OutputFormat::Delimited(resolve_output_delimiter(path, delimiter))
    }
}

pub fn write_table(table: &WideTable, path: &Path, format: OutputFormat) -> Result<()> {
    if is_dash(path) {
        let delimiter = match format {
            OutputFormat::Delimited(delimiter) => delimiter,
            OutputFormat::Workbook => DEFAULT_CSV_DELIMITER,
        };
        let stdout = io::stdout();
        return write_records(table, stdout.lock(), delimiter);
    }
    let staged = stage_beside(path)?;
    match format {
        OutputFormat::Delimited(delimiter) => write_records(table, staged.as_file(), delimiter)?,
        OutputFormat::Workbook => write_workbook(table, staged.as_file())?,
    }
    persist_staged(staged, path)?;
    debug!("Persisted {} row(s) to {path:?}", table.rows.len());
    Ok(())
}

pub fn write_records<W: Write>(table: &WideTable, sink: W, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .from_writer(sink);
    writer.write_record(table.headers())?;
    for record in table.records() {
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes a single-sheet workbook. Numbers become numeric cells, absent and
/// null values leave the cell blank.
pub fn write_workbook<W>(table: &WideTable, sink: W) -> Result<()>
where
    W: Write + io::Seek + Send,
{
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in table.headers().iter().enumerate() {
        sheet.write_string(0, column_index(col)?, header)?;
    }
    for (idx, row) in table.rows.iter().enumerate() {
        let line = u32::try_from(idx + 1)
            .map_err(|_| DivError::malformed("table has more rows than a worksheet holds"))?;
        sheet.write_string(line, 0, &row.country)?;
        sheet.write_string(line, 1, &row.year)?;
        for (offset, column) in table.columns.iter().enumerate() {
            let col = column_index(offset + 2)?;
            match row.cell(column) {
                None | Some(JsonValue::Null) => {}
                Some(JsonValue::Number(number)) => match number.as_f64() {
                    Some(value) => {
                        sheet.write_number(line, col, value)?;
                    }
                    None => {
                        sheet.write_string(line, col, number.to_string())?;
                    }
                },
                Some(other) => {
                    sheet.write_string(line, col, render_value(other))?;
                }
            }
        }
    }
    workbook.save_to_writer(sink)?;
    Ok(())
}

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col)
        .map_err(|_| DivError::malformed("table has more columns than a worksheet holds"))
}

/// Opens a temporary file in the destination's directory so the final rename stays on one filesystem.
pub(crate) fn stage_beside(path: &Path) -> Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    Ok(NamedTempFile::new_in(parent)?)
}

/// Moves a staged file over `path`. The result keeps the permissions of the
/// file it replaces, or gets ordinary file permissions when `path` is new,
/// instead of the owner-only mode temporary files are created with.
pub(crate) fn persist_staged(staged: NamedTempFile, path: &Path) -> Result<()> {
    let permissions = match fs::metadata(path) {
        Ok(existing) => Some(existing.permissions()),
        Err(_) => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        staged.as_file().set_permissions(permissions)?;
    }
    staged.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
