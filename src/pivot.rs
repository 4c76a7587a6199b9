//! Long-to-wide reshaping of decoded rows.
//!
//! Rows group by (REF_AREA, Year); each group maps a derived `Tax_Type` to one
//! value. When a group sees the same `Tax_Type` twice the first value stays and
//! later ones are dropped. A dropped value that differs from the kept one is
//! reported as a [`Conflict`] so the ambiguity is visible, but it never fails
//! the run.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet, hash_map::Entry},
};

use log::{debug, warn};
use serde_json::Value as JsonValue;

use crate::{
    decode::{Row, YEAR_COLUMN},
    error::{DivError, Result},
};

pub const AREA_DIMENSION: &str = "REF_AREA";
pub const COUNTRY_COLUMN: &str = "Country";
pub const TAX_TYPE_COLUMN: &str = "Tax_Type";
/// Dimensions joined with `_` to form the `Tax_Type` column identity.
pub const TAX_TYPE_DIMENSIONS: [&str; 3] = ["MEASURE", "SECTOR", "TARGETING"];

/// An ambiguous observation: two rows for one (Country, Year, Tax_Type) with different values.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub country: String,
    pub year: String,
    pub tax_type: String,
    pub kept: JsonValue,
    pub dropped: JsonValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub country: String,
    pub year: String,
    pub cells: HashMap<String, JsonValue>,
}

impl WideRow {
    pub fn cell(&self, tax_type: &str) -> Option<&JsonValue> {
        self.cells.get(tax_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    /// `Tax_Type` columns in the order they were first encountered.
    pub columns: Vec<String>,
    /// Sorted by Country, then Year.
    pub rows: Vec<WideRow>,
    pub conflicts: Vec<Conflict>,
}

impl WideTable {
    pub fn headers(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(self.columns.len() + 2);
        headers.push(COUNTRY_COLUMN.to_string());
        headers.push(YEAR_COLUMN.to_string());
        headers.extend(self.columns.iter().cloned());
        headers
    }

    /// Rows rendered as strings in header order; absent cells are empty.
    pub fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = Vec::with_capacity(self.columns.len() + 2);
                record.push(row.country.clone());
                record.push(row.year.clone());
                record.extend(
                    self.columns
                        .iter()
                        .map(|column| row.cell(column).map(render_value).unwrap_or_default()),
                );
                record
            })
            .collect()
    }
}

pub fn tax_type(row: &Row) -> Result<String> {
    let parts = TAX_TYPE_DIMENSIONS
        .iter()
        .map(|dimension| {
            row.get(dimension).ok_or_else(|| {
                DivError::malformed(format!(
                    "row for year {} has no {dimension} dimension; cannot derive {TAX_TYPE_COLUMN}",
                    row.year
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join("_"))
}

pub fn pivot(rows: &[Row]) -> Result<WideTable> {
    let mut columns = Vec::new();
    let mut known_columns = HashSet::new();
    let mut groups: HashMap<(String, String), HashMap<String, JsonValue>> = HashMap::new();
    let mut conflicts = Vec::new();

    for row in rows {
        let country = row.get(AREA_DIMENSION).ok_or_else(|| {
            DivError::malformed(format!(
                "row for year {} has no {AREA_DIMENSION} dimension",
                row.year
            ))
        })?;
        let key = tax_type(row)?;
        // Null observations create neither a row nor a column.
        if row.value.is_null() {
            continue;
        }
        if known_columns.insert(key.clone()) {
            columns.push(key.clone());
        }
        let cells = groups
            .entry((country.to_string(), row.year.clone()))
            .or_default();
        match cells.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(row.value.clone());
            }
            Entry::Occupied(slot) => {
                if !same_value(slot.get(), &row.value) {
                    warn!(
                        "Ambiguous observation for {country} {} {}: keeping {}, dropping {}",
                        row.year,
                        slot.key(),
                        slot.get(),
                        row.value
                    );
                    conflicts.push(Conflict {
                        country: country.to_string(),
                        year: row.year.clone(),
                        tax_type: slot.key().clone(),
                        kept: slot.get().clone(),
                        dropped: row.value.clone(),
                    });
                }
            }
        }
    }

    let mut wide = groups
        .into_iter()
        .map(|((country, year), cells)| WideRow {
            country,
            year,
            cells,
        })
        .collect::<Vec<_>>();
    wide.sort_by(|a, b| {
        a.country
            .cmp(&b.country)
            .then_with(|| compare_years(&a.year, &b.year))
    });
    debug!(
        "Pivoted {} row(s) into {} (country, year) group(s) across {} column(s)",
        rows.len(),
        wide.len(),
        columns.len()
    );

    Ok(WideTable {
        columns,
        rows: wide,
        conflicts,
    })
}

/// Integer labels compare numerically, anything else by string.
pub fn compare_years(left: &str, right: &str) -> Ordering {
    match (left.trim().parse::<i64>(), right.trim().parse::<i64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| left.cmp(right)),
        _ => left.cmp(right),
    }
}

pub fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn same_value(left: &JsonValue, right: &JsonValue) -> bool {
    match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}
