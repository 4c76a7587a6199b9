//! Series-key decoding: turns the positional SDMX encoding into flat rows.
//!
//! A series key such as `3:0:1:0` holds one index per series dimension. Each
//! index selects a value from that dimension's value list. Observation keys
//! index the time dimension independently of the series dimensions.

use std::collections::HashSet;

use log::debug;
use serde_json::Value as JsonValue;

use crate::{
    error::{DivError, Result},
    sdmx::{DataMessage, Dimension},
};

pub const YEAR_COLUMN: &str = "Year";

/// One (series, observation) pair with every dimension resolved to its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Series dimension id to value id, in dimension order.
    pub dimensions: Vec<(String, String)>,
    pub year: String,
    pub value: JsonValue,
}

impl Row {
    pub fn get(&self, dimension: &str) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|(id, _)| id == dimension)
            .map(|(_, value)| value.as_str())
    }
}

pub fn decode(message: &DataMessage) -> Result<Vec<Row>> {
    let dataset = message.first_dataset()?;
    let dimensions = message.series_dimensions();
    let time = message.time_dimension();

    let mut rows = Vec::new();
    for (key, series) in &dataset.series {
        let base = resolve_series_key(key, dimensions)?;
        let mut seen = HashSet::with_capacity(series.observations.len());
        for (obs_key, observation) in &series.observations {
            let time = time.ok_or_else(|| {
                DivError::malformed("data.structure.dimensions.observation is empty")
            })?;
            let index = parse_index(obs_key).ok_or_else(|| {
                DivError::malformed(format!(
                    "series '{key}': observation index '{obs_key}' is not an integer"
                ))
            })?;
            if !seen.insert(index) {
                return Err(DivError::malformed(format!(
                    "series '{key}': observation index '{obs_key}' appears more than once"
                )));
            }
            let year = time.value_id(index).ok_or_else(|| {
                DivError::malformed(format!(
                    "series '{key}': observation index {index} is out of range for dimension '{}' ({} values)",
                    time.id,
                    time.values.len()
                ))
            })?;
            let value = observation.first().cloned().ok_or_else(|| {
                DivError::malformed(format!(
                    "series '{key}': observation '{obs_key}' has no value"
                ))
            })?;
            rows.push(Row {
                dimensions: base.clone(),
                year: year.to_string(),
                value,
            });
        }
    }
    debug!(
        "Decoded {} series into {} row(s)",
        dataset.series.len(),
        rows.len()
    );
    Ok(rows)
}

/// Resolves `i0:i1:...` against the series dimensions into (dimension id, value id) pairs.
pub fn resolve_series_key(key: &str, dimensions: &[Dimension]) -> Result<Vec<(String, String)>> {
    let parts = key.split(':').collect::<Vec<_>>();
    if parts.len() != dimensions.len() {
        return Err(DivError::malformed(format!(
            "series key '{key}' has {} component(s) but there are {} series dimension(s)",
            parts.len(),
            dimensions.len()
        )));
    }
    parts
        .iter()
        .zip(dimensions)
        .map(|(part, dimension)| {
            let index = parse_index(part).ok_or_else(|| {
                DivError::malformed(format!(
                    "series key '{key}': component '{part}' is not an integer"
                ))
            })?;
            let value = dimension.value_id(index).ok_or_else(|| {
                DivError::malformed(format!(
                    "series key '{key}': index {index} is out of range for dimension '{}' ({} values)",
                    dimension.id,
                    dimension.values.len()
                ))
            })?;
            Ok((dimension.id.clone(), value.to_string()))
        })
        .collect()
}

fn parse_index(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok()
}
