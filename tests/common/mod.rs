#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file contents");
        path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// Builds an SDMX-JSON data message.
///
/// `dimensions` are the series dimensions with their value ids, `periods` the
/// time dimension values, and `series` pairs a series key with its
/// `(observation index, value)` list, all in document order.
pub fn sdmx_document(
    dimensions: &[(&str, &[&str])],
    periods: &[&str],
    series: &[(&str, Vec<(usize, Value)>)],
) -> String {
    let series_dims = dimensions
        .iter()
        .map(|(id, values)| {
            json!({
                "id": id,
                "values": values.iter().map(|v| json!({"id": v})).collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();
    let time_values = periods
        .iter()
        .map(|p| json!({"id": p, "name": p}))
        .collect::<Vec<_>>();

    // Assembled by hand so series and observation order survive regardless of
    // how serde_json orders object keys.
    let series_body = series
        .iter()
        .map(|(key, observations)| {
            let obs = observations
                .iter()
                .map(|(idx, value)| format!("\"{idx}\": [{value}]"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("\"{key}\": {{\"observations\": {{{obs}}}}}")
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"{{"data": {{
            "dataSets": [{{"series": {{{series_body}}}}}],
            "structure": {{"dimensions": {{
                "series": {series},
                "observation": [{{"id": "TIME_PERIOD", "values": {time}}}]
            }}}}
        }}}}"#,
        series = Value::Array(series_dims),
        time = Value::Array(time_values),
    )
}

const SECTORS: &[&str] = &["S13"];
const TARGETING: &[&str] = &["ST"];

/// Standard tax dimensions: REF_AREA, MEASURE, SECTOR, TARGETING.
pub fn tax_dimensions<'a>(
    countries: &'a [&'a str],
    measures: &'a [&'a str],
) -> Vec<(&'a str, &'a [&'a str])> {
    vec![
        ("REF_AREA", countries),
        ("MEASURE", measures),
        ("SECTOR", SECTORS),
        ("TARGETING", TARGETING),
    ]
}
