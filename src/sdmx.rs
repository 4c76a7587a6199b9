//! Typed view of an SDMX-JSON 1.0 data message.
//!
//! Only the parts the denormalizer reads are modelled: the first data set's
//! series, and the series/observation dimension descriptors from the
//! structure block. Every other field is ignored.
//!
//! Series and observation maps keep document order. SDMX addresses values by
//! position, and the pivot's first-seen-wins rule depends on traversal order,
//! so these maps deserialize into ordered `(key, value)` vectors rather than
//! hash maps.

use std::{fmt, fs, marker::PhantomData, path::Path};

use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};
use serde_json::Value as JsonValue;

use crate::error::{DivError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct DataMessage {
    pub data: MessageData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    pub data_sets: Vec<DataSet>,
    pub structure: Structure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataSet {
    #[serde(deserialize_with = "ordered_entries")]
    pub series: Vec<(String, Series)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Series {
    /// Observation index (as string) to observation record; element 0 is the value.
    #[serde(deserialize_with = "ordered_entries")]
    pub observations: Vec<(String, Vec<JsonValue>)>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Structure {
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dimensions {
    pub series: Vec<Dimension>,
    #[serde(default)]
    pub observation: Vec<Dimension>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dimension {
    pub id: String,
    pub values: Vec<DimensionValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DimensionValue {
    pub id: String,
}

impl DataMessage {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| DivError::malformed(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// `data.dataSets[0]`.
    pub fn first_dataset(&self) -> Result<&DataSet> {
        self.data
            .data_sets
            .first()
            .ok_or_else(|| DivError::malformed("data.dataSets is empty"))
    }

    pub fn series_dimensions(&self) -> &[Dimension] {
        &self.data.structure.dimensions.series
    }

    /// `data.structure.dimensions.observation[0]`, the time period axis.
    pub fn time_dimension(&self) -> Option<&Dimension> {
        self.data.structure.dimensions.observation.first()
    }
}

impl Dimension {
    pub fn value_id(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(|value| value.id.as_str())
    }
}

fn ordered_entries<'de, D, V>(deserializer: D) -> std::result::Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V> Visitor<'de> for EntriesVisitor<V>
    where
        V: Deserialize<'de>,
    {
        type Value = Vec<(String, V)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a JSON object")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_keep_document_order() {
        let text = r#"{
            "data": {
                "dataSets": [{"series": {
                    "1:0": {"observations": {"1": [2.0], "0": [1.0]}},
                    "0:0": {"observations": {}}
                }}],
                "structure": {"dimensions": {"series": [], "observation": []}}
            }
        }"#;
        let message = DataMessage::parse(text).expect("parse");
        let dataset = message.first_dataset().expect("dataset");
        let keys = dataset
            .series
            .iter()
            .map(|(key, _)| key.as_str())
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["1:0", "0:0"]);
        let observations = dataset.series[0]
            .1
            .observations
            .iter()
            .map(|(key, _)| key.as_str())
            .collect::<Vec<_>>();
        assert_eq!(observations, vec!["1", "0"]);
    }

    #[test]
    fn missing_structure_is_malformed() {
        let err = DataMessage::parse(r#"{"data": {"dataSets": []}}"#).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("structure"));
    }

    #[test]
    fn series_must_be_an_object() {
        let text = r#"{"data": {"dataSets": [{"series": []}],
            "structure": {"dimensions": {"series": []}}}}"#;
        let err = DataMessage::parse(text).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn empty_datasets_is_malformed() {
        let text = r#"{"data": {"dataSets": [],
            "structure": {"dimensions": {"series": []}}}}"#;
        let message = DataMessage::parse(text).expect("parse");
        let err = message.first_dataset().unwrap_err();
        assert!(err.to_string().contains("dataSets"));
    }
}
