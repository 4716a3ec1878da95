use crate::domain::schema::ModelColumn;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// Raw field values as supplied by the form, keyed by field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(field.to_string(), value.into());
        self
    }

    pub fn remove(&mut self, field: &str) -> Option<serde_json::Value> {
        self.data.remove(field)
    }
}

/// Typed form input. Converting into a `Record` sends it through the same
/// validation as untyped callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApartmentFeatures {
    pub size: i64,
    pub year_built: i64,
    pub hallway_type: String,
    pub time_to_subway: String,
    pub subway_station: String,
    pub num_facilities_in_apt: i64,
    pub num_parking: i64,
    pub num_universities: i64,
    pub num_public_offices: i64,
    pub num_other_facilities: i64,
}

impl From<ApartmentFeatures> for Record {
    fn from(f: ApartmentFeatures) -> Self {
        Record::new()
            .with("size", f.size)
            .with("year_built", f.year_built)
            .with("hallway_type", f.hallway_type)
            .with("time_to_subway", f.time_to_subway)
            .with("subway_station", f.subway_station)
            .with("num_facilities_in_apt", f.num_facilities_in_apt)
            .with("num_parking", f.num_parking)
            .with("num_universities", f.num_universities)
            .with("num_public_offices", f.num_public_offices)
            .with("num_other_facilities", f.num_other_facilities)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Integer(i64),
    Category(String),
}

impl FeatureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Integer(v) => Some(*v as f64),
            FeatureValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Integer(_) => None,
            FeatureValue::Category(v) => Some(v),
        }
    }
}

/// One validated row in the model's training-time column order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    columns: Vec<(ModelColumn, FeatureValue)>,
}

impl EncodedRecord {
    pub(crate) fn from_columns(columns: Vec<(ModelColumn, FeatureValue)>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[(ModelColumn, FeatureValue)] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|(c, _)| c.as_str()).collect()
    }

    pub fn get(&self, column: ModelColumn) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Serializes as an object keyed by trained column name, keys in column order.
impl Serialize for EncodedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in &self.columns {
            map.serialize_entry(column.as_str(), value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub raw_value: f64,
    pub formatted_value: String,
    pub accuracy_pct: f64,
    pub avg_error_amount: f64,
    #[serde(skip)]
    pub(crate) avg_error_display: String,
}

impl PredictionResult {
    pub fn accuracy_display(&self) -> String {
        format!("{:.1}%", self.accuracy_pct)
    }

    pub fn avg_error_display(&self) -> &str {
        &self.avg_error_display
    }
}
