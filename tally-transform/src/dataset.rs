use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::coerce::to_number;
use crate::error::DataTransformError;

pub const KEY_FIELD: &str = "key";
pub const VALUE_FIELD: &str = "value";
pub const VALUES_FIELD: &str = "values";

/// Coordinate fields read by scatter-style consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn field_name(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// A single categorized datum within a series.
///
/// Fields are kept in insertion order and preserved verbatim, so a record
/// survives a rotation round trip unchanged. The `key` field is always a string.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRecord {
    fields: IndexMap<String, Value>,
}

impl ValueRecord {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(KEY_FIELD.to_string(), Value::String(key.into()));
        fields.insert(VALUE_FIELD.to_string(), value.into());
        Self { fields }
    }

    /// Record with a key and no value field
    pub fn keyed(key: impl Into<String>) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(KEY_FIELD.to_string(), Value::String(key.into()));
        Self { fields }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        if name == KEY_FIELD {
            // key must stay a string
            if let Value::String(key) = value {
                self.set_key(key);
            }
            return self;
        }
        self.fields.insert(name, value);
        self
    }

    pub fn from_json_map(
        fields: Map<String, Value>,
        context: &str,
    ) -> Result<Self, DataTransformError> {
        match fields.get(KEY_FIELD) {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(DataTransformError::InvalidField {
                    field: KEY_FIELD.to_string(),
                    context: context.to_string(),
                    expected: "a string".to_string(),
                })
            }
            None => {
                return Err(DataTransformError::MissingField {
                    field: KEY_FIELD.to_string(),
                    context: context.to_string(),
                })
            }
        }
        Ok(Self {
            fields: fields.into_iter().collect(),
        })
    }

    pub fn key(&self) -> &str {
        self.fields
            .get(KEY_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Overwrite the key in place, keeping its field position
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.fields
            .insert(KEY_FIELD.to_string(), Value::String(key.into()));
    }

    /// The raw `value` field, before numeric coercion
    pub fn raw_value(&self) -> Option<&Value> {
        self.fields.get(VALUE_FIELD)
    }

    /// The coerced numeric value; NaN when the field is missing or not numeric
    pub fn value(&self) -> f64 {
        to_number(self.raw_value())
    }

    pub fn coordinate(&self, axis: Axis) -> f64 {
        to_number(self.fields.get(axis.field_name()))
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }
}

impl Serialize for ValueRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValueRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        ValueRecord::from_json_map(fields, "value record").map_err(serde::de::Error::custom)
    }
}

/// A keyed row of value records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub key: String,
    pub values: Vec<ValueRecord>,
}

impl Series {
    pub fn new(key: impl Into<String>, values: Vec<ValueRecord>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    pub fn from_json(value: Value, context: &str) -> Result<Self, DataTransformError> {
        match value {
            Value::Object(map) => Self::from_json_map(map, context),
            other => Err(DataTransformError::InvalidField {
                field: context.to_string(),
                context: "dataset".to_string(),
                expected: format!("an object, found {}", describe(&other)),
            }),
        }
    }

    fn from_json_map(mut map: Map<String, Value>, context: &str) -> Result<Self, DataTransformError> {
        let key = match map.remove(KEY_FIELD) {
            Some(Value::String(key)) => key,
            Some(_) => {
                return Err(DataTransformError::InvalidField {
                    field: KEY_FIELD.to_string(),
                    context: context.to_string(),
                    expected: "a string".to_string(),
                })
            }
            None => {
                return Err(DataTransformError::MissingField {
                    field: KEY_FIELD.to_string(),
                    context: context.to_string(),
                })
            }
        };

        let values = match map.remove(VALUES_FIELD) {
            Some(Value::Array(values)) => values,
            Some(_) => {
                return Err(DataTransformError::InvalidField {
                    field: VALUES_FIELD.to_string(),
                    context: context.to_string(),
                    expected: "an array".to_string(),
                })
            }
            None => {
                return Err(DataTransformError::MissingField {
                    field: VALUES_FIELD.to_string(),
                    context: context.to_string(),
                })
            }
        };

        let values = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let record_context = format!("{context} value {i}");
                match value {
                    Value::Object(fields) => ValueRecord::from_json_map(fields, &record_context),
                    other => Err(DataTransformError::InvalidField {
                        field: format!("{VALUES_FIELD}[{i}]"),
                        context: context.to_string(),
                        expected: format!("an object, found {}", describe(&other)),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { key, values })
    }
}

/// Input dataset, normalized from its JSON shape.
///
/// An object carrying `key` is a single series; an array is a set of series.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    SingleSeries(Series),
    MultiSeries(Vec<Series>),
}

impl Dataset {
    pub fn from_json(value: Value) -> Result<Self, DataTransformError> {
        match value {
            Value::Object(map) if map.contains_key(KEY_FIELD) => Ok(Dataset::SingleSeries(
                Series::from_json_map(map, "dataset")?,
            )),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| Series::from_json(item, &format!("series {i}")))
                .collect::<Result<Vec<_>, _>>()
                .map(Dataset::MultiSeries),
            other => Err(DataTransformError::UnrecognizedShape(describe(&other))),
        }
    }

    pub fn to_json(&self) -> Result<Value, DataTransformError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn is_multi_series(&self) -> bool {
        matches!(self, Dataset::MultiSeries(_))
    }

    /// All series in input order; a single series yields itself
    pub fn series(&self) -> &[Series] {
        match self {
            Dataset::SingleSeries(series) => std::slice::from_ref(series),
            Dataset::MultiSeries(series) => series.as_slice(),
        }
    }

    /// Every value record, scanning series in input order
    pub fn records(&self) -> Box<dyn Iterator<Item = &ValueRecord> + '_> {
        match self {
            Dataset::SingleSeries(series) => Box::new(series.values.iter()),
            Dataset::MultiSeries(series) => Box::new(series.iter().flat_map(|s| s.values.iter())),
        }
    }
}

impl From<Series> for Dataset {
    fn from(series: Series) -> Self {
        Dataset::SingleSeries(series)
    }
}

impl From<Vec<Series>> for Dataset {
    fn from(series: Vec<Series>) -> Self {
        Dataset::MultiSeries(series)
    }
}

impl FromStr for Dataset {
    type Err = DataTransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dataset::from_json(serde_json::from_str(s)?)
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dataset::SingleSeries(series) => series.serialize(serializer),
            Dataset::MultiSeries(series) => series.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Dataset::from_json(value).map_err(serde::de::Error::custom)
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object without `key`",
    }
    .to_string()
}
