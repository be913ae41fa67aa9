use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use serde::{Serialize, Serializer};

use crate::coerce::to_text;
use crate::config::{ThresholdBanding, TransformConfig};
use crate::dataset::{Axis, Dataset, Series};
use crate::decimal::{decimal_places, round_to, MAX_DECIMAL_PLACES};
use crate::error::DataTransformError;

/// Shape of the summarized dataset. Serializes as `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    SingleSeries,
    MultiSeries,
}

impl DataType {
    pub fn code(&self) -> u8 {
        match self {
            DataType::SingleSeries => 1,
            DataType::MultiSeries => 2,
        }
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// One value per coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Coordinates<T> {
    pub fn from_fn(mut f: impl FnMut(Axis) -> T) -> Self {
        Self {
            x: f(Axis::X),
            y: f(Axis::Y),
            z: f(Axis::Z),
        }
    }

    pub fn get(&self, axis: Axis) -> &T {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

/// Derived statistics for a dataset, used to parameterize chart scales.
///
/// Statistics that have no input to draw from (e.g. the minimum of an empty
/// dataset) are NaN, which serializes as `null`. Row and column statistics
/// only apply to the shape named in their field docs; for the other shape
/// they are empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub data_type: DataType,
    /// Single-series only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_key: Option<String>,
    /// Single-series only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_total: Option<f64>,
    /// Multi-series only, duplicates kept
    pub row_keys: Vec<String>,
    /// Multi-series only
    pub row_totals: IndexMap<String, f64>,
    pub row_totals_min: f64,
    pub row_totals_max: f64,
    /// Field names of the first record of the first series. Empty when that
    /// series has no records, even if later series do.
    pub row_values_keys: Vec<String>,
    pub column_keys: Vec<String>,
    /// Multi-series only
    pub column_totals: IndexMap<String, f64>,
    pub column_totals_min: f64,
    pub column_totals_max: f64,
    pub value_min: f64,
    pub value_max: f64,
    pub value_extent: [f64; 2],
    pub value_extent_stacked: [f64; 2],
    pub coordinates_min: Coordinates<f64>,
    pub coordinates_max: Coordinates<f64>,
    pub coordinates_extent: Coordinates<[f64; 2]>,
    pub max_decimal_place: u32,
    pub thresholds: [f64; 4],
}

impl Summary {
    pub fn to_json(&self) -> Result<serde_json::Value, DataTransformError> {
        Ok(serde_json::to_value(self)?)
    }
}

pub(crate) fn summarize(dataset: &Dataset, config: &TransformConfig) -> Summary {
    let data_type = match dataset {
        Dataset::SingleSeries(_) => DataType::SingleSeries,
        Dataset::MultiSeries(_) => DataType::MultiSeries,
    };
    debug!(
        "Summarizing {:?} dataset with {} series",
        data_type,
        dataset.series().len()
    );

    let (row_key, row_total) = match dataset {
        Dataset::SingleSeries(series) => (
            Some(series.key.clone()),
            Some(series.values.iter().map(|r| r.value()).sum::<f64>()),
        ),
        Dataset::MultiSeries(_) => (None, None),
    };

    let multi: &[Series] = match dataset {
        Dataset::MultiSeries(series) => series.as_slice(),
        Dataset::SingleSeries(_) => &[],
    };

    let row_keys = multi.iter().map(|s| s.key.clone()).collect::<Vec<_>>();
    let row_totals = row_totals(multi);
    let [row_totals_min, row_totals_max] = extent(row_totals.values().copied());
    let column_totals = column_totals(multi);
    let [column_totals_min, column_totals_max] = extent(column_totals.values().copied());

    let row_values_keys = dataset
        .series()
        .first()
        .and_then(|s| s.values.first())
        .map(|record| record.field_names().map(str::to_string).collect::<Vec<_>>())
        .unwrap_or_default();

    let column_keys: Vec<String> = match dataset {
        Dataset::SingleSeries(series) => series
            .values
            .iter()
            .map(|r| r.key().to_string())
            .collect(),
        Dataset::MultiSeries(series) => union_column_keys(series),
    };

    let value_extent = extent(dataset.records().map(|r| r.value()));
    let [value_min, value_max] = value_extent;

    let coordinates_extent =
        Coordinates::from_fn(|axis| extent(dataset.records().map(|r| r.coordinate(axis))));
    let coordinates_min = Coordinates::from_fn(|axis| coordinates_extent.get(axis)[0]);
    let coordinates_max = Coordinates::from_fn(|axis| coordinates_extent.get(axis)[1]);

    let max_decimal_place = max_decimal_place(multi);
    let thresholds = thresholds(
        value_min,
        value_max,
        max_decimal_place,
        config.threshold_banding,
    );

    Summary {
        data_type,
        row_key,
        row_total,
        row_keys,
        row_totals,
        row_totals_min,
        row_totals_max,
        row_values_keys,
        column_keys,
        column_totals,
        column_totals_min,
        column_totals_max,
        value_min,
        value_max,
        value_extent,
        value_extent_stacked: stacked_extent(multi),
        coordinates_min,
        coordinates_max,
        coordinates_extent,
        max_decimal_place,
        thresholds,
    }
}

/// Min and max of the non-NaN values, NaN when there are none
fn extent(values: impl IntoIterator<Item = f64>) -> [f64; 2] {
    values
        .into_iter()
        .fold([f64::NAN, f64::NAN], |[min, max], v| [min.min(v), max.max(v)])
}

fn row_totals(series: &[Series]) -> IndexMap<String, f64> {
    let mut totals = IndexMap::new();
    for s in series {
        for record in &s.values {
            *totals.entry(s.key.clone()).or_insert(0.0) += record.value();
        }
    }
    totals
}

fn column_totals(series: &[Series]) -> IndexMap<String, f64> {
    let mut totals = IndexMap::new();
    for record in series.iter().flat_map(|s| s.values.iter()) {
        *totals.entry(record.key().to_string()).or_insert(0.0) += record.value();
    }
    totals
}

/// Union of value keys in first-seen order across all series
fn union_column_keys(series: &[Series]) -> Vec<String> {
    series
        .iter()
        .flat_map(|s| s.values.iter().map(|r| r.key()))
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Lowest per-row sum of negatives and highest per-row sum of positives
fn stacked_extent(series: &[Series]) -> [f64; 2] {
    let mut lowest_negative_sum = f64::INFINITY;
    let mut highest_positive_sum = f64::NEG_INFINITY;

    for s in series {
        let mut negative_sum = 0.0;
        let mut positive_sum = 0.0;
        for value in s.values.iter().map(|r| r.value()) {
            if value < 0.0 {
                negative_sum += value;
            } else if value > 0.0 {
                positive_sum += value;
            }
        }
        lowest_negative_sum = lowest_negative_sum.min(negative_sum);
        highest_positive_sum = highest_positive_sum.max(positive_sum);
    }

    [
        if lowest_negative_sum == f64::INFINITY {
            0.0
        } else {
            lowest_negative_sum
        },
        if highest_positive_sum == f64::NEG_INFINITY {
            0.0
        } else {
            highest_positive_sum
        },
    ]
}

fn max_decimal_place(series: &[Series]) -> u32 {
    let max = series
        .iter()
        .flat_map(|s| s.values.iter())
        .map(|r| decimal_places(&to_text(r.raw_value())))
        .max()
        .unwrap_or(0);

    if max > MAX_DECIMAL_PLACES {
        trace!("Clamping {max} decimal places to {MAX_DECIMAL_PLACES}");
    }
    max.min(MAX_DECIMAL_PLACES)
}

fn thresholds(min: f64, max: f64, places: u32, banding: ThresholdBanding) -> [f64; 4] {
    let distance = max - min;
    banding
        .fractions()
        .map(|fraction| round_to(min + fraction * distance, places))
}
