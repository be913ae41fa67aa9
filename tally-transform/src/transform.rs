use serde_json::Value;

use crate::config::TransformConfig;
use crate::dataset::{Dataset, Series};
use crate::error::DataTransformError;
use crate::rotate::rotate;
use crate::summary::{summarize, Summary};

/// Summarizes and pivots a chart dataset.
///
/// Nothing is memoized: every call to [`DataTransform::summary`] or
/// [`DataTransform::rotate`] reads the dataset as it is at call time.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTransform {
    dataset: Dataset,
    config: TransformConfig,
}

impl DataTransform {
    pub fn new(dataset: impl Into<Dataset>) -> Self {
        Self::with_config(dataset, TransformConfig::default())
    }

    pub fn with_config(dataset: impl Into<Dataset>, config: TransformConfig) -> Self {
        Self {
            dataset: dataset.into(),
            config,
        }
    }

    pub fn from_json(value: Value) -> Result<Self, DataTransformError> {
        Ok(Self::new(Dataset::from_json(value)?))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn dataset_mut(&mut self) -> &mut Dataset {
        &mut self.dataset
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.dataset, &self.config)
    }

    /// Pivot a multi-series dataset; see [`crate::rotate::rotate`]
    pub fn rotate(&self) -> Result<Vec<Series>, DataTransformError> {
        match &self.dataset {
            Dataset::SingleSeries(_) => Err(DataTransformError::RotateSingleSeries),
            Dataset::MultiSeries(series) => rotate(series),
        }
    }
}

impl From<Dataset> for DataTransform {
    fn from(dataset: Dataset) -> Self {
        Self::new(dataset)
    }
}
