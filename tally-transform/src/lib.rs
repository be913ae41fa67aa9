pub mod coerce;
pub mod config;
pub mod dataset;
pub mod decimal;
pub mod error;
pub mod rotate;
pub mod summary;
pub mod transform;

pub use config::{ThresholdBanding, TransformConfig};
pub use dataset::{Axis, Dataset, Series, ValueRecord};
pub use error::DataTransformError;
pub use summary::{Coordinates, DataType, Summary};
pub use transform::DataTransform;
