#[derive(Debug, thiserror::Error)]
pub enum DataTransformError {
    #[error("Dataset must be an object with a `key` field or an array of series, found {0}")]
    UnrecognizedShape(String),

    #[error("Missing field `{field}` in {context}")]
    MissingField { field: String, context: String },

    #[error("Field `{field}` in {context} must be {expected}")]
    InvalidField {
        field: String,
        context: String,
        expected: String,
    },

    #[error("Cannot rotate a single-series dataset")]
    RotateSingleSeries,

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Series `{series}` has {len} values, expected at least {expected}")]
    RaggedSeries {
        series: String,
        len: usize,
        expected: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
