use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::DataTransformError;

/// Fractions of the value range at which thresholds are placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdBanding {
    /// Even quarters of the range: 25%, 50%, 75% and 100%
    #[default]
    Quartile,
    /// Older uneven banding at 15%, 40%, 55% and 90%
    Legacy,
}

impl ThresholdBanding {
    pub fn fractions(&self) -> [f64; 4] {
        match self {
            ThresholdBanding::Quartile => [0.25, 0.5, 0.75, 1.0],
            ThresholdBanding::Legacy => [0.15, 0.4, 0.55, 0.9],
        }
    }
}

impl fmt::Display for ThresholdBanding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdBanding::Quartile => write!(f, "quartile"),
            ThresholdBanding::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for ThresholdBanding {
    type Err = DataTransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quartile" => Ok(ThresholdBanding::Quartile),
            "legacy" => Ok(ThresholdBanding::Legacy),
            other => Err(DataTransformError::InvalidConfig(format!(
                "unknown threshold banding '{other}', expected 'quartile' or 'legacy'"
            ))),
        }
    }
}

/// Options that shape a summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TransformConfig {
    pub threshold_banding: ThresholdBanding,
}

impl TransformConfig {
    pub fn with_threshold_banding(mut self, threshold_banding: ThresholdBanding) -> Self {
        self.threshold_banding = threshold_banding;
        self
    }
}
