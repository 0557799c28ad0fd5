use serde::{Deserialize, Serialize};

/// One `[timestamp, "value"]` pair as encoded by Prometheus.
///
/// The value is kept as the server sent it; sample values may be `NaN`, `+Inf` or `-Inf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, String)", into = "(f64, String)")]
pub struct Sample {
    pub timestamp: f64,
    pub value: String,
}

impl Sample {
    pub fn new(timestamp: f64, value: impl Into<String>) -> Self {
        Self {
            timestamp,
            value: value.into(),
        }
    }

    /// Parse the sample value as a float.
    pub fn as_f64(&self) -> Option<f64> {
        self.value.parse().ok()
    }
}

impl From<(f64, String)> for Sample {
    fn from((timestamp, value): (f64, String)) -> Self {
        Self { timestamp, value }
    }
}

impl From<Sample> for (f64, String) {
    fn from(sample: Sample) -> Self {
        (sample.timestamp, sample.value)
    }
}
