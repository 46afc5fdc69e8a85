use serde::{Deserialize, Serialize};

/// Where a latency figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatencySource {
    /// Computed from device-reported buffer size and sample rate.
    Device,
    /// Conservative fixed estimate; introspection was unavailable.
    Fallback,
}

/// Output latency derived from device properties. Recomputed on every query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyEstimate {
    pub buffer_frames: Option<u32>,
    pub sample_rate_hz: Option<u32>,
    pub milliseconds: f64,
    pub source: LatencySource,
}

impl LatencyEstimate {
    pub fn is_measured(&self) -> bool {
        self.source == LatencySource::Device
    }
}
