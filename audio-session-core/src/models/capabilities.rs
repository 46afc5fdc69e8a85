use serde::{Deserialize, Serialize};

use super::host::{PlatformInfo, SystemFeature};

/// First API level with attribute-tagged focus requests.
pub const API_LEVEL_FOCUS_REQUEST: u32 = 26;

/// First API level that reports output buffer size and sample rate.
pub const API_LEVEL_LATENCY_INTROSPECTION: u32 = 29;

/// What the host platform supports, detected once at startup.
///
/// Components consult this record instead of branching on the API level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub focus_request_api: bool,
    pub latency_introspection: bool,
    pub low_latency_output: bool,
    pub pro_audio: bool,
    pub attribute_reconfiguration: bool,
}

impl Capabilities {
    pub fn detect(platform: &PlatformInfo) -> Self {
        let focus_request_api = platform.api_level >= API_LEVEL_FOCUS_REQUEST;
        let pro_audio = platform.has_feature(SystemFeature::AudioPro);
        let caps = Self {
            focus_request_api,
            latency_introspection: platform.api_level >= API_LEVEL_LATENCY_INTROSPECTION,
            low_latency_output: pro_audio || platform.has_feature(SystemFeature::AudioLowLatency),
            pro_audio,
            attribute_reconfiguration: focus_request_api,
        };
        log::info!("Detected audio capabilities (api {}): {:?}", platform.api_level, caps);
        caps
    }
}
