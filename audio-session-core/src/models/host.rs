use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::attributes::AudioAttributes;
use super::state::FocusGain;

/// Opaque identifier of a focus request, used to abandon it later.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusHandle(String);

impl FocusHandle {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for FocusHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FocusHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A focus request submitted to the host audio subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRequest {
    pub handle: FocusHandle,
    pub gain: FocusGain,
    /// `None` on hosts without attribute-tagged focus requests.
    pub attributes: Option<AudioAttributes>,
    pub accepts_delayed_gain: bool,
}

/// Immediate answer of the host to a focus request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequestResult {
    Granted,
    Denied,
    /// Granted later through a `FocusEvent::Gain` notification.
    Delayed,
}

/// Global audio mode of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioMode {
    #[default]
    Normal,
    Ringtone,
    InCall,
    InCommunication,
}

/// Device properties the host can report as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceProperty {
    OutputFramesPerBuffer,
    OutputSampleRate,
}

/// Hardware features a device may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemFeature {
    AudioOutput,
    AudioLowLatency,
    AudioPro,
}

/// Platform facts reported by the host once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub api_level: u32,
    pub features: BTreeSet<SystemFeature>,
}

impl PlatformInfo {
    pub fn new(api_level: u32, features: impl IntoIterator<Item = SystemFeature>) -> Self {
        Self {
            api_level,
            features: features.into_iter().collect(),
        }
    }

    pub fn has_feature(&self, feature: SystemFeature) -> bool {
        self.features.contains(&feature)
    }
}
