use std::collections::BTreeSet;

use audio_session_core::models::host::{DeviceProperty, PlatformInfo, SystemFeature};

/// Output device characteristics reported by `DesktopAudioHost`.
///
/// `None` values model a host that cannot report the property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    pub api_level: u32,
    pub sample_rate_hz: Option<u32>,
    pub frames_per_buffer: Option<u32>,
    pub features: BTreeSet<SystemFeature>,
}

impl DeviceProfile {
    pub fn platform(&self) -> PlatformInfo {
        PlatformInfo {
            api_level: self.api_level,
            features: self.features.clone(),
        }
    }

    pub fn property(&self, key: DeviceProperty) -> Option<String> {
        match key {
            DeviceProperty::OutputFramesPerBuffer => self.frames_per_buffer.map(|f| f.to_string()),
            DeviceProperty::OutputSampleRate => self.sample_rate_hz.map(|r| r.to_string()),
        }
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            api_level: 34,
            sample_rate_hz: Some(48000),
            frames_per_buffer: Some(192),
            features: [SystemFeature::AudioOutput, SystemFeature::AudioLowLatency]
                .into_iter()
                .collect(),
        }
    }
}
