use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::attributes::AudioAttributes;
use super::error::SessionError;
use super::permissions::PermissionSet;
use super::state::FocusGain;

/// Latency reported when the device cannot be introspected.
pub const DEFAULT_FALLBACK_LATENCY_MS: f64 = 20.0;

/// Configuration for an audio session.
///
/// Loadable from JSON; absent fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Capabilities that must all be granted before initialization (default: record + modify settings).
    pub required_permissions: PermissionSet,

    /// Attributes used when `initializeAudio` is called without any.
    pub default_attributes: AudioAttributes,

    pub focus_gain: FocusGain,

    /// Let the host answer "delayed" instead of denying outright (default: true).
    pub accepts_delayed_focus_gain: bool,

    /// Put the host into normal audio mode before requesting focus (default: true).
    pub normalize_audio_mode: bool,

    /// Latency estimate when introspection is unavailable (default: 20.0 ms).
    pub fallback_latency_ms: f64,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.fallback_latency_ms.is_finite() || self.fallback_latency_ms <= 0.0 {
            return Err(format!(
                "fallback latency must be positive, got {}",
                self.fallback_latency_ms
            ));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, SessionError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SessionError::ConfigurationFailed(format!("failed to parse config: {}", e)))?;
        config.validate().map_err(SessionError::ConfigurationFailed)?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SessionError> {
        let json = fs::read_to_string(path)
            .map_err(|e| SessionError::ConfigurationFailed(format!("failed to read config: {}", e)))?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, SessionError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            SessionError::ConfigurationFailed(format!("failed to serialize config: {}", e))
        })
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            required_permissions: PermissionSet::default(),
            default_attributes: AudioAttributes::default(),
            focus_gain: FocusGain::Gain,
            accepts_delayed_focus_gain: true,
            normalize_audio_mode: true,
            fallback_latency_ms: DEFAULT_FALLBACK_LATENCY_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attributes::{AudioUsage, ContentType};
    use crate::models::permissions::Capability;

    #[test]
    fn default_validates() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_fallback() {
        let mut config = SessionConfig::default();
        config.fallback_latency_ms = 0.0;
        assert!(config.validate().is_err());
        config.fallback_latency_ms = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SessionConfig::from_json_str(
            r#"{
                "required_permissions": ["record_audio"],
                "default_attributes": { "usage": "game" },
                "focus_gain": "gain_transient_may_duck"
            }"#,
        )
        .unwrap();

        assert_eq!(config.required_permissions, PermissionSet::new([Capability::RecordAudio]));
        assert_eq!(
            config.default_attributes,
            AudioAttributes::new(AudioUsage::Game, ContentType::Music)
        );
        assert_eq!(config.focus_gain, FocusGain::GainTransientMayDuck);
        assert!(config.accepts_delayed_focus_gain);
        assert_eq!(config.fallback_latency_ms, DEFAULT_FALLBACK_LATENCY_MS);
    }

    #[test]
    fn invalid_json_is_configuration_failure() {
        let err = SessionConfig::from_json_str(r#"{"fallback_latency_ms": -1.0}"#).unwrap_err();
        assert!(matches!(err, SessionError::ConfigurationFailed(_)));

        let err = SessionConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, SessionError::ConfigurationFailed(_)));
    }

    #[test]
    fn round_trips_through_file() {
        let mut config = SessionConfig::default();
        config.normalize_audio_mode = false;

        let path = std::env::temp_dir().join(format!(
            "audio-session-config-{}.json",
            uuid::Uuid::new_v4()
        ));
        fs::write(&path, config.to_json_pretty().unwrap()).unwrap();
        let loaded = SessionConfig::from_json_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_configuration_failure() {
        let err = SessionConfig::from_json_file(Path::new("/nonexistent/session.json")).unwrap_err();
        assert!(matches!(err, SessionError::ConfigurationFailed(_)));
    }
}
