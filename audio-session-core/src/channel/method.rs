use std::fmt;
use std::str::FromStr;

use serde_json::Value;

/// Operations the UI layer can invoke by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMethod {
    RequestAudioPermissions,
    InitializeAudio,
    GetAudioLatency,
    GetBufferUnderrunCount,
    RequestLowLatencyMode,
    SetAudioAttributes,
}

impl AudioMethod {
    pub const ALL: [AudioMethod; 6] = [
        Self::RequestAudioPermissions,
        Self::InitializeAudio,
        Self::GetAudioLatency,
        Self::GetBufferUnderrunCount,
        Self::RequestLowLatencyMode,
        Self::SetAudioAttributes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::RequestAudioPermissions => "requestAudioPermissions",
            Self::InitializeAudio => "initializeAudio",
            Self::GetAudioLatency => "getAudioLatency",
            Self::GetBufferUnderrunCount => "getBufferUnderrunCount",
            Self::RequestLowLatencyMode => "requestLowLatencyMode",
            Self::SetAudioAttributes => "setAudioAttributes",
        }
    }
}

impl fmt::Display for AudioMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AudioMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| format!("unknown audio method: {}", s))
    }
}

pub const AUDIO_INIT_ERROR: &str = "AUDIO_INIT_ERROR";
pub const PERMISSION_ERROR: &str = "PERMISSION_ERROR";
pub const LOW_LATENCY_ERROR: &str = "LOW_LATENCY_ERROR";
pub const AUDIO_ATTRIBUTES_ERROR: &str = "AUDIO_ATTRIBUTES_ERROR";

/// Result of a named operation, as handed back to the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResponse {
    Success(Value),
    Error { code: &'static str, message: String },
    NotImplemented,
}

impl MethodResponse {
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success(value.into())
    }

    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for method in AudioMethod::ALL {
            assert_eq!(method.name().parse::<AudioMethod>(), Ok(method));
        }
        assert!("startRecording".parse::<AudioMethod>().is_err());
    }
}
