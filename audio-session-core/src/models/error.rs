use thiserror::Error;

use super::permissions::Capability;

/// Errors that can occur during audio session operations.
///
/// Normal contention (the host refusing focus) is reported as `Ok(false)` by
/// `initialize`; these variants cover calls that could not be carried out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("permission denied: missing {missing:?}")]
    PermissionDenied { missing: Vec<Capability> },

    #[error("audio focus denied")]
    FocusDenied,

    #[error("audio subsystem unavailable: {0}")]
    SubsystemUnavailable(String),

    #[error("unsupported on this platform: {0}")]
    UnsupportedOnPlatform(String),

    #[error("invalid session state: {0}")]
    InvalidState(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),
}

/// Error returned by `SessionController::initialize`.
pub type InitError = SessionError;

impl SessionError {
    /// Whether the caller can reasonably retry or fall back to a degraded feature.
    ///
    /// `SubsystemUnavailable` means no audio path exists for this session.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::PermissionDenied { .. }
            | Self::FocusDenied
            | Self::UnsupportedOnPlatform(_)
            | Self::InvalidState(_) => true,
            Self::SubsystemUnavailable(_) | Self::ConfigurationFailed(_) => false,
        }
    }
}
