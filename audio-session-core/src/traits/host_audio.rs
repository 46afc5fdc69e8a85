use std::sync::Arc;

use crate::models::error::SessionError;
use crate::models::host::{AudioMode, DeviceProperty, FocusHandle, FocusRequest, FocusRequestResult, PlatformInfo};
use crate::models::state::FocusEvent;

/// Callback invoked by the host when focus changes for a request.
///
/// Fires on the host's notification thread, possibly concurrently with
/// calls on the controller.
pub type FocusChangeCallback = Arc<dyn Fn(FocusEvent) + Send + Sync + 'static>;

/// Interface to the host platform's audio service.
///
/// Implemented by:
/// - `DesktopAudioHost` (in-process focus arbiter)
/// - Future: an Android `AudioManager` binding
pub trait HostAudioSubsystem: Send + Sync {
    /// Platform facts used for capability detection.
    fn platform(&self) -> PlatformInfo;

    /// Submit a focus request. `on_change` stays registered until the request
    /// is abandoned.
    ///
    /// Errors only when the service cannot be reached; a refusal is
    /// `Ok(FocusRequestResult::Denied)`.
    fn request_focus(
        &self,
        request: FocusRequest,
        on_change: FocusChangeCallback,
    ) -> Result<FocusRequestResult, SessionError>;

    /// Give up a previously submitted request and detach its callback.
    fn abandon_focus(&self, handle: &FocusHandle) -> Result<(), SessionError>;

    /// Raw device property, if the host knows it.
    fn device_property(&self, key: DeviceProperty) -> Option<String>;

    fn set_audio_mode(&self, mode: AudioMode) -> Result<(), SessionError>;
}
