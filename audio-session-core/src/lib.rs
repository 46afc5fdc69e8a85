//! # audio-session-core
//!
//! Platform-agnostic audio session core.
//!
//! Owns the audio focus lifecycle, gates initialization on runtime
//! permissions, and estimates output latency. Platform backends implement
//! the `HostAudioSubsystem` and `PermissionAuthority` traits; the native
//! synthesis engine plugs in through `NativeEngine`.
//!
//! ## Architecture
//!
//! ```text
//! audio-session-core (this crate)
//! ├── traits/    ← HostAudioSubsystem, PermissionAuthority, NativeEngine, FocusDelegate
//! ├── models/    ← SessionError, FocusState, AudioAttributes, Capabilities, SessionConfig, etc.
//! ├── session/   ← SessionController, EngineBinding
//! ├── latency/   ← LatencyEstimator
//! └── channel/   ← AudioChannelHandler (named operations for the UI layer)
//! ```
//!
//! Control flow: the UI asks for initialization → the controller checks
//! permissions → the controller requests focus → once granted, the UI
//! queries latency.

pub mod channel;
pub mod latency;
pub mod models;
pub mod session;
pub mod traits;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience.
pub use channel::handler::AudioChannelHandler;
pub use channel::method::{AudioMethod, MethodResponse};
pub use channel::notifier::{ChannelNotifier, OutboundChannel};
pub use latency::estimator::{estimate, LatencyEstimator};
pub use models::attributes::{AudioAttributes, AudioUsage, ContentType};
pub use models::capabilities::Capabilities;
pub use models::config::SessionConfig;
pub use models::diagnostics::SessionDiagnostics;
pub use models::error::{InitError, SessionError};
pub use models::host::{
    AudioMode, DeviceProperty, FocusHandle, FocusRequest, FocusRequestResult, PlatformInfo,
    SystemFeature,
};
pub use models::latency::{LatencyEstimate, LatencySource};
pub use models::permissions::{Capability, PermissionSet};
pub use models::state::{FocusEvent, FocusGain, FocusSignal, FocusState};
pub use session::controller::SessionController;
pub use session::engine_binding::EngineBinding;
pub use traits::focus_delegate::FocusDelegate;
pub use traits::host_audio::{FocusChangeCallback, HostAudioSubsystem};
pub use traits::native_engine::NativeEngine;
pub use traits::permission_authority::PermissionAuthority;
