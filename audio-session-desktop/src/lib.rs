//! # audio-session-desktop
//!
//! In-process desktop backend for audio-session-core.
//!
//! Provides:
//! - `DesktopAudioHost`: focus arbiter shared by the sessions of one process
//! - `DesktopPermissions`: permission authority (everything granted by default)
//! - `DeviceProfile`: output device properties reported to the latency estimator
//! - `DesktopEngine`: native engine binding with an underrun counter
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use audio_session_core::{AudioChannelHandler, EngineBinding, SessionConfig, SessionController};
//! use audio_session_desktop::{DesktopAudioHost, DesktopEngine, DesktopPermissions};
//!
//! let host = Arc::new(DesktopAudioHost::default());
//! let engine = Arc::new(EngineBinding::new(Arc::new(DesktopEngine::default())));
//! let controller = SessionController::new(
//!     SessionConfig::default(),
//!     host.clone(),
//!     Arc::new(DesktopPermissions::default()),
//! )?
//! .with_engine(engine);
//! let handler = AudioChannelHandler::new(Arc::new(controller));
//! handler.handle("initializeAudio", None);
//! ```

pub mod device_profile;
pub mod engine;
pub mod focus_arbiter;
pub mod permissions;

pub use device_profile::DeviceProfile;
pub use engine::DesktopEngine;
pub use focus_arbiter::{DesktopAudioHost, FocusPolicy};
pub use permissions::DesktopPermissions;
