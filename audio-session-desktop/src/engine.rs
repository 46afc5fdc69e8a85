use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

use audio_session_core::models::attributes::AudioAttributes;
use audio_session_core::models::error::SessionError;
use audio_session_core::traits::native_engine::NativeEngine;

/// In-process stand-in for the native synthesis engine.
///
/// The render loop of an embedder calls `record_underrun` whenever it misses
/// a deadline; the count is what `getBufferUnderrunCount` reports.
pub struct DesktopEngine {
    fail_load: AtomicBool,
    loaded: AtomicBool,
    underruns: AtomicU64,
    low_latency_available: bool,
    low_latency: AtomicBool,
    attributes: Mutex<Option<AudioAttributes>>,
}

impl DesktopEngine {
    pub fn new(low_latency_available: bool) -> Self {
        Self {
            fail_load: AtomicBool::new(false),
            loaded: AtomicBool::new(false),
            underruns: AtomicU64::new(0),
            low_latency_available,
            low_latency: AtomicBool::new(false),
            attributes: Mutex::new(None),
        }
    }

    /// Make subsequent `load` calls fail, as if the library were missing.
    pub fn set_load_failure(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    /// Called from the render loop. Lock-free.
    pub fn record_underrun(&self) {
        self.underruns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn is_low_latency(&self) -> bool {
        self.low_latency.load(Ordering::SeqCst)
    }

    pub fn attributes(&self) -> Option<AudioAttributes> {
        *self.attributes.lock()
    }
}

impl Default for DesktopEngine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl NativeEngine for DesktopEngine {
    fn load(&self) -> Result<(), SessionError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(SessionError::SubsystemUnavailable(
                "synth engine library could not be loaded".into(),
            ));
        }
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn apply_attributes(&self, attributes: &AudioAttributes) {
        *self.attributes.lock() = Some(*attributes);
    }

    fn underrun_count(&self) -> Option<u64> {
        Some(self.underruns.load(Ordering::Relaxed))
    }

    fn request_low_latency(&self) -> bool {
        if self.low_latency_available {
            self.low_latency.store(true, Ordering::SeqCst);
        }
        self.low_latency_available
    }
}
