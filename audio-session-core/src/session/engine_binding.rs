use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::SessionError;
use crate::traits::native_engine::NativeEngine;

/// Explicit, idempotent load of the native engine.
///
/// The engine is loaded on the first `ensure_loaded` call that succeeds;
/// later calls are no-ops. A failed load is reported as
/// `SubsystemUnavailable` and may be retried.
pub struct EngineBinding {
    engine: Arc<dyn NativeEngine>,
    loaded: Mutex<bool>,
}

impl EngineBinding {
    pub fn new(engine: Arc<dyn NativeEngine>) -> Self {
        Self {
            engine,
            loaded: Mutex::new(false),
        }
    }

    pub fn ensure_loaded(&self) -> Result<(), SessionError> {
        let mut loaded = self.loaded.lock();
        if *loaded {
            return Ok(());
        }

        match self.engine.load() {
            Ok(()) => {
                *loaded = true;
                log::info!("Native audio engine loaded");
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load native audio engine: {}", e);
                Err(match e {
                    SessionError::SubsystemUnavailable(_) => e,
                    other => SessionError::SubsystemUnavailable(other.to_string()),
                })
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        *self.loaded.lock()
    }

    /// The engine, once loaded.
    pub fn engine(&self) -> Option<Arc<dyn NativeEngine>> {
        if self.is_loaded() {
            Some(Arc::clone(&self.engine))
        } else {
            None
        }
    }
}
