use crate::models::attributes::AudioAttributes;
use crate::models::error::SessionError;

/// Binding to the native synthesis engine that renders audio.
///
/// The render callback itself runs inside the engine; nothing here is called
/// from the audio thread.
pub trait NativeEngine: Send + Sync {
    /// Load and initialize the engine. Called through `EngineBinding`, which
    /// guarantees at most one successful call.
    fn load(&self) -> Result<(), SessionError>;

    /// Apply stream attributes for the next stream the engine opens.
    fn apply_attributes(&self, attributes: &AudioAttributes);

    /// Cumulative underruns seen by the render callback, or `None` when the
    /// engine does not track them.
    fn underrun_count(&self) -> Option<u64>;

    /// Ask the engine to open its stream on the low-latency path. Best effort.
    fn request_low_latency(&self) -> bool;
}
