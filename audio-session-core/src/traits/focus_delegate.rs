use crate::models::state::{FocusSignal, FocusState};

/// Event delegate for focus notifications.
///
/// Called from the host's notification thread or the caller's thread, never
/// while the session lock is held.
pub trait FocusDelegate: Send + Sync {
    /// Called when playback should react to a focus change.
    fn on_focus_signal(&self, signal: FocusSignal);

    /// Called whenever the focus state changes.
    fn on_state_changed(&self, state: FocusState);
}
