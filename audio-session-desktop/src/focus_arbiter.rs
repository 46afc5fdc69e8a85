//! In-process audio focus arbiter.
//!
//! Desktop platforms have no system-wide focus service, so sessions within
//! one process arbitrate among themselves through a focus stack:
//!
//! ```text
//! request(Gain)                 → previous top gets Loss and leaves the stack
//! request(GainTransient)        → previous top gets LossTransient
//! request(GainTransientMayDuck) → previous top gets LossTransientCanDuck
//! abandon(top)                  → new top gets Gain if it was preempted
//! ```
//!
//! Callbacks are always invoked after the arbiter lock is released, so a
//! session may abandon its request from inside its own callback.

use parking_lot::Mutex;

use audio_session_core::models::error::SessionError;
use audio_session_core::models::host::{
    AudioMode, DeviceProperty, FocusHandle, FocusRequest, FocusRequestResult, PlatformInfo,
};
use audio_session_core::models::state::{FocusEvent, FocusGain};
use audio_session_core::traits::host_audio::{FocusChangeCallback, HostAudioSubsystem};

use crate::device_profile::DeviceProfile;

/// How the arbiter answers new focus requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPolicy {
    #[default]
    Grant,
    Deny,
    /// Park requests that accept a delayed grant until `grant_pending`;
    /// deny the rest.
    Delay,
}

struct Holder {
    handle: FocusHandle,
    gain: FocusGain,
    callback: FocusChangeCallback,
    preempted: bool,
}

struct ArbiterState {
    stack: Vec<Holder>,
    pending: Vec<Holder>,
    policy: FocusPolicy,
    unreachable: bool,
    mode: AudioMode,
    profile: DeviceProfile,
}

type Dispatch = Vec<(FocusChangeCallback, FocusEvent)>;

impl ArbiterState {
    fn check_reachable(&self) -> Result<(), SessionError> {
        if self.unreachable {
            return Err(SessionError::SubsystemUnavailable(
                "desktop audio host is shut down".into(),
            ));
        }
        Ok(())
    }

    /// Put `holder` on top, preempting the current top.
    fn push_top(&mut self, holder: Holder, dispatch: &mut Dispatch) {
        if let Some(top) = self.stack.last_mut() {
            let event = match holder.gain {
                FocusGain::Gain => FocusEvent::Loss,
                FocusGain::GainTransient => FocusEvent::LossTransient,
                FocusGain::GainTransientMayDuck => FocusEvent::LossTransientCanDuck,
            };
            dispatch.push((top.callback.clone(), event));
            if event == FocusEvent::Loss {
                self.stack.pop();
            } else {
                top.preempted = true;
            }
        }
        self.stack.push(holder);
    }
}

/// `HostAudioSubsystem` for desktop embedders and tests.
pub struct DesktopAudioHost {
    state: Mutex<ArbiterState>,
}

impl DesktopAudioHost {
    pub fn new(profile: DeviceProfile) -> Self {
        Self {
            state: Mutex::new(ArbiterState {
                stack: Vec::new(),
                pending: Vec::new(),
                policy: FocusPolicy::Grant,
                unreachable: false,
                mode: AudioMode::Normal,
                profile,
            }),
        }
    }

    pub fn set_policy(&self, policy: FocusPolicy) {
        self.state.lock().policy = policy;
    }

    /// Simulate the audio service going away (or coming back).
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unreachable = unreachable;
    }

    /// Swap the output device, e.g. when headphones are plugged in.
    pub fn set_device_profile(&self, profile: DeviceProfile) {
        self.state.lock().profile = profile;
    }

    pub fn audio_mode(&self) -> AudioMode {
        self.state.lock().mode
    }

    /// Handle of the request currently holding focus.
    pub fn focus_owner(&self) -> Option<FocusHandle> {
        self.state.lock().stack.last().map(|h| h.handle.clone())
    }

    /// Number of live requests, including preempted and pending ones.
    pub fn request_count(&self) -> usize {
        let s = self.state.lock();
        s.stack.len() + s.pending.len()
    }

    /// Grant every parked request, oldest first.
    pub fn grant_pending(&self) {
        let mut dispatch = Dispatch::new();
        {
            let mut s = self.state.lock();
            let pending = std::mem::take(&mut s.pending);
            for holder in pending {
                let callback = holder.callback.clone();
                s.push_top(holder, &mut dispatch);
                dispatch.push((callback, FocusEvent::Gain));
            }
        }
        deliver(dispatch);
    }
}

impl Default for DesktopAudioHost {
    fn default() -> Self {
        Self::new(DeviceProfile::default())
    }
}

impl HostAudioSubsystem for DesktopAudioHost {
    fn platform(&self) -> PlatformInfo {
        self.state.lock().profile.platform()
    }

    fn request_focus(
        &self,
        request: FocusRequest,
        on_change: FocusChangeCallback,
    ) -> Result<FocusRequestResult, SessionError> {
        let mut dispatch = Dispatch::new();
        let holder = Holder {
            handle: request.handle.clone(),
            gain: request.gain,
            callback: on_change,
            preempted: false,
        };

        let result = {
            let mut s = self.state.lock();
            s.check_reachable()?;

            let policy = s.policy;
            match policy {
                FocusPolicy::Deny => FocusRequestResult::Denied,
                FocusPolicy::Delay if request.accepts_delayed_gain => {
                    s.pending.push(holder);
                    FocusRequestResult::Delayed
                }
                FocusPolicy::Delay => FocusRequestResult::Denied,
                FocusPolicy::Grant => {
                    s.push_top(holder, &mut dispatch);
                    FocusRequestResult::Granted
                }
            }
        };

        log::debug!("Focus request {} ({:?}): {:?}", request.handle, request.gain, result);
        deliver(dispatch);
        Ok(result)
    }

    fn abandon_focus(&self, handle: &FocusHandle) -> Result<(), SessionError> {
        let mut dispatch = Dispatch::new();
        // The caller has already forgotten the handle, so the holder is
        // released even when the host reports itself unreachable.
        let reachable = {
            let mut s = self.state.lock();
            s.pending.retain(|h| &h.handle != handle);

            if let Some(index) = s.stack.iter().position(|h| &h.handle == handle) {
                let was_top = index + 1 == s.stack.len();
                s.stack.remove(index);
                if was_top {
                    if let Some(top) = s.stack.last_mut().filter(|top| top.preempted) {
                        top.preempted = false;
                        dispatch.push((top.callback.clone(), FocusEvent::Gain));
                    }
                }
            }
            s.check_reachable()
        };
        deliver(dispatch);
        reachable
    }

    fn device_property(&self, key: DeviceProperty) -> Option<String> {
        self.state.lock().profile.property(key)
    }

    fn set_audio_mode(&self, mode: AudioMode) -> Result<(), SessionError> {
        let mut s = self.state.lock();
        s.check_reachable()?;
        s.mode = mode;
        Ok(())
    }
}

fn deliver(dispatch: Dispatch) {
    for (callback, event) in dispatch {
        callback(event);
    }
}
