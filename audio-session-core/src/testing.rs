//! Scripted collaborators for unit tests.

use std::collections::{BTreeSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::attributes::AudioAttributes;
use crate::models::error::SessionError;
use crate::models::host::{
    AudioMode, DeviceProperty, FocusHandle, FocusRequest, FocusRequestResult, PlatformInfo,
    SystemFeature,
};
use crate::models::permissions::Capability;
use crate::models::state::{FocusEvent, FocusSignal, FocusState};
use crate::traits::focus_delegate::FocusDelegate;
use crate::traits::host_audio::{FocusChangeCallback, HostAudioSubsystem};
use crate::traits::native_engine::NativeEngine;
use crate::traits::permission_authority::PermissionAuthority;

pub struct FixedPermissions {
    granted: BTreeSet<Capability>,
}

impl FixedPermissions {
    pub fn granting(granted: impl IntoIterator<Item = Capability>) -> Arc<Self> {
        Arc::new(Self {
            granted: granted.into_iter().collect(),
        })
    }

    pub fn all() -> Arc<Self> {
        Self::granting([Capability::RecordAudio, Capability::ModifyAudioSettings])
    }
}

impl PermissionAuthority for FixedPermissions {
    fn is_granted(&self, capability: Capability) -> bool {
        self.granted.contains(&capability)
    }
}

/// Host that answers focus requests from a script and lets tests fire
/// notifications at registered callbacks.
pub struct ScriptedHost {
    pub platform: PlatformInfo,
    responses: Mutex<VecDeque<Result<FocusRequestResult, SessionError>>>,
    pub requests: Mutex<Vec<FocusRequest>>,
    callbacks: Mutex<Vec<(FocusHandle, FocusChangeCallback)>>,
    pub abandoned: Mutex<Vec<FocusHandle>>,
    pub modes: Mutex<Vec<AudioMode>>,
    pub mode_error: Mutex<Option<SessionError>>,
    pub properties: Mutex<Vec<(DeviceProperty, String)>>,
}

impl ScriptedHost {
    pub fn new(api_level: u32) -> Arc<Self> {
        Self::with_platform(PlatformInfo::new(
            api_level,
            [SystemFeature::AudioOutput, SystemFeature::AudioLowLatency],
        ))
    }

    pub fn with_platform(platform: PlatformInfo) -> Arc<Self> {
        Arc::new(Self {
            platform,
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            callbacks: Mutex::new(Vec::new()),
            abandoned: Mutex::new(Vec::new()),
            modes: Mutex::new(Vec::new()),
            mode_error: Mutex::new(None),
            properties: Mutex::new(Vec::new()),
        })
    }

    /// Queue the answer for the next focus request. Unscripted requests are granted.
    pub fn respond(&self, result: Result<FocusRequestResult, SessionError>) {
        self.responses.lock().push_back(result);
    }

    pub fn set_property(&self, key: DeviceProperty, value: &str) {
        self.properties.lock().push((key, value.to_string()));
    }

    /// Deliver `event` to the callback of the most recent request.
    pub fn fire(&self, event: FocusEvent) {
        let callback = self.callbacks.lock().last().map(|(_, cb)| Arc::clone(cb));
        if let Some(cb) = callback {
            cb(event);
        }
    }

    /// Deliver `event` to every callback ever registered, abandoned or not.
    pub fn fire_all(&self, event: FocusEvent) {
        let callbacks: Vec<_> = self.callbacks.lock().iter().map(|(_, cb)| Arc::clone(cb)).collect();
        for cb in callbacks {
            cb(event);
        }
    }
}

impl HostAudioSubsystem for ScriptedHost {
    fn platform(&self) -> PlatformInfo {
        self.platform.clone()
    }

    fn request_focus(
        &self,
        request: FocusRequest,
        on_change: FocusChangeCallback,
    ) -> Result<FocusRequestResult, SessionError> {
        let response = self
            .responses
            .lock()
            .pop_front()
            .unwrap_or(Ok(FocusRequestResult::Granted));
        self.callbacks.lock().push((request.handle.clone(), on_change));
        self.requests.lock().push(request);
        response
    }

    fn abandon_focus(&self, handle: &FocusHandle) -> Result<(), SessionError> {
        self.abandoned.lock().push(handle.clone());
        Ok(())
    }

    fn device_property(&self, key: DeviceProperty) -> Option<String> {
        self.properties
            .lock()
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
    }

    fn set_audio_mode(&self, mode: AudioMode) -> Result<(), SessionError> {
        if let Some(err) = self.mode_error.lock().clone() {
            return Err(err);
        }
        self.modes.lock().push(mode);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingDelegate {
    pub signals: Mutex<Vec<FocusSignal>>,
    pub states: Mutex<Vec<FocusState>>,
}

impl FocusDelegate for RecordingDelegate {
    fn on_focus_signal(&self, signal: FocusSignal) {
        self.signals.lock().push(signal);
    }

    fn on_state_changed(&self, state: FocusState) {
        self.states.lock().push(state);
    }
}

#[derive(Default)]
pub struct FakeEngine {
    pub fail_load: AtomicBool,
    pub loads: AtomicU64,
    pub underruns: Option<u64>,
    pub low_latency: bool,
    pub applied: Mutex<Vec<AudioAttributes>>,
}

impl NativeEngine for FakeEngine {
    fn load(&self) -> Result<(), SessionError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(SessionError::SubsystemUnavailable("libsynthengine.so not found".into()));
        }
        Ok(())
    }

    fn apply_attributes(&self, attributes: &AudioAttributes) {
        self.applied.lock().push(*attributes);
    }

    fn underrun_count(&self) -> Option<u64> {
        self.underruns
    }

    fn request_low_latency(&self) -> bool {
        self.low_latency
    }
}
