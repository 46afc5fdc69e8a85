use std::cell::Cell;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};

use crate::models::attributes::AudioAttributes;
use crate::models::capabilities::Capabilities;
use crate::models::config::SessionConfig;
use crate::models::diagnostics::SessionDiagnostics;
use crate::models::error::{InitError, SessionError};
use crate::models::host::{AudioMode, FocusHandle, FocusRequest, FocusRequestResult};
use crate::models::permissions::Capability;
use crate::models::state::{FocusEvent, FocusSignal, FocusState};
use crate::session::engine_binding::EngineBinding;
use crate::traits::focus_delegate::FocusDelegate;
use crate::traits::host_audio::{FocusChangeCallback, HostAudioSubsystem};
use crate::traits::permission_authority::PermissionAuthority;

/// Internal mutable session state, protected by `parking_lot::Mutex`.
struct SessionState {
    focus: FocusState,
    attributes: AudioAttributes,
    handle: Option<FocusHandle>,
    /// Bumped by every new request, permanent loss and teardown. Callbacks
    /// carry the value current at registration and are dropped on mismatch.
    registration: u64,
    /// Orders delegate notifications. Taken under the lock with each change.
    notice: u64,
    diagnostics: SessionDiagnostics,
}

impl SessionState {
    fn new(attributes: AudioAttributes) -> Self {
        Self {
            focus: FocusState::Idle,
            attributes,
            handle: None,
            registration: 0,
            notice: 0,
            diagnostics: SessionDiagnostics::default(),
        }
    }

    fn set_focus(&mut self, next: FocusState) {
        if self.focus != next {
            log::debug!("Audio focus {:?} -> {:?}", self.focus, next);
            self.focus = next;
            self.diagnostics.last_transition_at = Some(chrono::Utc::now().to_rfc3339());
        }
    }

    fn next_notice(&mut self) -> u64 {
        self.notice += 1;
        self.notice
    }
}

/// What the delegate has been told so far.
#[derive(Clone, Copy)]
struct Delivered {
    notice: u64,
    state: FocusState,
}

/// State shared with the focus callbacks registered at the host.
///
/// Callbacks hold a `Weak` to this, so the host never keeps a session alive.
struct Shared {
    host: Arc<dyn HostAudioSubsystem>,
    state: Mutex<SessionState>,
    delegate: Mutex<Option<Arc<dyn FocusDelegate>>>,
    delivered: ReentrantMutex<Cell<Delivered>>,
}

impl Shared {
    /// Apply a focus event. `registration` is `None` for direct calls, which
    /// always target the current request.
    fn apply_event(&self, registration: Option<u64>, event: FocusEvent) {
        let (notice, transition, released) = {
            let mut s = self.state.lock();
            if registration.is_some_and(|r| r != s.registration) {
                s.diagnostics.ignored_events += 1;
                log::debug!("Ignoring {:?} for a superseded focus request", event);
                return;
            }

            let previous = s.focus;
            if previous.is_idle() {
                log::debug!("Ignoring {:?} while idle", event);
                return;
            }

            let transition = previous.on_event(event);
            s.diagnostics.focus_events += 1;
            s.set_focus(transition.next);

            let released = if transition.next.is_idle() {
                s.registration += 1;
                s.handle.take()
            } else {
                None
            };
            (s.next_notice(), transition, released)
        };

        if let Some(handle) = released {
            self.abandon(&handle);
        }
        self.notify(notice, transition.next, transition.signal);
    }

    fn abandon(&self, handle: &FocusHandle) {
        if let Err(e) = self.host.abandon_focus(handle) {
            log::warn!("Failed to abandon focus request {}: {}", handle, e);
        }
    }

    /// Tell the delegate about the state stamped `notice`. A notification
    /// overtaken by a newer one is dropped, so the delegate's last state
    /// always matches the session.
    fn notify(&self, notice: u64, state: FocusState, signal: Option<FocusSignal>) {
        let Some(delegate) = self.delegate.lock().clone() else {
            return;
        };
        let delivered = self.delivered.lock();
        let last = delivered.get();
        if notice <= last.notice {
            log::debug!("Dropping superseded focus notification ({:?})", state);
            return;
        }
        delivered.set(Delivered { notice, state });

        if state != last.state {
            delegate.on_state_changed(state);
        }
        if let Some(signal) = signal {
            delegate.on_focus_signal(signal);
        }
    }

    fn notify_state(&self, notice: u64, state: FocusState) {
        self.notify(notice, state, None);
    }
}

/// Owns the audio session lifecycle: permission gating, focus acquisition
/// and release, and the attributes the session plays with.
///
/// Safe to share across threads. Focus notifications from the host may
/// arrive concurrently with any call; once `teardown` has run, notifications
/// for the released request can no longer change the state.
pub struct SessionController {
    config: SessionConfig,
    capabilities: Capabilities,
    permissions: Arc<dyn PermissionAuthority>,
    engine: Option<Arc<EngineBinding>>,
    shared: Arc<Shared>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        host: Arc<dyn HostAudioSubsystem>,
        permissions: Arc<dyn PermissionAuthority>,
    ) -> Result<Self, SessionError> {
        config.validate().map_err(SessionError::ConfigurationFailed)?;
        let capabilities = Capabilities::detect(&host.platform());

        Ok(Self {
            capabilities,
            permissions,
            engine: None,
            shared: Arc::new(Shared {
                host,
                state: Mutex::new(SessionState::new(config.default_attributes)),
                delegate: Mutex::new(None),
                delivered: ReentrantMutex::new(Cell::new(Delivered {
                    notice: 0,
                    state: FocusState::Idle,
                })),
            }),
            config,
        })
    }

    /// Attach the native engine. It is loaded on the first `initialize`.
    pub fn with_engine(mut self, engine: Arc<EngineBinding>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn set_delegate(&self, delegate: Arc<dyn FocusDelegate>) {
        *self.shared.delegate.lock() = Some(delegate);
    }

    pub fn state(&self) -> FocusState {
        self.shared.state.lock().focus
    }

    pub fn attributes(&self) -> AudioAttributes {
        self.shared.state.lock().attributes
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The host audio subsystem this session requests focus from.
    pub fn host(&self) -> Arc<dyn HostAudioSubsystem> {
        self.shared.host.clone()
    }

    pub fn engine_binding(&self) -> Option<Arc<EngineBinding>> {
        self.engine.clone()
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        self.shared.state.lock().diagnostics.clone()
    }

    /// Whether every required capability is already granted. Never prompts.
    pub fn request_permissions(&self) -> bool {
        let missing = self.missing_permissions();
        if !missing.is_empty() {
            log::debug!("Missing audio permissions: {:?}", missing);
        }
        missing.is_empty()
    }

    /// Request audio focus with `attributes`.
    ///
    /// Returns `Ok(true)` when the host grants focus, `Ok(false)` when it
    /// refuses or defers the grant. Calling this on a session that already
    /// holds a request does not submit another one.
    pub fn initialize(&self, attributes: AudioAttributes) -> Result<bool, InitError> {
        let missing = self.missing_permissions();
        if !missing.is_empty() {
            return Err(SessionError::PermissionDenied { missing });
        }

        if let Some(current) = self.busy_state() {
            log::debug!("initialize called while {:?}; not requesting again", current);
            return Ok(current.is_owned());
        }

        if let Some(ref binding) = self.engine {
            binding.ensure_loaded()?;
            if let Some(engine) = binding.engine() {
                engine.apply_attributes(&attributes);
            }
        }

        if self.config.normalize_audio_mode {
            self.shared.host.set_audio_mode(AudioMode::Normal)?;
        }

        let handle = FocusHandle::new();
        let (registration, notice) = {
            let mut s = self.shared.state.lock();
            if s.focus.holds_request() {
                return Ok(s.focus.is_owned());
            }
            s.registration += 1;
            s.attributes = attributes;
            s.handle = Some(handle.clone());
            s.diagnostics.focus_requests += 1;
            s.set_focus(FocusState::Requesting);
            (s.registration, s.next_notice())
        };
        self.shared.notify_state(notice, FocusState::Requesting);

        let request = FocusRequest {
            handle: handle.clone(),
            gain: self.config.focus_gain,
            attributes: self.capabilities.focus_request_api.then_some(attributes),
            accepts_delayed_gain: self.config.accepts_delayed_focus_gain,
        };

        let result = self
            .shared
            .host
            .request_focus(request, self.focus_callback(registration));

        let result = match result {
            Ok(result) => result,
            Err(e) => {
                log::error!("Focus request failed: {}", e);
                self.reset_if_current(registration);
                return Err(e);
            }
        };

        let mut s = self.shared.state.lock();
        if s.registration != registration {
            drop(s);
            if result != FocusRequestResult::Denied {
                log::debug!("Session torn down during focus request; releasing late grant");
                self.shared.abandon(&handle);
            }
            return Ok(false);
        }

        match result {
            FocusRequestResult::Granted => {
                s.diagnostics.focus_grants += 1;
                if s.focus == FocusState::Requesting {
                    s.set_focus(FocusState::Owned);
                    let notice = s.next_notice();
                    drop(s);
                    self.shared.notify_state(notice, FocusState::Owned);
                    Ok(true)
                } else {
                    // A notification already moved the state on.
                    Ok(s.focus.is_owned())
                }
            }
            FocusRequestResult::Delayed => {
                s.diagnostics.focus_delays += 1;
                log::info!("Audio focus grant delayed by host");
                Ok(false)
            }
            FocusRequestResult::Denied => {
                s.diagnostics.focus_denials += 1;
                s.handle = None;
                s.registration += 1;
                s.set_focus(FocusState::Idle);
                let notice = s.next_notice();
                drop(s);
                log::info!("Audio focus denied by host");
                self.shared.notify_state(notice, FocusState::Idle);
                Ok(false)
            }
        }
    }

    /// Like `initialize`, but a refusal is reported as `FocusDenied`.
    pub fn acquire_focus(&self, attributes: AudioAttributes) -> Result<(), SessionError> {
        if self.initialize(attributes)? {
            Ok(())
        } else {
            Err(SessionError::FocusDenied)
        }
    }

    /// Apply a focus change notification for the current request.
    pub fn on_focus_change(&self, event: FocusEvent) {
        self.shared.apply_event(None, event);
    }

    /// Release focus and return to `Idle`. Idempotent; never fails.
    pub fn teardown(&self) {
        let (notice, handle) = {
            let mut s = self.shared.state.lock();
            s.registration += 1;
            s.diagnostics.teardowns += 1;
            s.set_focus(FocusState::Idle);
            (s.next_notice(), s.handle.take())
        };

        if let Some(handle) = handle {
            self.shared.abandon(&handle);
        }
        self.shared.notify_state(notice, FocusState::Idle);
    }

    /// Replace the session's attributes. They apply to the next focus request
    /// and are forwarded to the native engine if it is loaded.
    pub fn set_attributes(&self, attributes: AudioAttributes) -> Result<bool, SessionError> {
        if !self.capabilities.attribute_reconfiguration {
            return Err(SessionError::UnsupportedOnPlatform(
                "audio attributes cannot be reconfigured".into(),
            ));
        }

        self.shared.state.lock().attributes = attributes;
        if let Some(engine) = self.engine.as_ref().and_then(|b| b.engine()) {
            engine.apply_attributes(&attributes);
        }
        Ok(true)
    }

    /// Ask for the low-latency output path.
    ///
    /// Best effort: the answer is whatever the native engine reports, and
    /// `false` when no engine is loaded. Nothing here measures the result.
    pub fn request_low_latency_mode(&self) -> Result<bool, SessionError> {
        if !self.capabilities.low_latency_output {
            return Err(SessionError::UnsupportedOnPlatform(
                "device advertises neither low-latency nor pro audio".into(),
            ));
        }
        if !self.capabilities.focus_request_api {
            return Err(SessionError::UnsupportedOnPlatform(
                "performance mode requires a newer platform".into(),
            ));
        }

        match self.engine.as_ref().and_then(|b| b.engine()) {
            Some(engine) => Ok(engine.request_low_latency()),
            None => {
                log::debug!("Low-latency mode requested before the native engine was loaded");
                Ok(false)
            }
        }
    }

    // --- Internal helpers ---

    fn missing_permissions(&self) -> Vec<Capability> {
        self.config
            .required_permissions
            .missing(|c| self.permissions.is_granted(c))
    }

    fn busy_state(&self) -> Option<FocusState> {
        let focus = self.shared.state.lock().focus;
        focus.holds_request().then_some(focus)
    }

    fn focus_callback(&self, registration: u64) -> FocusChangeCallback {
        let shared: Weak<Shared> = Arc::downgrade(&self.shared);
        Arc::new(move |event: FocusEvent| {
            if let Some(shared) = shared.upgrade() {
                shared.apply_event(Some(registration), event);
            }
        })
    }

    fn reset_if_current(&self, registration: u64) {
        let notice = {
            let mut s = self.shared.state.lock();
            if s.registration != registration {
                return;
            }
            s.registration += 1;
            s.handle = None;
            s.set_focus(FocusState::Idle);
            s.next_notice()
        };
        self.shared.notify_state(notice, FocusState::Idle);
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.teardown();
    }
}
