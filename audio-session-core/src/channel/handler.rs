use std::sync::Arc;

use serde_json::Value;

use crate::channel::method::{
    AudioMethod, MethodResponse, AUDIO_ATTRIBUTES_ERROR, AUDIO_INIT_ERROR, LOW_LATENCY_ERROR,
    PERMISSION_ERROR,
};
use crate::channel::notifier::{ChannelNotifier, OutboundChannel};
use crate::latency::estimator::LatencyEstimator;
use crate::models::attributes::AudioAttributes;
use crate::models::error::SessionError;
use crate::session::controller::SessionController;

/// Dispatches named operations from the UI layer to the session core.
///
/// Applies the error propagation policy: expected outcomes (focus refused,
/// feature unsupported on this device) come back as `false`, failures to
/// perform the call at all come back as tagged errors.
pub struct AudioChannelHandler {
    controller: Arc<SessionController>,
    estimator: LatencyEstimator,
}

impl AudioChannelHandler {
    pub fn new(controller: Arc<SessionController>) -> Self {
        let mut estimator = LatencyEstimator::new(controller.capabilities())
            .with_fallback_ms(controller.config().fallback_latency_ms);
        if let Some(engine) = controller.engine_binding() {
            estimator = estimator.with_engine(engine);
        }

        Self {
            controller,
            estimator,
        }
    }

    /// Route focus notifications to `channel`.
    pub fn attach_outbound(&self, channel: Arc<dyn OutboundChannel>) {
        self.controller.set_delegate(ChannelNotifier::new(channel));
    }

    pub fn controller(&self) -> &Arc<SessionController> {
        &self.controller
    }

    pub fn handle(&self, method: &str, arguments: Option<&Value>) -> MethodResponse {
        let Ok(method) = method.parse::<AudioMethod>() else {
            log::debug!("Unhandled audio method: {}", method);
            return MethodResponse::NotImplemented;
        };

        match method {
            AudioMethod::RequestAudioPermissions => {
                MethodResponse::success(self.controller.request_permissions())
            }
            AudioMethod::InitializeAudio => self.initialize_audio(arguments),
            AudioMethod::GetAudioLatency => {
                let host = self.controller.host();
                MethodResponse::success(self.estimator.query(host.as_ref()).milliseconds)
            }
            AudioMethod::GetBufferUnderrunCount => {
                MethodResponse::success(self.estimator.buffer_underrun_count())
            }
            AudioMethod::RequestLowLatencyMode => {
                match self.controller.request_low_latency_mode() {
                    Ok(enabled) => MethodResponse::success(enabled),
                    Err(e) => {
                        degrade_or_fail(e, LOW_LATENCY_ERROR, "Failed to request low latency mode")
                    }
                }
            }
            AudioMethod::SetAudioAttributes => self.set_audio_attributes(arguments),
        }
    }

    /// Release the session. Safe to call more than once.
    pub fn dispose(&self) {
        self.controller.teardown();
    }

    fn initialize_audio(&self, arguments: Option<&Value>) -> MethodResponse {
        let attributes = match self.attributes_from(arguments) {
            Ok(attributes) => attributes,
            Err(message) => return MethodResponse::error(AUDIO_INIT_ERROR, message),
        };

        match self.controller.initialize(attributes) {
            Ok(granted) => MethodResponse::success(granted),
            Err(e @ SessionError::PermissionDenied { .. }) => {
                MethodResponse::error(PERMISSION_ERROR, e.to_string())
            }
            Err(e) => degrade_or_fail(e, AUDIO_INIT_ERROR, "Failed to initialize audio"),
        }
    }

    fn set_audio_attributes(&self, arguments: Option<&Value>) -> MethodResponse {
        let attributes = match self.attributes_from(arguments) {
            Ok(attributes) => attributes,
            Err(message) => return MethodResponse::error(AUDIO_ATTRIBUTES_ERROR, message),
        };

        match self.controller.set_attributes(attributes) {
            Ok(applied) => MethodResponse::success(applied),
            Err(e) => degrade_or_fail(e, AUDIO_ATTRIBUTES_ERROR, "Failed to set audio attributes"),
        }
    }

    fn attributes_from(&self, arguments: Option<&Value>) -> Result<AudioAttributes, String> {
        match arguments {
            None | Some(Value::Null) => Ok(self.controller.config().default_attributes),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| format!("invalid audio attributes: {}", e)),
        }
    }
}

fn degrade_or_fail(error: SessionError, code: &'static str, context: &str) -> MethodResponse {
    match error {
        SessionError::FocusDenied | SessionError::UnsupportedOnPlatform(_) => {
            log::info!("{}: {}", context, error);
            MethodResponse::success(false)
        }
        other => MethodResponse::error(code, format!("{}: {}", context, other)),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;
    use crate::models::attributes::{AudioUsage, ContentType};
    use crate::models::config::SessionConfig;
    use crate::models::host::{DeviceProperty, FocusRequestResult, PlatformInfo};
    use crate::models::permissions::Capability;
    use crate::models::state::{FocusEvent, FocusState};
    use crate::testing::{FixedPermissions, ScriptedHost};

    #[derive(Default)]
    struct RecordingChannel {
        calls: Mutex<Vec<String>>,
    }

    impl OutboundChannel for RecordingChannel {
        fn invoke_method(&self, method: &str, _arguments: Option<Value>) {
            self.calls.lock().push(method.to_string());
        }
    }

    fn handler_for(host: &Arc<ScriptedHost>) -> AudioChannelHandler {
        let controller = Arc::new(
            SessionController::new(SessionConfig::default(), host.clone(), FixedPermissions::all())
                .unwrap(),
        );
        AudioChannelHandler::new(controller)
    }

    #[test]
    fn unknown_method_is_not_implemented() {
        let handler = handler_for(&ScriptedHost::new(34));
        assert_eq!(handler.handle("startRecording", None), MethodResponse::NotImplemented);
    }

    #[test]
    fn initialize_reports_grant_and_denial_as_bool() {
        let host = ScriptedHost::new(34);
        let handler = handler_for(&host);
        assert_eq!(handler.handle("initializeAudio", None), MethodResponse::success(true));

        let host = ScriptedHost::new(34);
        host.respond(Ok(FocusRequestResult::Denied));
        let handler = handler_for(&host);
        assert_eq!(handler.handle("initializeAudio", None), MethodResponse::success(false));
    }

    #[test]
    fn initialize_accepts_attribute_arguments() {
        let host = ScriptedHost::new(34);
        let handler = handler_for(&host);

        let args = json!({ "usage": "game", "contentType": "sonification" });
        assert!(handler.handle("initializeAudio", Some(&args)).is_success());
        assert_eq!(
            host.requests.lock()[0].attributes,
            Some(AudioAttributes::new(AudioUsage::Game, ContentType::Sonification))
        );

        let bad = json!({ "usage": "karaoke" });
        let response = handler.handle("setAudioAttributes", Some(&bad));
        assert!(matches!(
            response,
            MethodResponse::Error { code: AUDIO_ATTRIBUTES_ERROR, .. }
        ));
    }

    #[test]
    fn initialize_errors_are_tagged() {
        let host = ScriptedHost::new(34);
        host.respond(Err(SessionError::SubsystemUnavailable("audio service died".into())));
        let handler = handler_for(&host);
        assert!(matches!(
            handler.handle("initializeAudio", None),
            MethodResponse::Error { code: AUDIO_INIT_ERROR, .. }
        ));

        let controller = Arc::new(
            SessionController::new(
                SessionConfig::default(),
                host.clone(),
                FixedPermissions::granting([Capability::ModifyAudioSettings]),
            )
            .unwrap(),
        );
        let handler = AudioChannelHandler::new(controller);
        assert_eq!(handler.handle("requestAudioPermissions", None), MethodResponse::success(false));
        assert!(matches!(
            handler.handle("initializeAudio", None),
            MethodResponse::Error { code: PERMISSION_ERROR, .. }
        ));
    }

    #[test]
    fn latency_and_underruns() {
        let host = ScriptedHost::new(34);
        host.set_property(DeviceProperty::OutputFramesPerBuffer, "960");
        host.set_property(DeviceProperty::OutputSampleRate, "48000");
        let handler = handler_for(&host);

        let latency = handler.handle("getAudioLatency", None);
        assert_relative_eq!(latency.value().and_then(Value::as_f64).unwrap(), 20.0);
        assert_eq!(handler.handle("getBufferUnderrunCount", None), MethodResponse::success(0u64));
    }

    #[test]
    fn latency_reads_the_session_host() {
        let host = ScriptedHost::new(34);
        host.set_property(DeviceProperty::OutputFramesPerBuffer, "480");
        host.set_property(DeviceProperty::OutputSampleRate, "48000");
        let handler = handler_for(&host);

        let latency = handler.handle("getAudioLatency", None);
        assert_relative_eq!(latency.value().and_then(Value::as_f64).unwrap(), 10.0);
    }

    #[test]
    fn unsupported_features_degrade_to_false() {
        let host = ScriptedHost::with_platform(PlatformInfo::new(23, []));
        let handler = handler_for(&host);

        assert_eq!(handler.handle("requestLowLatencyMode", None), MethodResponse::success(false));
        assert_eq!(handler.handle("setAudioAttributes", None), MethodResponse::success(false));
        assert_eq!(handler.handle("getAudioLatency", None), MethodResponse::success(20.0));
    }

    #[test]
    fn focus_signals_reach_outbound_channel() {
        let host = ScriptedHost::new(34);
        let handler = handler_for(&host);
        let channel = Arc::new(RecordingChannel::default());
        handler.attach_outbound(channel.clone());

        handler.handle("initializeAudio", None);
        host.fire(FocusEvent::LossTransientCanDuck);
        host.fire(FocusEvent::Gain);
        host.fire(FocusEvent::Loss);

        assert_eq!(
            *channel.calls.lock(),
            vec![
                "onAudioFocusLostTransientCanDuck",
                "onAudioFocusGained",
                "onAudioFocusLost",
            ]
        );
    }

    #[test]
    fn dispose_releases_focus() {
        let host = ScriptedHost::new(34);
        let handler = handler_for(&host);
        handler.handle("initializeAudio", None);

        handler.dispose();
        handler.dispose();
        assert_eq!(handler.controller().state(), FocusState::Idle);
        assert_eq!(host.abandoned.lock().len(), 1);
    }
}
