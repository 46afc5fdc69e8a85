use std::sync::Arc;

use serde_json::Value;

use crate::models::state::{FocusSignal, FocusState};
use crate::traits::focus_delegate::FocusDelegate;

/// Outbound half of the method channel: notifications sent to the UI layer.
pub trait OutboundChannel: Send + Sync {
    fn invoke_method(&self, method: &str, arguments: Option<Value>);
}

/// Forwards focus signals to the UI layer under their notification names.
pub struct ChannelNotifier {
    channel: Arc<dyn OutboundChannel>,
}

impl ChannelNotifier {
    pub fn new(channel: Arc<dyn OutboundChannel>) -> Arc<Self> {
        Arc::new(Self { channel })
    }
}

impl FocusDelegate for ChannelNotifier {
    fn on_focus_signal(&self, signal: FocusSignal) {
        self.channel.invoke_method(signal.notification_name(), None);
    }

    fn on_state_changed(&self, state: FocusState) {
        log::trace!("Focus state now {:?}", state);
    }
}
