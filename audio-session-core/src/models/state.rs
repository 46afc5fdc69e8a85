use serde::{Deserialize, Serialize};

/// Audio focus state machine.
///
/// State transitions:
/// ```text
/// idle → requesting → owned ⇄ lost_transient
///                       ⇅
///              lost_transient_duckable → lost_transient
///
/// requesting / owned / lost_* --loss--> idle
/// ```
///
/// `Lost` is never stored by the controller: a permanent loss releases the
/// request and lands on `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusState {
    #[default]
    Idle,
    Requesting,
    Owned,
    Lost,
    LostTransient,
    LostTransientDuckable,
}

/// Focus change notification delivered by the host audio subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusEvent {
    Gain,
    Loss,
    LossTransient,
    LossTransientCanDuck,
}

/// The kind of focus a session asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusGain {
    #[default]
    Gain,
    GainTransient,
    GainTransientMayDuck,
}

/// What the owner of a session should do with playback after a focus change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusSignal {
    /// Focus lost for good; stop playback.
    Stop,
    Pause,
    Resume,
    /// Reduce output level.
    Duck,
    /// Restore output level.
    Unduck,
    /// A delayed focus request was finally granted.
    Gained,
}

impl FocusSignal {
    /// Name of the outbound notification delivered to the UI layer.
    pub fn notification_name(&self) -> &'static str {
        match self {
            Self::Stop => "onAudioFocusLost",
            Self::Pause => "onAudioFocusLostTransient",
            Self::Duck => "onAudioFocusLostTransientCanDuck",
            Self::Resume | Self::Unduck | Self::Gained => "onAudioFocusGained",
        }
    }
}

/// Outcome of applying one focus event to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTransition {
    pub next: FocusState,
    pub signal: Option<FocusSignal>,
}

impl FocusState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned)
    }

    /// Whether the session holds a live request at the host, granted or not.
    pub fn holds_request(&self) -> bool {
        !matches!(self, Self::Idle | Self::Lost)
    }

    /// Apply a focus event. Pure; the controller performs the side effects.
    ///
    /// Events with no entry leave the state unchanged and produce no signal.
    /// `Lost` is transient: permanent loss lands on `Idle`.
    pub fn on_event(self, event: FocusEvent) -> FocusTransition {
        use FocusEvent as E;
        use FocusState as S;

        let (next, signal) = match (self, event) {
            (S::Idle, _) | (S::Lost, _) => (S::Idle, None),
            (_, E::Loss) => (S::Idle, Some(FocusSignal::Stop)),

            (S::Owned, E::Gain) => (S::Owned, None),
            (S::Owned, E::LossTransient) => (S::LostTransient, Some(FocusSignal::Pause)),
            (S::Owned, E::LossTransientCanDuck) => {
                (S::LostTransientDuckable, Some(FocusSignal::Duck))
            }

            (S::LostTransient, E::Gain) => (S::Owned, Some(FocusSignal::Resume)),
            (S::LostTransient, E::LossTransient | E::LossTransientCanDuck) => {
                (S::LostTransient, None)
            }

            (S::LostTransientDuckable, E::Gain) => (S::Owned, Some(FocusSignal::Unduck)),
            (S::LostTransientDuckable, E::LossTransient) => {
                (S::LostTransient, Some(FocusSignal::Pause))
            }
            (S::LostTransientDuckable, E::LossTransientCanDuck) => {
                (S::LostTransientDuckable, None)
            }

            (S::Requesting, E::Gain) => (S::Owned, Some(FocusSignal::Gained)),
            (S::Requesting, E::LossTransient | E::LossTransientCanDuck) => (S::Requesting, None),
        };

        FocusTransition { next, signal }
    }
}
