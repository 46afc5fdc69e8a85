/// Counters for debugging focus handling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDiagnostics {
    pub focus_requests: u64,
    pub focus_grants: u64,
    pub focus_denials: u64,
    pub focus_delays: u64,
    /// Focus notifications applied to the state machine.
    pub focus_events: u64,
    /// Notifications dropped because their registration was torn down.
    pub ignored_events: u64,
    pub teardowns: u64,
    /// RFC 3339 time of the last state change.
    pub last_transition_at: Option<String>,
}
