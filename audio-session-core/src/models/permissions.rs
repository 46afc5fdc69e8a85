use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A runtime capability the host must grant before audio output is set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    RecordAudio,
    ModifyAudioSettings,
}

/// The set of capabilities a session requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    required: BTreeSet<Capability>,
}

impl PermissionSet {
    pub fn new(required: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            required: required.into_iter().collect(),
        }
    }

    /// A set with nothing required.
    pub fn empty() -> Self {
        Self {
            required: BTreeSet::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.required.iter().copied()
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.required.contains(&capability)
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    /// Capabilities in this set that `is_granted` reports as missing, in order.
    pub fn missing(&self, is_granted: impl Fn(Capability) -> bool) -> Vec<Capability> {
        self.iter().filter(|&c| !is_granted(c)).collect()
    }
}

impl Default for PermissionSet {
    fn default() -> Self {
        Self::new([Capability::RecordAudio, Capability::ModifyAudioSettings])
    }
}
