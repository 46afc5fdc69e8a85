//! Desktop permission authority.
//!
//! Desktop audio output needs no runtime consent, so every capability is
//! granted unless an embedder revokes it (for instance to mirror a global
//! microphone privacy toggle).

use std::collections::BTreeSet;

use parking_lot::Mutex;

use audio_session_core::models::permissions::Capability;
use audio_session_core::traits::permission_authority::PermissionAuthority;

pub struct DesktopPermissions {
    granted: Mutex<BTreeSet<Capability>>,
}

impl DesktopPermissions {
    pub fn all_granted() -> Self {
        Self::granting([Capability::RecordAudio, Capability::ModifyAudioSettings])
    }

    pub fn granting(granted: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            granted: Mutex::new(granted.into_iter().collect()),
        }
    }

    pub fn grant(&self, capability: Capability) {
        self.granted.lock().insert(capability);
    }

    pub fn revoke(&self, capability: Capability) {
        if self.granted.lock().remove(&capability) {
            log::info!("Revoked {:?}", capability);
        }
    }
}

impl Default for DesktopPermissions {
    fn default() -> Self {
        Self::all_granted()
    }
}

impl PermissionAuthority for DesktopPermissions {
    fn is_granted(&self, capability: Capability) -> bool {
        self.granted.lock().contains(&capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grants_everything_by_default() {
        let perms = DesktopPermissions::default();
        assert!(perms.is_granted(Capability::RecordAudio));
        assert!(perms.is_granted(Capability::ModifyAudioSettings));
    }

    #[test]
    fn revoke_and_grant() {
        let perms = DesktopPermissions::all_granted();
        perms.revoke(Capability::RecordAudio);
        assert!(!perms.is_granted(Capability::RecordAudio));
        perms.grant(Capability::RecordAudio);
        assert!(perms.is_granted(Capability::RecordAudio));
    }
}
