use crate::models::permissions::Capability;

/// Source of truth for runtime permission grants.
///
/// Prompting the user is the authority's business; the session only asks.
pub trait PermissionAuthority: Send + Sync {
    fn is_granted(&self, capability: Capability) -> bool;
}
