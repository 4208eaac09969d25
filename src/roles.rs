use crate::error::StoreError;
use ahash::{AHashMap, AHashSet};

/// Resolves the roles an actor holds. Group and permission selectors on work
/// items are matched against this set.
///
/// Lookups backed by a database report their failures as `StoreError`; an
/// unknown actor simply has no roles.
pub trait RoleLookup: Send + Sync {
    fn roles_of(&self, actor_id: &str) -> Result<AHashSet<String>, StoreError>;
}

/// A fixed actor-to-roles table.
#[derive(Debug, Clone, Default)]
pub struct StaticRoles {
    assignments: AHashMap<String, AHashSet<String>>,
}

impl StaticRoles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, actor_id: &str, role: &str) -> Self {
        self.grant(actor_id, role);
        self
    }

    pub fn grant(&mut self, actor_id: &str, role: &str) {
        self.assignments
            .entry(actor_id.to_string())
            .or_default()
            .insert(role.to_string());
    }
}

impl RoleLookup for StaticRoles {
    fn roles_of(&self, actor_id: &str) -> Result<AHashSet<String>, StoreError> {
        Ok(self.assignments.get(actor_id).cloned().unwrap_or_default())
    }
}
