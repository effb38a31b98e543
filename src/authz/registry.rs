use std::collections::HashMap;

use super::{permissions, policies, roles};

/// Declarative shape of a registered policy.
///
/// Role policies succeed when the caller holds any listed role. Permission
/// policies list 1..N required codes, all of which must be held.
#[derive(Debug, Clone, Copy)]
pub enum PolicyDefinition {
    RoleBased(&'static [&'static str]),
    PermissionBased(&'static [&'static str]),
}

/// Maps policy names to requirement definitions.
///
/// Lookup is a direct map access keyed by the exact name, never a scan over
/// unrelated constant sets, so identically-valued constants elsewhere cannot
/// be resolved ambiguously. Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct PolicyRegistry {
    policies: HashMap<&'static str, PolicyDefinition>,
}

impl PolicyRegistry {
    pub fn empty() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    /// The registry shipped with the application.
    pub fn standard() -> Self {
        Self::empty()
            .register(
                policies::ADMIN_ONLY,
                PolicyDefinition::RoleBased(&[roles::ADMIN]),
            )
            .register(
                policies::ADMIN_OR_COACH,
                PolicyDefinition::RoleBased(&[roles::ADMIN, roles::COACH]),
            )
            .register(
                policies::CAN_MANAGE_USERS,
                PolicyDefinition::PermissionBased(&[
                    permissions::USER_READ,
                    permissions::USER_UPDATE_ROLE,
                    permissions::USER_DELETE,
                ]),
            )
            .register(
                policies::CAN_DELETE_USERS,
                PolicyDefinition::PermissionBased(&[permissions::USER_DELETE]),
            )
            .register(
                policies::CAN_MANAGE_EXERCISES,
                PolicyDefinition::PermissionBased(&[
                    permissions::EXERCISE_CREATE,
                    permissions::EXERCISE_UPDATE,
                    permissions::EXERCISE_DELETE,
                ]),
            )
            .register(
                policies::CAN_EDIT_EXERCISES,
                PolicyDefinition::PermissionBased(&[permissions::EXERCISE_UPDATE]),
            )
    }

    /// Adds a definition. Part of startup construction; the registry is not
    /// mutated once the engine holds it.
    pub fn register(mut self, name: &'static str, definition: PolicyDefinition) -> Self {
        self.policies.insert(name, definition);
        self
    }

    pub fn get(&self, name: &str) -> Option<PolicyDefinition> {
        self.policies.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.policies.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
