use std::collections::{BTreeMap, BTreeSet};

use super::catalog::PermissionCatalog;
use super::{permissions, roles};

/// Static role -> permission capability table.
///
/// Grants are additive snapshots defined once at startup. Lookups never fail:
/// an unrecognized role carries zero capabilities and an unrecognized code is
/// granted by zero roles. The reverse index is precomputed at load time since
/// the forward table is immutable.
#[derive(Debug, Clone)]
pub struct RolePermissionTable {
    grants: BTreeMap<String, BTreeSet<String>>,
    granting: BTreeMap<String, BTreeSet<String>>,
    empty: BTreeSet<String>,
}

impl RolePermissionTable {
    /// Builds a table from (role, granted codes) pairs, deduplicating codes
    /// and precomputing the reverse index.
    pub fn from_grants<R, I, S>(entries: R) -> Self
    where
        R: IntoIterator<Item = (S, I)>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut grants: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (role, codes) in entries {
            grants
                .entry(role.into())
                .or_default()
                .extend(codes.into_iter().map(Into::into));
        }

        let mut granting: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (role, codes) in &grants {
            for code in codes {
                granting.entry(code.clone()).or_default().insert(role.clone());
            }
        }

        Self {
            grants,
            granting,
            empty: BTreeSet::new(),
        }
    }

    /// The table shipped with the application: Admin holds every catalog code,
    /// Coach manages the exercise library on top of the Customer set, and
    /// Customer works with their own training data.
    pub fn standard() -> Self {
        let catalog = PermissionCatalog::standard();

        let customer: Vec<&str> = vec![
            permissions::EXERCISE_READ,
            permissions::WORKOUT_CREATE,
            permissions::WORKOUT_READ,
            permissions::WORKOUT_UPDATE,
            permissions::WORKOUT_DELETE,
            permissions::NUTRITION_CREATE,
            permissions::NUTRITION_READ,
            permissions::NUTRITION_UPDATE,
            permissions::NUTRITION_DELETE,
            permissions::GOAL_CREATE,
            permissions::GOAL_READ,
            permissions::GOAL_UPDATE,
            permissions::GOAL_DELETE,
        ];

        let mut coach = customer.clone();
        coach.extend([
            permissions::EXERCISE_CREATE,
            permissions::EXERCISE_UPDATE,
            permissions::EXERCISE_DELETE,
            permissions::USER_READ,
        ]);

        let admin: Vec<&str> = catalog.codes().collect();

        Self::from_grants([
            (roles::ADMIN, admin),
            (roles::COACH, coach),
            (roles::CUSTOMER, customer),
        ])
    }

    /// The role's grant set, or an empty set for an unrecognized role.
    pub fn permissions_for_role(&self, role: &str) -> &BTreeSet<String> {
        self.grants.get(role).unwrap_or(&self.empty)
    }

    pub fn role_has_permission(&self, role: &str, code: &str) -> bool {
        self.permissions_for_role(role).contains(code)
    }

    /// Roles granting the code, or an empty set for an unrecognized code.
    pub fn roles_granting(&self, code: &str) -> &BTreeSet<String> {
        self.granting.get(code).unwrap_or(&self.empty)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.grants.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl Default for RolePermissionTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_role_has_no_capabilities() {
        let table = RolePermissionTable::standard();
        assert!(table.permissions_for_role("Auditor").is_empty());
        assert!(!table.role_has_permission("Auditor", permissions::USER_READ));
    }

    #[test]
    fn unknown_code_is_granted_by_no_role() {
        let table = RolePermissionTable::standard();
        assert!(table.roles_granting("TOTALLY_MADE_UP").is_empty());
    }

    #[test]
    fn reverse_index_matches_forward_table() {
        let table = RolePermissionTable::standard();
        for role in ["Admin", "Coach", "Customer"] {
            for code in table.permissions_for_role(role).clone() {
                assert!(
                    table.roles_granting(&code).contains(role),
                    "{role} grants {code} but reverse lookup disagrees"
                );
            }
        }
    }

    #[test]
    fn customer_cannot_delete_users() {
        let table = RolePermissionTable::standard();
        assert!(!table.role_has_permission(roles::CUSTOMER, permissions::USER_DELETE));
        assert!(table.role_has_permission(roles::ADMIN, permissions::USER_DELETE));
    }
}
