use std::collections::HashSet;

use uuid::Uuid;

/// Produced by the token/identity subsystem: an authentication flag plus the
/// claims asserted about the caller.
pub trait ClaimsSource {
    fn subject(&self) -> Option<Uuid>;
    fn is_authenticated(&self) -> bool;
    fn role_claims(&self) -> Vec<String>;
    fn permission_claims(&self) -> Vec<String>;
}

/// The caller being evaluated.
///
/// Duplicate claims collapse into the sets; empty or whitespace-only claim
/// values are treated as absent rather than stored.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Option<Uuid>,
    pub authenticated: bool,
    pub roles: HashSet<String>,
    pub permissions: HashSet<String>,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            authenticated: false,
            roles: HashSet::new(),
            permissions: HashSet::new(),
        }
    }

    pub fn authenticated(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
            authenticated: true,
            roles: HashSet::new(),
            permissions: HashSet::new(),
        }
    }

    pub fn from_claims<S: ClaimsSource + ?Sized>(source: &S) -> Self {
        let base = if source.is_authenticated() {
            match source.subject() {
                Some(user_id) => Self::authenticated(user_id),
                None => Self {
                    user_id: None,
                    authenticated: true,
                    roles: HashSet::new(),
                    permissions: HashSet::new(),
                },
            }
        } else {
            Self::anonymous()
        };

        base.with_roles(source.role_claims())
            .with_permissions(source.permission_claims())
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = String>) -> Self {
        self.roles = clean_claims(roles);
        self
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = String>) -> Self {
        self.permissions = clean_claims(permissions);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn has_permission(&self, code: &str) -> bool {
        self.permissions.contains(code)
    }
}

fn clean_claims(values: impl IntoIterator<Item = String>) -> HashSet<String> {
    values
        .into_iter()
        .filter(|value| !value.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_claims_are_treated_as_absent() {
        let principal = Principal::authenticated(Uuid::new_v4())
            .with_roles(vec!["Admin".to_string(), "".to_string(), "  ".to_string()])
            .with_permissions(vec!["USER_READ".to_string(), String::new()]);

        assert_eq!(principal.roles.len(), 1);
        assert_eq!(principal.permissions.len(), 1);
        assert!(!principal.has_permission(""));
    }

    #[test]
    fn duplicate_claims_collapse() {
        let principal = Principal::authenticated(Uuid::new_v4())
            .with_permissions(vec!["USER_READ".to_string(), "USER_READ".to_string()]);
        assert_eq!(principal.permissions.len(), 1);
    }
}
