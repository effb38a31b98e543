use std::collections::BTreeSet;
use std::fmt;

/// One atomic access condition within a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementSpec {
    /// Satisfied when the caller holds any one of the allowed roles.
    Role { allowed_roles: BTreeSet<String> },
    /// Satisfied when the caller's permission claims contain exactly `code`.
    ///
    /// Construction never validates the code; an empty or uncataloged code is
    /// representable and simply cannot be satisfied by a well-formed claim set.
    Permission { code: String },
}

impl RequirementSpec {
    pub fn role<I, S>(allowed_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RequirementSpec::Role {
            allowed_roles: allowed_roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn permission(code: impl Into<String>) -> Self {
        RequirementSpec::Permission { code: code.into() }
    }
}

impl fmt::Display for RequirementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementSpec::Role { allowed_roles } => {
                let roles: Vec<&str> = allowed_roles.iter().map(String::as_str).collect();
                write!(f, "role in [{}]", roles.join(", "))
            }
            RequirementSpec::Permission { code } => write!(f, "permission {}", code),
        }
    }
}

/// A named, ordered collection of requirements.
///
/// A policy succeeds only if every requirement succeeds (AND across
/// requirements). A role requirement is internally OR across its role list;
/// the two combinators live at different levels and are never mixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySpec {
    pub name: String,
    pub requirements: Vec<RequirementSpec>,
}

impl PolicySpec {
    pub fn new(name: impl Into<String>, requirements: Vec<RequirementSpec>) -> Self {
        Self {
            name: name.into(),
            requirements,
        }
    }
}

impl fmt::Display for PolicySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.requirements.iter().map(|r| r.to_string()).collect();
        write!(f, "{} [{}]", self.name, parts.join(" AND "))
    }
}
