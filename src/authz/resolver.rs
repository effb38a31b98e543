use super::catalog::PermissionCatalog;
use super::policy::{PolicySpec, RequirementSpec};
use super::registry::{PolicyDefinition, PolicyRegistry};

/// Reserved prefix for ad hoc permission checks requested by declarative call
/// sites, e.g. `Permission:custom.feature.toggle`.
pub const PERMISSION_POLICY_PREFIX: &str = "Permission:";

/// Builds the resolver-recognized policy name for an arbitrary permission
/// code. This is the output contract of the declarative binding surface.
pub fn permission_policy(code: &str) -> String {
    format!("{PERMISSION_POLICY_PREFIX}{code}")
}

/// Which resolution step produced a policy spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicySource {
    /// Exact match against a registered policy name.
    Registry,
    /// Exact match against a catalog permission code.
    Catalog,
    /// `Permission:`-prefixed ad hoc code, taken as-is.
    Prefixed,
    /// Nothing matched; the injected fallback applied.
    Fallback,
}

impl PolicySource {
    pub fn label(&self) -> &'static str {
        match self {
            PolicySource::Registry => "registry",
            PolicySource::Catalog => "catalog",
            PolicySource::Prefixed => "prefixed",
            PolicySource::Fallback => "fallback",
        }
    }
}

/// A resolved policy together with the step that produced it, so callers can
/// tell a registered match from the fallback path.
#[derive(Debug, Clone)]
pub struct ResolvedPolicy {
    pub spec: PolicySpec,
    pub source: PolicySource,
}

impl ResolvedPolicy {
    pub fn is_fallback(&self) -> bool {
        self.source == PolicySource::Fallback
    }
}

/// Supplies the requirement spec applied when no resolution step matches.
pub trait FallbackPolicyProvider: Send + Sync {
    fn fallback(&self, requested: &str) -> PolicySpec;
}

/// Default fallback: any authenticated caller passes.
///
/// The spec carries zero requirements; authentication is a precondition
/// checked by the evaluator before requirements, so an empty requirement list
/// means exactly "authenticated user required" and never an implicit allow
/// for anonymous callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthenticatedUserFallback;

impl FallbackPolicyProvider for AuthenticatedUserFallback {
    fn fallback(&self, requested: &str) -> PolicySpec {
        PolicySpec::new(requested, Vec::new())
    }
}

/// Turns an arbitrary policy name into a requirement spec using a fixed
/// precedence order. The order is a security contract: a registered name that
/// collides with a bare catalog code must resolve as the registered (possibly
/// stricter, composite) policy and never degrade to a single-permission check.
#[derive(Debug, Clone)]
pub struct PolicyResolver {
    registry: PolicyRegistry,
    catalog: PermissionCatalog,
}

impl PolicyResolver {
    pub fn new(registry: PolicyRegistry, catalog: PermissionCatalog) -> Self {
        Self { registry, catalog }
    }

    /// Applies steps 1-3 of the resolution order. Returns `None` when nothing
    /// matched; the caller decides whether to apply a fallback. Never panics,
    /// for any input including the empty string.
    ///
    /// Specs are built fresh on every call; nothing is memoized, which keeps
    /// the prefixed path correct if callers ever vary codes at runtime.
    pub fn resolve(&self, name: &str) -> Option<ResolvedPolicy> {
        if let Some(definition) = self.registry.get(name) {
            return Some(ResolvedPolicy {
                spec: spec_from_definition(name, definition),
                source: PolicySource::Registry,
            });
        }

        if self.catalog.contains(name) {
            return Some(ResolvedPolicy {
                spec: PolicySpec::new(name, vec![RequirementSpec::permission(name)]),
                source: PolicySource::Catalog,
            });
        }

        // Deliberately unvalidated: declarative call sites may request codes
        // that were never registered in the catalog. Strictness here would
        // break that contract.
        if let Some(code) = name.strip_prefix(PERMISSION_POLICY_PREFIX) {
            return Some(ResolvedPolicy {
                spec: PolicySpec::new(name, vec![RequirementSpec::permission(code)]),
                source: PolicySource::Prefixed,
            });
        }

        None
    }

    pub fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }
}

fn spec_from_definition(name: &str, definition: PolicyDefinition) -> PolicySpec {
    let requirements = match definition {
        PolicyDefinition::RoleBased(allowed_roles) => {
            vec![RequirementSpec::role(allowed_roles.iter().copied())]
        }
        PolicyDefinition::PermissionBased(codes) => codes
            .iter()
            .map(|code| RequirementSpec::permission(*code))
            .collect(),
    };
    PolicySpec::new(name, requirements)
}
