use super::catalog::PermissionCatalog;
use super::evaluator::{AuthorizationResult, PolicyEvaluator, RequirementEvaluator};
use super::policy::PolicySpec;
use super::principal::Principal;
use super::registry::PolicyRegistry;
use super::resolver::{
    AuthenticatedUserFallback, FallbackPolicyProvider, PolicyResolver, PolicySource,
    ResolvedPolicy,
};
use super::table::RolePermissionTable;

/// The assembled authorization engine: catalog, capability table, registry,
/// resolver, fallback provider and evaluator behind one immutable object.
///
/// Construct it fully in `main`, then share it behind `Arc`. Nothing here
/// blocks or suspends; calls are safe from any number of concurrent request
/// tasks. Catalog changes require building a fresh engine, never mutation.
pub struct AuthzEngine {
    resolver: PolicyResolver,
    table: RolePermissionTable,
    fallback: Box<dyn FallbackPolicyProvider>,
    evaluator: Box<dyn PolicyEvaluator>,
}

impl AuthzEngine {
    /// The engine shipped with the application: standard catalog, table and
    /// registry, authenticated-only fallback, standard evaluator.
    pub fn standard() -> Self {
        Self::new(
            PermissionCatalog::standard(),
            RolePermissionTable::standard(),
            PolicyRegistry::standard(),
        )
    }

    pub fn new(
        catalog: PermissionCatalog,
        table: RolePermissionTable,
        registry: PolicyRegistry,
    ) -> Self {
        Self {
            resolver: PolicyResolver::new(registry, catalog),
            table,
            fallback: Box::new(AuthenticatedUserFallback),
            evaluator: Box::new(RequirementEvaluator::new()),
        }
    }

    pub fn with_fallback(mut self, fallback: impl FallbackPolicyProvider + 'static) -> Self {
        self.fallback = Box::new(fallback);
        self
    }

    pub fn with_evaluator(mut self, evaluator: impl PolicyEvaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Total resolution: steps 1-3 of the precedence order, then the injected
    /// fallback. Never errors for unrecognized names, including the empty
    /// string, and the fallback path stays distinguishable from a match.
    pub fn resolve(&self, policy_name: &str) -> ResolvedPolicy {
        match self.resolver.resolve(policy_name) {
            Some(resolved) => resolved,
            None => {
                tracing::debug!(policy = %policy_name, "no policy matched, applying fallback");
                ResolvedPolicy {
                    spec: self.fallback.fallback(policy_name),
                    source: PolicySource::Fallback,
                }
            }
        }
    }

    pub fn evaluate(&self, spec: &PolicySpec, principal: &Principal) -> AuthorizationResult {
        self.evaluator.evaluate(spec, principal)
    }

    /// Resolve-then-evaluate convenience used by the HTTP guard and CLI.
    pub fn authorize(&self, principal: &Principal, policy_name: &str) -> AuthorizationResult {
        let resolved = self.resolve(policy_name);
        let result = self.evaluate(&resolved.spec, principal);
        tracing::debug!(
            user_id = ?principal.user_id,
            policy = %policy_name,
            source = resolved.source.label(),
            allowed = result.succeeded,
            "authorization decision"
        );
        result
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        self.resolver.catalog()
    }

    pub fn table(&self) -> &RolePermissionTable {
        &self.table
    }

    pub fn registry(&self) -> &PolicyRegistry {
        self.resolver.registry()
    }
}
