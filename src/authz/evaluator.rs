use super::policy::{PolicySpec, RequirementSpec};
use super::principal::Principal;

/// Outcome of evaluating a policy spec against a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationResult {
    pub succeeded: bool,
    /// Requirements that were not satisfied, for logging and audit.
    pub failed_requirements: Vec<RequirementSpec>,
}

impl AuthorizationResult {
    pub fn granted() -> Self {
        Self {
            succeeded: true,
            failed_requirements: Vec::new(),
        }
    }

    pub fn denied(failed_requirements: Vec<RequirementSpec>) -> Self {
        Self {
            succeeded: false,
            failed_requirements,
        }
    }
}

/// Policy evaluator trait for pluggable authorization logic
pub trait PolicyEvaluator: Send + Sync {
    fn evaluate(&self, spec: &PolicySpec, principal: &Principal) -> AuthorizationResult;
}

/// Default evaluator with the standard requirement semantics.
///
/// Requirements are evaluated independently and exhaustively rather than
/// short-circuiting, so every failure can be reported. An unauthenticated
/// principal is denied before any per-requirement check runs; authentication
/// is a precondition, not a requirement among equals.
#[derive(Debug, Clone, Default)]
pub struct RequirementEvaluator;

impl RequirementEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn requirement_met(requirement: &RequirementSpec, principal: &Principal) -> bool {
        match requirement {
            RequirementSpec::Role { allowed_roles } => {
                allowed_roles.iter().any(|role| principal.has_role(role))
            }
            RequirementSpec::Permission { code } => principal.has_permission(code),
        }
    }
}

impl PolicyEvaluator for RequirementEvaluator {
    fn evaluate(&self, spec: &PolicySpec, principal: &Principal) -> AuthorizationResult {
        if !principal.is_authenticated() {
            tracing::debug!(policy = %spec.name, "denied: unauthenticated principal");
            return AuthorizationResult::denied(spec.requirements.clone());
        }

        let failed: Vec<RequirementSpec> = spec
            .requirements
            .iter()
            .filter(|requirement| !Self::requirement_met(requirement, principal))
            .cloned()
            .collect();

        if failed.is_empty() {
            tracing::debug!(
                user_id = ?principal.user_id,
                policy = %spec.name,
                "all requirements satisfied"
            );
            AuthorizationResult::granted()
        } else {
            tracing::debug!(
                user_id = ?principal.user_id,
                policy = %spec.name,
                failed = failed.len(),
                "requirements not satisfied"
            );
            AuthorizationResult::denied(failed)
        }
    }
}
