pub mod health;
pub mod rbac;

use crate::app::AppState;
use crate::authz::{AuthzMode, Principal};
use crate::errors::AppError;

/// Applies the engine's decision under the configured enforcement mode.
/// Strict mode surfaces denials as 403; advisory mode logs and allows.
pub(crate) fn enforce(
    state: &AppState,
    principal: &Principal,
    policy: &str,
) -> Result<(), AppError> {
    if state.mode == AuthzMode::Off {
        return Ok(());
    }

    let decision = state.engine.authorize(principal, policy);
    if decision.succeeded {
        return Ok(());
    }

    let failed: Vec<String> = decision
        .failed_requirements
        .iter()
        .map(|requirement| requirement.to_string())
        .collect();

    match state.mode {
        AuthzMode::Advisory => {
            tracing::warn!(
                user_id = ?principal.user_id,
                policy = %policy,
                failed = ?failed,
                "authorization denied (advisory mode, allowing)"
            );
            Ok(())
        }
        _ => Err(AppError::forbidden(format!(
            "policy {} not satisfied: {}",
            policy,
            failed.join("; ")
        ))),
    }
}
