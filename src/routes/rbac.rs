//! RBAC Introspection API Routes
//!
//! Read-only views over the permission catalog, the role capability table and
//! the policy registry, plus an access self-check. The catalog is fixed at
//! startup; there are no mutating endpoints.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::app::AppState;
use crate::authz::policies;
use crate::errors::AppError;
use crate::jwt::AuthUser;
use crate::models::rbac::{
    AccessCheckRequest, AccessCheckResponse, PermissionGroup, RoleSummary,
};
use crate::routes::enforce;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/roles", get(list_roles))
        .route("/roles/:name/permissions", get(get_role_permissions))
        .route("/permissions", get(list_permissions))
        .route("/permissions/:code/roles", get(get_permission_roles))
        .route("/check", post(check_access))
}

/// List all roles with their granted permission codes
#[utoipa::path(
    get,
    path = "/rbac/roles",
    tag = "RBAC",
    responses(
        (status = 200, description = "List of roles", body = Vec<RoleSummary>),
        (status = 403, description = "Caller is not an admin"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_roles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RoleSummary>>, AppError> {
    enforce(&state, &auth.principal, policies::ADMIN_ONLY)?;

    let table = state.engine.table();
    let roles: Vec<RoleSummary> = table
        .roles()
        .map(|name| RoleSummary {
            name: name.to_string(),
            permissions: table
                .permissions_for_role(name)
                .iter()
                .cloned()
                .collect(),
        })
        .collect();

    Ok(Json(roles))
}

/// Get the permission codes granted to a role
///
/// An unrecognized role is not an error: it carries zero capabilities and
/// yields an empty list.
#[utoipa::path(
    get,
    path = "/rbac/roles/{name}/permissions",
    tag = "RBAC",
    params(
        ("name" = String, Path, description = "Role name"),
    ),
    responses(
        (status = 200, description = "Granted permission codes", body = Vec<String>),
        (status = 403, description = "Caller is not an admin"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_role_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    enforce(&state, &auth.principal, policies::ADMIN_ONLY)?;

    let codes: Vec<String> = state
        .engine
        .table()
        .permissions_for_role(&name)
        .iter()
        .cloned()
        .collect();

    Ok(Json(codes))
}

/// List the permission catalog grouped by category
#[utoipa::path(
    get,
    path = "/rbac/permissions",
    tag = "RBAC",
    responses(
        (status = 200, description = "Permission catalog", body = Vec<PermissionGroup>),
        (status = 403, description = "Caller is not an admin"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn list_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<PermissionGroup>>, AppError> {
    enforce(&state, &auth.principal, policies::ADMIN_ONLY)?;

    let groups: Vec<PermissionGroup> = state
        .engine
        .catalog()
        .groups()
        .map(|(category, codes)| PermissionGroup {
            category: category.label().to_string(),
            codes: codes.iter().map(|code| code.to_string()).collect(),
        })
        .collect();

    Ok(Json(groups))
}

/// Get the roles granting a permission code (reverse lookup)
#[utoipa::path(
    get,
    path = "/rbac/permissions/{code}/roles",
    tag = "RBAC",
    params(
        ("code" = String, Path, description = "Permission code"),
    ),
    responses(
        (status = 200, description = "Roles granting the code", body = Vec<String>),
        (status = 403, description = "Caller is not an admin"),
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_permission_roles(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    enforce(&state, &auth.principal, policies::ADMIN_ONLY)?;

    let roles: Vec<String> = state.engine.table().roles_granting(&code).iter().cloned().collect();

    Ok(Json(roles))
}

/// Check whether the caller satisfies a policy
///
/// Resolves the submitted name through the full precedence order (registered
/// policy, bare catalog code, `Permission:`-prefixed code, fallback) and
/// evaluates it against the caller's own claims. Always 200 with the decision
/// inside; enforcement mode does not apply to a self-check.
#[utoipa::path(
    post,
    path = "/rbac/check",
    tag = "RBAC",
    request_body = AccessCheckRequest,
    responses(
        (status = 200, description = "Authorization decision", body = AccessCheckResponse),
    ),
    security(("bearerAuth" = []))
)]
pub async fn check_access(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<AccessCheckRequest>,
) -> Result<Json<AccessCheckResponse>, AppError> {
    let resolved = state.engine.resolve(&req.policy);
    let result = state.engine.evaluate(&resolved.spec, &auth.principal);

    Ok(Json(AccessCheckResponse {
        policy: req.policy,
        source: resolved.source.label().to_string(),
        allowed: result.succeeded,
        failed_requirements: result
            .failed_requirements
            .iter()
            .map(|requirement| requirement.to_string())
            .collect(),
    }))
}
