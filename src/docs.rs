use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::models;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::health::health,
        routes::rbac::list_roles,
        routes::rbac::get_role_permissions,
        routes::rbac::list_permissions,
        routes::rbac::get_permission_roles,
        routes::rbac::check_access,
    ),
    components(
        schemas(
            models::rbac::RoleSummary,
            models::rbac::PermissionGroup,
            models::rbac::AccessCheckRequest,
            models::rbac::AccessCheckResponse,
            routes::health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "RBAC", description = "Role and permission introspection"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_routes() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
