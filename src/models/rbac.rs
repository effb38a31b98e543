use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleSummary {
    #[schema(example = "Coach")]
    pub name: String,
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionGroup {
    #[schema(example = "Exercise")]
    pub category: String,
    pub codes: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AccessCheckRequest {
    #[schema(example = "CanManageExercises")]
    pub policy: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccessCheckResponse {
    pub policy: String,
    /// Resolution step that matched: "registry", "catalog", "prefixed" or "fallback"
    #[schema(example = "registry")]
    pub source: String,
    pub allowed: bool,
    pub failed_requirements: Vec<String>,
}
