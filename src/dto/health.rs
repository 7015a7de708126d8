use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// MongoDB reachability ("connected" or "unreachable").
    pub database: String,
}

impl HealthResponse {
    /// Create a health response indicating the system is fully operational.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            database: "connected".to_string(),
        }
    }

    /// Create a health response indicating MongoDB cannot be reached.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            database: "unreachable".to_string(),
        }
    }
}
