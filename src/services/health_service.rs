use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report process liveness together with database reachability. A failed
/// ping degrades the report instead of failing the request.
pub async fn check(state: &SharedState) -> HealthResponse {
    match state.mongo().ping().await {
        Ok(()) => HealthResponse::ok(),
        Err(err) => {
            warn!(error = %err, "database ping failed");
            HealthResponse::degraded()
        }
    }
}
