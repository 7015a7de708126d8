use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use validator::Validate;

use crate::{
    dto::migration::SeedData,
    error::AppError,
    services::migration_service::{self, MigrationOutcome},
    state::SharedState,
};

/// Routes for one-shot data imports.
pub fn router() -> Router<SharedState> {
    Router::new().route("/migrations/to-database", post(migrate_to_database))
}

/// Import locally accumulated client data once.
#[utoipa::path(
    post,
    path = "/migrations/to-database",
    tag = "migrations",
    request_body = SeedData,
    responses(
        (status = 201, description = "Seed imported and marker recorded"),
        (status = 200, description = "Import already ran; payload ignored"),
        (status = 400, description = "Seed payload rejected")
    )
)]
pub async fn migrate_to_database(
    State(state): State<SharedState>,
    Json(payload): Json<SeedData>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    match migration_service::seed_to_database(&state, payload).await? {
        MigrationOutcome::Applied => Ok(StatusCode::CREATED),
        MigrationOutcome::Skipped => Ok(StatusCode::OK),
    }
}
