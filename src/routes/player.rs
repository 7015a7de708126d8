use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use validator::Validate;

use crate::{
    dto::player::{CreatedPlayer, ListPlayersQuery, PlayerUpsertRequest, PlayerView},
    error::AppError,
    services::player_service::{self, PlayerUpsertOutcome},
    state::SharedState,
};

/// Routes exposing the player skill registry.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/players", get(list_players).put(upsert_player))
        .route("/players/bulk", put(bulk_upsert_players))
}

/// Register a player unless the name already exists.
#[utoipa::path(
    put,
    path = "/players",
    tag = "players",
    request_body = PlayerUpsertRequest,
    responses(
        (status = 200, description = "Name already registered; rating untouched"),
        (status = 201, description = "Player registered", body = CreatedPlayer),
        (status = 400, description = "Blank name")
    )
)]
pub async fn upsert_player(
    State(state): State<SharedState>,
    Json(payload): Json<PlayerUpsertRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;
    match player_service::upsert(&state, payload).await? {
        PlayerUpsertOutcome::Existing => Ok(StatusCode::OK.into_response()),
        PlayerUpsertOutcome::Created { id } => {
            Ok((StatusCode::CREATED, Json(CreatedPlayer { id })).into_response())
        }
    }
}

/// List registry entries, optionally filtered by exact names.
#[utoipa::path(
    get,
    path = "/players",
    tag = "players",
    params(
        ("name" = Option<String>, Query, description = "Comma-separated exact names to keep")
    ),
    responses(
        (status = 200, description = "Matching registry entries", body = Vec<PlayerView>)
    )
)]
pub async fn list_players(
    State(state): State<SharedState>,
    Query(query): Query<ListPlayersQuery>,
) -> Result<Json<Vec<PlayerView>>, AppError> {
    let players = player_service::list(&state, &query).await?;
    Ok(Json(players))
}

/// Overwrite the ratings of a whole batch of players in order.
#[utoipa::path(
    put,
    path = "/players/bulk",
    tag = "players",
    request_body = Vec<PlayerUpsertRequest>,
    responses(
        (status = 200, description = "Batch applied"),
        (status = 400, description = "An entry carries a blank name")
    )
)]
pub async fn bulk_upsert_players(
    State(state): State<SharedState>,
    Json(payload): Json<Vec<PlayerUpsertRequest>>,
) -> Result<StatusCode, AppError> {
    for entry in &payload {
        entry.validate()?;
    }
    player_service::bulk_upsert(&state, payload).await?;
    Ok(StatusCode::OK)
}
