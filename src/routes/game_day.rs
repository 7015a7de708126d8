use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use crate::{
    dto::{
        game_day::{CreateGameDayRequest, CreatedGameDay, GameDaySummary},
        session::SessionView,
    },
    error::AppError,
    routes::cookies,
    services::game_day_service,
    state::SharedState,
};

/// Routes handling the game day lifecycle: listing, creation, restart and
/// code-based entry.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game-days", get(list_game_days).post(create_game_day))
        .route("/game-days/{id}/restart", post(restart_game_day))
        .route("/game-days/join/{code}", put(join_game_day))
        .route("/game-days/transfer/{code}", put(transfer_game_day))
}

/// List every recorded game day, newest first.
#[utoipa::path(
    get,
    path = "/game-days",
    tag = "game-days",
    responses(
        (status = 200, description = "All game days, newest playedOn first", body = Vec<GameDaySummary>)
    )
)]
pub async fn list_game_days(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameDaySummary>>, AppError> {
    let game_days = game_day_service::list(&state).await?;
    Ok(Json(game_days))
}

/// Open a new game day and bind the caller to its main court.
#[utoipa::path(
    post,
    path = "/game-days",
    tag = "game-days",
    request_body = CreateGameDayRequest,
    responses(
        (status = 201, description = "Game day created, caller bound to the main court", body = CreatedGameDay),
        (status = 400, description = "Malformed settings or playedOn date")
    )
)]
pub async fn create_game_day(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(payload): Json<CreateGameDayRequest>,
) -> Result<(StatusCode, CookieJar, Json<CreatedGameDay>), AppError> {
    payload.validate()?;
    let (jar, token) = cookies::session_identity(&state, jar);
    let created = game_day_service::create(&state, &token, payload).await?;
    Ok((StatusCode::CREATED, jar, Json(created)))
}

/// Clone a past game day into a fresh live one and bind the caller to it.
#[utoipa::path(
    post,
    path = "/game-days/{id}/restart",
    tag = "game-days",
    params(("id" = String, Path, description = "Hex id of the game day to restart")),
    responses(
        (status = 201, description = "Fresh game day created from the source", body = CreatedGameDay),
        (status = 404, description = "No game day under that id")
    )
)]
pub async fn restart_game_day(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar, Json<CreatedGameDay>), AppError> {
    let (jar, token) = cookies::session_identity(&state, jar);
    let created = game_day_service::restart(&state, &token, &id).await?;
    Ok((StatusCode::CREATED, jar, Json(created)))
}

/// Join a live game day by code, receiving a fresh court.
#[utoipa::path(
    put,
    path = "/game-days/join/{code}",
    tag = "game-days",
    params(("code" = String, Path, description = "Four character join code")),
    responses(
        (status = 200, description = "Joined; view of the appended court", body = SessionView),
        (status = 404, description = "Code unknown or expired")
    )
)]
pub async fn join_game_day(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SessionView>), AppError> {
    let (jar, token) = cookies::session_identity(&state, jar);
    let view = game_day_service::join(&state, &token, &code).await?;
    Ok((jar, Json(view)))
}

/// Take over the main court of a live game day by code.
#[utoipa::path(
    put,
    path = "/game-days/transfer/{code}",
    tag = "game-days",
    params(("code" = String, Path, description = "Four character join code")),
    responses(
        (status = 200, description = "Caller now controls the main court", body = SessionView),
        (status = 404, description = "Code unknown or expired, or the game day has no courts")
    )
)]
pub async fn transfer_game_day(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SessionView>), AppError> {
    let (jar, token) = cookies::session_identity(&state, jar);
    let view = game_day_service::transfer(&state, &token, &code).await?;
    Ok((jar, Json(view)))
}
