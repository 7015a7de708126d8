use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, put},
};
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use crate::{
    dto::session::{SessionView, UpdateSessionRequest},
    error::AppError,
    routes::cookies,
    services::game_day_service,
    state::SharedState,
};

/// Routes operating on the court bound to the caller's session.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions/game-day", get(read_session).put(update_session))
        .route("/sessions/game-day/leave", put(leave_session))
}

/// Read the current view of the caller's bound court.
#[utoipa::path(
    get,
    path = "/sessions/game-day",
    tag = "sessions",
    responses(
        (status = 200, description = "View of the bound court", body = SessionView),
        (status = 404, description = "No binding, game day not live, or court gone")
    )
)]
pub async fn read_session(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<Json<SessionView>, AppError> {
    let token = cookies::session_token(&jar);
    let view = game_day_service::current(&state, token.as_deref()).await?;
    Ok(Json(view))
}

/// Patch the bound court and its game day.
#[utoipa::path(
    put,
    path = "/sessions/game-day",
    tag = "sessions",
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Patch applied"),
        (status = 401, description = "Caller has no session binding"),
        (status = 404, description = "Bound game day or court vanished")
    )
)]
pub async fn update_session(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(payload): Json<UpdateSessionRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    let token = cookies::session_token(&jar);
    game_day_service::update(&state, token.as_deref(), payload).await?;
    Ok(StatusCode::OK)
}

/// Vacate the bound court and drop the caller's binding.
#[utoipa::path(
    put,
    path = "/sessions/game-day/leave",
    tag = "sessions",
    responses(
        (status = 200, description = "Court vacated, binding destroyed"),
        (status = 404, description = "Caller has no session binding")
    )
)]
pub async fn leave_session(
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<StatusCode, AppError> {
    let token = cookies::session_token(&jar);
    game_day_service::leave(&state, token.as_deref()).await?;
    Ok(StatusCode::OK)
}
