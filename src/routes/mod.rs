use axum::Router;

use crate::state::SharedState;

pub mod cookies;
pub mod docs;
pub mod game_day;
pub mod health;
pub mod migration;
pub mod player;
pub mod session;
pub mod websocket;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(game_day::router())
        .merge(session::router())
        .merge(player::router())
        .merge(migration::router())
        .merge(websocket::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
