use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the pelada backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game_day::list_game_days,
        crate::routes::game_day::create_game_day,
        crate::routes::game_day::restart_game_day,
        crate::routes::game_day::join_game_day,
        crate::routes::game_day::transfer_game_day,
        crate::routes::session::read_session,
        crate::routes::session::update_session,
        crate::routes::session::leave_session,
        crate::routes::player::upsert_player,
        crate::routes::player::list_players,
        crate::routes::player::bulk_upsert_players,
        crate::routes::migration::migrate_to_database,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::GameDayPlayerDto,
            crate::dto::common::RatedPlayerDto,
            crate::dto::common::CourtDto,
            crate::dto::game_day::CreateGameDayRequest,
            crate::dto::game_day::CreatedGameDay,
            crate::dto::game_day::GameDaySummary,
            crate::dto::session::SessionView,
            crate::dto::session::UpdateSessionRequest,
            crate::dto::player::PlayerUpsertRequest,
            crate::dto::player::CreatedPlayer,
            crate::dto::player::PlayerView,
            crate::dto::migration::SeedData,
            crate::dto::migration::GameDaySeed,
            crate::dto::migration::CourtSeed,
            crate::dto::ws::ChannelCommand,
            crate::dto::ws::GameDayEvent,
        )
    ),
    tags(
        (name = "game-days", description = "Game day lifecycle and code-based entry"),
        (name = "sessions", description = "Operations on the caller's bound court"),
        (name = "players", description = "Player skill registry"),
        (name = "migrations", description = "One-shot data imports"),
        (name = "realtime", description = "WebSocket game day channels"),
        (name = "health", description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
