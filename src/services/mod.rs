/// OpenAPI documentation generation.
pub mod documentation;
/// Game day lifecycle: creation, restart, join, transfer and session views.
pub mod game_day_service;
/// Health check service.
pub mod health_service;
/// Join code generation.
pub mod join_code;
/// One-shot data import migrations.
pub mod migration_service;
/// Player skill registry operations.
pub mod player_service;
/// WebSocket connection and channel subscription handling.
pub mod websocket_service;
