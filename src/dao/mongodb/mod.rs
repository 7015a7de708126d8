pub mod error;
pub mod manager;

pub use error::MongoDaoError;
pub use manager::{MongoManager, connect, ensure_indexes};

/// Collection holding one document per game day, courts embedded.
pub const GAME_DAYS_COLLECTION: &str = "game-days";
/// Collection holding the skill-rating registry, one document per player name.
pub const PLAYERS_COLLECTION: &str = "players";
/// Collection holding one marker document per applied migration.
pub const MIGRATIONS_COLLECTION: &str = "migrations";
