/// Game day document storage and retrieval operations.
pub mod game_day;
/// Migration marker bookkeeping.
pub mod migration;
/// Database model definitions.
pub mod models;
/// MongoDB connection management and shared collection names.
pub mod mongodb;
/// Player rating registry operations.
pub mod player;
