use mongodb::{bson::oid::ObjectId, error::Error as MongoError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MongoDaoError>;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to insert game day")]
    InsertGameDay {
        #[source]
        source: MongoError,
    },
    #[error("failed to load game day `{id}`")]
    FindGameDay {
        id: ObjectId,
        #[source]
        source: MongoError,
    },
    #[error("failed to look up game day by join code")]
    FindByJoinCode {
        #[source]
        source: MongoError,
    },
    #[error("failed to list game days")]
    ListGameDays {
        #[source]
        source: MongoError,
    },
    #[error("failed to append court to game day `{id}`")]
    PushCourt {
        id: ObjectId,
        #[source]
        source: MongoError,
    },
    #[error("failed to update court `{court_id}` of game day `{id}`")]
    UpdateCourt {
        id: ObjectId,
        court_id: ObjectId,
        #[source]
        source: MongoError,
    },
    #[error("failed to find player `{name}`")]
    FindPlayer {
        name: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to insert player `{name}`")]
    InsertPlayer {
        name: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to upsert rating for player `{name}`")]
    UpsertPlayer {
        name: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to list players")]
    ListPlayers {
        #[source]
        source: MongoError,
    },
    #[error("failed to look up migration marker `{name}`")]
    FindMigrationMarker {
        name: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to record migration marker `{name}`")]
    RecordMigrationMarker {
        name: String,
        #[source]
        source: MongoError,
    },
}
