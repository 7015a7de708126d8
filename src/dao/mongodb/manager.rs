use std::time::Duration;

use mongodb::{
    Client, Database, IndexModel,
    bson::doc,
    options::{ClientOptions, IndexOptions},
};
use tokio::time::sleep;
use tracing::warn;

use super::error::{MongoDaoError, Result};

const MAX_CONNECT_ATTEMPTS: u32 = 10;
const BASE_RETRY_DELAY_MS: u64 = 250;
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Shared handle to the MongoDB database backing every repository.
///
/// The connection is established once at startup; afterwards the driver's own
/// pool takes care of socket recovery.
#[derive(Clone)]
pub struct MongoManager {
    database: Database,
}

/// Connect to MongoDB, retrying the initial ping with exponential backoff.
pub async fn connect(uri: &str, db_name: &str) -> Result<MongoManager> {
    let options = ClientOptions::parse(uri)
        .await
        .map_err(|source| MongoDaoError::InvalidUri {
            uri: uri.to_owned(),
            source,
        })?;

    let client = Client::with_options(options)
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(db_name);

    let mut attempts = 0;
    let mut delay = Duration::from_millis(BASE_RETRY_DELAY_MS);

    loop {
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => break,
            Err(err) => {
                attempts += 1;
                if attempts >= MAX_CONNECT_ATTEMPTS {
                    return Err(MongoDaoError::InitialPing {
                        attempts,
                        source: err,
                    });
                }
                warn!(attempts, error = %err, "MongoDB not reachable yet; retrying");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_RETRY_DELAY);
            }
        }
    }

    Ok(MongoManager { database })
}

/// Ensure the indexes required by the application are present.
pub async fn ensure_indexes(database: &Database) -> Result<()> {
    let players = database.collection::<mongodb::bson::Document>(super::PLAYERS_COLLECTION);
    let unique_name = IndexModel::builder()
        .keys(doc! {"name": 1})
        .options(
            IndexOptions::builder()
                .unique(Some(true))
                .name(Some("player_name_idx".to_string()))
                .build(),
        )
        .build();
    players
        .create_index(unique_name)
        .await
        .map_err(|source| MongoDaoError::EnsureIndex {
            collection: super::PLAYERS_COLLECTION,
            index: "player_name_idx",
            source,
        })?;

    let game_days = database.collection::<mongodb::bson::Document>(super::GAME_DAYS_COLLECTION);
    // Join codes are deliberately not unique; collisions only blur lookups
    // while both codes are alive.
    let join_code = IndexModel::builder()
        .keys(doc! {"joinCode": 1})
        .options(
            IndexOptions::builder()
                .name(Some("game_day_join_code_idx".to_string()))
                .build(),
        )
        .build();
    game_days
        .create_index(join_code)
        .await
        .map_err(|source| MongoDaoError::EnsureIndex {
            collection: super::GAME_DAYS_COLLECTION,
            index: "game_day_join_code_idx",
            source,
        })?;

    let played_on = IndexModel::builder()
        .keys(doc! {"playedOn": -1})
        .options(
            IndexOptions::builder()
                .name(Some("game_day_played_on_idx".to_string()))
                .build(),
        )
        .build();
    game_days
        .create_index(played_on)
        .await
        .map_err(|source| MongoDaoError::EnsureIndex {
            collection: super::GAME_DAYS_COLLECTION,
            index: "game_day_played_on_idx",
            source,
        })?;

    Ok(())
}

impl MongoManager {
    /// Clone the database handle.
    pub fn database(&self) -> Database {
        self.database.clone()
    }

    /// Issue a ping against the MongoDB deployment.
    pub async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }
}
