use futures::TryStreamExt;
use mongodb::{
    Collection,
    bson::{Document, doc},
};

use crate::dao::{
    models::PlayerEntity,
    mongodb::{MongoDaoError, MongoManager, PLAYERS_COLLECTION},
};

/// Data Access Object encapsulating MongoDB interaction for the player
/// rating registry.
#[derive(Clone)]
pub struct PlayerRepository {
    mongo: MongoManager,
}

impl PlayerRepository {
    pub fn new(mongo: MongoManager) -> Self {
        Self { mongo }
    }

    fn collection(&self) -> Collection<PlayerEntity> {
        self.mongo
            .database()
            .collection::<PlayerEntity>(PLAYERS_COLLECTION)
    }

    /// Fetch a registry entry by exact name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<PlayerEntity>, MongoDaoError> {
        self.collection()
            .find_one(doc! {"name": name})
            .await
            .map_err(|source| MongoDaoError::FindPlayer {
                name: name.to_owned(),
                source,
            })
    }

    /// Insert a brand new registry entry.
    pub async fn insert(&self, player: &PlayerEntity) -> Result<(), MongoDaoError> {
        self.collection()
            .insert_one(player)
            .await
            .map_err(|source| MongoDaoError::InsertPlayer {
                name: player.name.clone(),
                source,
            })?;
        Ok(())
    }

    /// Upsert the rating of one player by name, creating the entry when the
    /// name is unknown.
    pub async fn upsert_rating(
        &self,
        name: &str,
        mu: f64,
        sigma: f64,
    ) -> Result<(), MongoDaoError> {
        self.collection()
            .update_one(
                doc! {"name": name},
                doc! {"$set": {"mu": mu, "sigma": sigma}},
            )
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::UpsertPlayer {
                name: name.to_owned(),
                source,
            })?;
        Ok(())
    }

    /// List registry entries, optionally restricted to an exact-name set.
    pub async fn list(&self, names: Option<&[String]>) -> Result<Vec<PlayerEntity>, MongoDaoError> {
        let filter = match names {
            Some(names) => doc! {"name": {"$in": names.to_vec()}},
            None => Document::new(),
        };

        self.collection()
            .find(filter)
            .await
            .map_err(|source| MongoDaoError::ListPlayers { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListPlayers { source })
    }
}
