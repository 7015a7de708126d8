use mongodb::{Collection, bson::doc};

use crate::dao::{
    models::MigrationMarkerEntity,
    mongodb::{MIGRATIONS_COLLECTION, MongoDaoError, MongoManager},
};

/// Data Access Object for migration markers, one document per applied
/// migration.
#[derive(Clone)]
pub struct MigrationRepository {
    mongo: MongoManager,
}

impl MigrationRepository {
    pub fn new(mongo: MongoManager) -> Self {
        Self { mongo }
    }

    fn collection(&self) -> Collection<MigrationMarkerEntity> {
        self.mongo
            .database()
            .collection::<MigrationMarkerEntity>(MIGRATIONS_COLLECTION)
    }

    /// Whether the named migration already ran.
    pub async fn marker_exists(&self, name: &str) -> Result<bool, MongoDaoError> {
        let marker = self
            .collection()
            .find_one(doc! {"name": name})
            .await
            .map_err(|source| MongoDaoError::FindMigrationMarker {
                name: name.to_owned(),
                source,
            })?;
        Ok(marker.is_some())
    }

    /// Record that the named migration ran.
    pub async fn record(&self, marker: &MigrationMarkerEntity) -> Result<(), MongoDaoError> {
        self.collection()
            .insert_one(marker)
            .await
            .map_err(|source| MongoDaoError::RecordMigrationMarker {
                name: marker.name.clone(),
                source,
            })?;
        Ok(())
    }
}
