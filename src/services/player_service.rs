use mongodb::bson::oid::ObjectId;

use crate::{
    dao::{models::PlayerEntity, player::PlayerRepository},
    dto::player::{ListPlayersQuery, PlayerUpsertRequest, PlayerView},
    error::ServiceError,
    state::SharedState,
};

/// Outcome of a single registry upsert.
#[derive(Debug)]
pub enum PlayerUpsertOutcome {
    /// The name was already registered; nothing changed.
    Existing,
    /// A new entry was created under this id.
    Created {
        /// Hex id of the new registry entry.
        id: String,
    },
}

/// Register a player unless the name is already taken. Existing entries are
/// left untouched, ratings included.
pub async fn upsert(
    state: &SharedState,
    request: PlayerUpsertRequest,
) -> Result<PlayerUpsertOutcome, ServiceError> {
    let repository = PlayerRepository::new(state.mongo());

    let existing = repository.find_by_name(&request.name).await?;
    let Some(entity) = fresh_entry(existing, request) else {
        return Ok(PlayerUpsertOutcome::Existing);
    };
    repository.insert(&entity).await?;

    Ok(PlayerUpsertOutcome::Created {
        id: entity.id.to_hex(),
    })
}

/// Decide what a single upsert does to the registry: a taken name yields
/// `None` (the stored entry wins, ratings included), a free one the entry
/// to insert.
fn fresh_entry(
    existing: Option<PlayerEntity>,
    request: PlayerUpsertRequest,
) -> Option<PlayerEntity> {
    if existing.is_some() {
        return None;
    }
    Some(PlayerEntity {
        id: ObjectId::new(),
        name: request.name,
        mu: request.mu,
        sigma: request.sigma,
    })
}

/// Overwrite the ratings of a whole batch of players, creating missing
/// entries. Entries are applied in order; the first storage failure stops
/// the batch.
pub async fn bulk_upsert(
    state: &SharedState,
    entries: Vec<PlayerUpsertRequest>,
) -> Result<(), ServiceError> {
    let repository = PlayerRepository::new(state.mongo());
    for entry in entries {
        repository
            .upsert_rating(&entry.name, entry.mu, entry.sigma)
            .await?;
    }
    Ok(())
}

/// List registry entries, optionally restricted by the exact-name filter.
pub async fn list(
    state: &SharedState,
    query: &ListPlayersQuery,
) -> Result<Vec<PlayerView>, ServiceError> {
    let repository = PlayerRepository::new(state.mongo());
    let names = query.names();
    let players = repository.list(names.as_deref()).await?;
    Ok(players.into_iter().map(Into::into).collect())
}
