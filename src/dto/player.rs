use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::PlayerEntity;

/// Registry entry sent by clients, both for single and bulk upserts.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PlayerUpsertRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub mu: f64,
    pub sigma: f64,
}

/// Response returned when a single upsert actually created the entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedPlayer {
    pub id: String,
}

/// Registry entry as served to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerView {
    pub id: String,
    pub name: String,
    pub mu: f64,
    pub sigma: f64,
}

impl From<PlayerEntity> for PlayerView {
    fn from(entity: PlayerEntity) -> Self {
        Self {
            id: entity.id.to_hex(),
            name: entity.name,
            mu: entity.mu,
            sigma: entity.sigma,
        }
    }
}

/// Query string accepted by the registry listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListPlayersQuery {
    /// Comma-separated exact names; absent means the whole registry.
    pub name: Option<String>,
}

impl ListPlayersQuery {
    /// Split the filter into exact names. Names are matched verbatim, no
    /// trimming.
    pub fn names(&self) -> Option<Vec<String>> {
        self.name
            .as_ref()
            .map(|raw| raw.split(',').map(str::to_owned).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_filter_splits_on_commas_without_trimming() {
        let query = ListPlayersQuery {
            name: Some("Ana,Bia, Caio".to_owned()),
        };
        assert_eq!(
            query.names(),
            Some(vec![
                "Ana".to_owned(),
                "Bia".to_owned(),
                " Caio".to_owned()
            ])
        );
    }

    #[test]
    fn absent_filter_means_whole_registry() {
        assert_eq!(ListPlayersQuery::default().names(), None);
    }

    #[test]
    fn empty_filter_matches_nothing_rather_than_everything() {
        let query = ListPlayersQuery {
            name: Some(String::new()),
        };
        assert_eq!(query.names(), Some(vec![String::new()]));
    }
}
