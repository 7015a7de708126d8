use std::time::SystemTime;

use mongodb::bson::{DateTime, oid::ObjectId};
use tracing::info;

use crate::{
    dao::{
        game_day::GameDayRepository,
        migration::MigrationRepository,
        models::{CourtEntity, GameDayEntity, MigrationMarkerEntity},
        player::PlayerRepository,
    },
    dto::{
        common::teams_to_entities,
        migration::{CourtSeed, GameDaySeed, SeedData},
    },
    error::ServiceError,
    services::join_code,
    state::SharedState,
};

/// Marker name of the one-shot import of locally accumulated client data.
pub const TO_DATABASE: &str = "to-database";

/// Outcome of running a migration.
#[derive(Debug, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The migration ran and its marker was recorded.
    Applied,
    /// The marker already existed; the payload was ignored.
    Skipped,
}

/// Import player ratings and historical game days a client kept in local
/// storage before the backend existed. The marker makes reruns no-ops, so
/// clients may retry the call freely.
pub async fn seed_to_database(
    state: &SharedState,
    data: SeedData,
) -> Result<MigrationOutcome, ServiceError> {
    let markers = MigrationRepository::new(state.mongo());
    if markers.marker_exists(TO_DATABASE).await? {
        return Ok(MigrationOutcome::Skipped);
    }

    let player_count = data.players.len();
    let game_day_count = data.game_days.len();

    let players = PlayerRepository::new(state.mongo());
    for entry in &data.players {
        players
            .upsert_rating(&entry.name, entry.mu, entry.sigma)
            .await?;
    }

    let game_days = GameDayRepository::new(state.mongo());
    for seed in data.game_days {
        let entity = import_game_day(seed)?;
        game_days.insert(&entity).await?;
    }

    markers
        .record(&MigrationMarkerEntity {
            id: ObjectId::new(),
            name: TO_DATABASE.to_string(),
            applied_at: DateTime::from_system_time(SystemTime::now()),
        })
        .await?;
    info!(
        players = player_count,
        game_days = game_day_count,
        "applied migration {TO_DATABASE}"
    );

    Ok(MigrationOutcome::Applied)
}

/// Rebuild a historical game day under fresh ids. The join code expires at
/// the moment the day was played, so imported entries are never joinable.
fn import_game_day(seed: GameDaySeed) -> Result<GameDayEntity, ServiceError> {
    let played_on = seed.played_on_time().map_err(|err| {
        ServiceError::InvalidInput(format!("unparseable playedOn in seed data: {err}"))
    })?;
    let played_on = DateTime::from_system_time(played_on);

    Ok(GameDayEntity {
        id: ObjectId::new(),
        players: seed.players.into_iter().map(Into::into).collect(),
        is_live: seed.is_live,
        auto_switch_teams_points: seed.auto_switch_teams_points,
        max_points: seed.max_points,
        players_per_team: seed.players_per_team,
        played_on,
        join_code: join_code::generate(),
        join_code_expiration: played_on,
        players_to_next_game: seed
            .players_to_next_game
            .into_iter()
            .map(Into::into)
            .collect(),
        extra_courts: seed.courts.into_iter().map(import_court).collect(),
    })
}

fn import_court(seed: CourtSeed) -> CourtEntity {
    CourtEntity {
        id: ObjectId::new(),
        max_points: seed.max_points,
        matches: seed.matches,
        players_per_team: seed.players_per_team,
        playing_teams: teams_to_entities(seed.playing_teams),
        auto_switch_teams_points: seed.auto_switch_teams_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> GameDaySeed {
        serde_json::from_value(serde_json::json!({
            "autoSwitchTeamsPoints": 3,
            "maxPoints": 12,
            "playersPerTeam": "4",
            "playedOn": "2025-11-02T14:00:00Z",
            "courts": [
                {
                    "maxPoints": 15,
                    "matches": 7,
                    "playersPerTeam": "5",
                    "autoSwitchTeamsPoints": 2,
                },
            ],
        }))
        .unwrap()
    }

    #[test]
    fn imported_game_days_are_never_joinable() {
        let entity = import_game_day(seed()).unwrap();

        assert_eq!(entity.join_code.len(), 4);
        assert_eq!(entity.join_code_expiration, entity.played_on);
        assert!(!entity.is_live);
    }

    #[test]
    fn import_mints_fresh_ids_but_keeps_court_history() {
        let first = import_game_day(seed()).unwrap();
        let second = import_game_day(seed()).unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(first.extra_courts[0].id, second.extra_courts[0].id);
        assert_eq!(first.extra_courts[0].matches, 7);
        assert_eq!(first.extra_courts[0].players_per_team, "5");
    }

    #[test]
    fn import_rejects_unparseable_dates() {
        let mut seed = seed();
        seed.played_on = "last sunday".into();

        match import_game_day(seed) {
            Err(ServiceError::InvalidInput(_)) => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
