use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::GameDayEntity,
    dto::{
        common::{CourtDto, GameDayPlayerDto},
        format_system_time, parse_rfc3339,
    },
};

/// Payload used to open a brand-new game day with its main court.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameDayRequest {
    /// Roster of the day; may start empty and grow later through updates.
    #[serde(default)]
    #[validate(nested)]
    pub players: Vec<GameDayPlayerDto>,
    /// Whether the game day starts live. Defaults to `true`.
    #[serde(default = "default_is_live")]
    pub is_live: bool,
    pub auto_switch_teams_points: i32,
    #[validate(range(min = 1))]
    pub max_points: i32,
    #[validate(length(min = 1))]
    pub players_per_team: String,
    /// Date of the game day, RFC 3339 formatted.
    pub played_on: String,
    /// Teams already arranged on the main court.
    #[serde(default)]
    pub playing_teams: Vec<Vec<GameDayPlayerDto>>,
    #[serde(default)]
    pub players_to_next_game: Vec<GameDayPlayerDto>,
}

fn default_is_live() -> bool {
    true
}

impl CreateGameDayRequest {
    /// Parse the `playedOn` wire field.
    pub fn played_on_time(&self) -> Result<SystemTime, time::error::Parse> {
        parse_rfc3339(&self.played_on)
    }
}

/// Response returned once a game day has been created or restarted. The
/// caller is already bound to the returned main court.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedGameDay {
    pub id: String,
    pub court_id: String,
    pub join_code: String,
}

/// Full game day projection returned by the listing endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameDaySummary {
    pub id: String,
    pub players: Vec<GameDayPlayerDto>,
    pub is_live: bool,
    pub auto_switch_teams_points: i32,
    pub max_points: i32,
    pub players_per_team: String,
    pub played_on: String,
    pub join_code: String,
    pub join_code_expiration: String,
    pub players_to_next_game: Vec<GameDayPlayerDto>,
    pub extra_courts: Vec<CourtDto>,
}

impl From<GameDayEntity> for GameDaySummary {
    fn from(entity: GameDayEntity) -> Self {
        Self {
            id: entity.id.to_hex(),
            players: entity.players.into_iter().map(Into::into).collect(),
            is_live: entity.is_live,
            auto_switch_teams_points: entity.auto_switch_teams_points,
            max_points: entity.max_points,
            players_per_team: entity.players_per_team,
            played_on: format_system_time(entity.played_on.to_system_time()),
            join_code: entity.join_code,
            join_code_expiration: format_system_time(entity.join_code_expiration.to_system_time()),
            players_to_next_game: entity
                .players_to_next_game
                .into_iter()
                .map(Into::into)
                .collect(),
            extra_courts: entity.extra_courts.into_iter().map(Into::into).collect(),
        }
    }
}
