use std::time::SystemTime;

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::{common::GameDayPlayerDto, parse_rfc3339, player::PlayerUpsertRequest};

/// Seed payload accepted by the one-shot import migration: data a client
/// accumulated locally before the backend existed.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    #[validate(nested)]
    pub players: Vec<PlayerUpsertRequest>,
    #[serde(default)]
    pub game_days: Vec<GameDaySeed>,
}

/// Historical game day carried in the seed payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameDaySeed {
    #[serde(default)]
    pub players: Vec<GameDayPlayerDto>,
    /// Historical entries default to finished.
    #[serde(default)]
    pub is_live: bool,
    pub auto_switch_teams_points: i32,
    pub max_points: i32,
    pub players_per_team: String,
    /// Date of the game day, RFC 3339 formatted.
    pub played_on: String,
    #[serde(default)]
    pub players_to_next_game: Vec<GameDayPlayerDto>,
    #[serde(default)]
    pub courts: Vec<CourtSeed>,
}

impl GameDaySeed {
    /// Parse the `playedOn` wire field.
    pub fn played_on_time(&self) -> Result<SystemTime, time::error::Parse> {
        parse_rfc3339(&self.played_on)
    }
}

/// Court carried in a historical game day; ids are minted on import.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourtSeed {
    pub max_points: i32,
    #[serde(default)]
    pub matches: i32,
    pub players_per_team: String,
    #[serde(default)]
    pub playing_teams: Vec<Vec<GameDayPlayerDto>>,
    pub auto_switch_teams_points: i32,
}
