use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dao::models::{CourtEntity, GameDayPlayerEntity};

/// Roster member statistics as exchanged with clients.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GameDayPlayerDto {
    #[validate(length(min = 1))]
    pub name: String,
    pub matches: i32,
    pub victories: i32,
    pub defeats: i32,
    pub last_played_match: i32,
    pub playing: bool,
    pub order: i32,
}

/// Roster member enriched with the registry rating, as served in session
/// views. The merge is an inner join by name, so every rated player carries
/// rating fields; roster members unknown to the registry are dropped.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatedPlayerDto {
    pub name: String,
    pub matches: i32,
    pub victories: i32,
    pub defeats: i32,
    pub last_played_match: i32,
    pub playing: bool,
    pub order: i32,
    pub mu: f64,
    pub sigma: f64,
}

/// Court projection embedded in game day summaries.
#[derive(Clone, Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourtDto {
    pub id: String,
    pub max_points: i32,
    pub matches: i32,
    pub players_per_team: String,
    pub playing_teams: Vec<Vec<GameDayPlayerDto>>,
    pub auto_switch_teams_points: i32,
}

impl From<GameDayPlayerDto> for GameDayPlayerEntity {
    fn from(dto: GameDayPlayerDto) -> Self {
        Self {
            name: dto.name,
            matches: dto.matches,
            victories: dto.victories,
            defeats: dto.defeats,
            last_played_match: dto.last_played_match,
            playing: dto.playing,
            order: dto.order,
        }
    }
}

impl From<GameDayPlayerEntity> for GameDayPlayerDto {
    fn from(entity: GameDayPlayerEntity) -> Self {
        Self {
            name: entity.name,
            matches: entity.matches,
            victories: entity.victories,
            defeats: entity.defeats,
            last_played_match: entity.last_played_match,
            playing: entity.playing,
            order: entity.order,
        }
    }
}

impl From<CourtEntity> for CourtDto {
    fn from(entity: CourtEntity) -> Self {
        Self {
            id: entity.id.to_hex(),
            max_points: entity.max_points,
            matches: entity.matches,
            players_per_team: entity.players_per_team,
            playing_teams: teams_to_dtos(entity.playing_teams),
            auto_switch_teams_points: entity.auto_switch_teams_points,
        }
    }
}

/// Convert nested team lists from wire shape to entity shape.
pub(crate) fn teams_to_entities(
    teams: Vec<Vec<GameDayPlayerDto>>,
) -> Vec<Vec<GameDayPlayerEntity>> {
    teams
        .into_iter()
        .map(|team| team.into_iter().map(Into::into).collect())
        .collect()
}

/// Convert nested team lists from entity shape to wire shape.
pub(crate) fn teams_to_dtos(teams: Vec<Vec<GameDayPlayerEntity>>) -> Vec<Vec<GameDayPlayerDto>> {
    teams
        .into_iter()
        .map(|team| team.into_iter().map(Into::into).collect())
        .collect()
}
