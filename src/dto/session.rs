use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{GameDayEntity, SessionPatch},
    dto::{
        common::{GameDayPlayerDto, RatedPlayerDto, teams_to_dtos, teams_to_entities},
        format_system_time,
    },
};

/// Court-centric projection of a game day served to a bound session.
///
/// Court settings shadow the game day defaults: `maxPoints`,
/// `playersPerTeam`, `autoSwitchTeamsPoints`, `matches` and `playingTeams`
/// all describe the bound court, while roster and schedule fields describe
/// the game day as a whole.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub court_id: String,
    pub players: Vec<RatedPlayerDto>,
    pub is_live: bool,
    pub played_on: String,
    pub join_code: String,
    pub join_code_expiration: String,
    pub players_to_next_game: Vec<GameDayPlayerDto>,
    pub max_points: i32,
    pub players_per_team: String,
    pub auto_switch_teams_points: i32,
    pub matches: i32,
    pub playing_teams: Vec<Vec<GameDayPlayerDto>>,
    /// Teams currently playing on every other court of the game day.
    pub other_playing_teams: Vec<Vec<GameDayPlayerDto>>,
    /// Highest completed-match counter across all courts.
    pub last_match: i32,
}

impl SessionView {
    /// Build the view of `game_day` as seen from the court `court_id`.
    ///
    /// Returns `None` when the game day no longer embeds that court.
    pub fn compose(
        game_day: &GameDayEntity,
        court_id: ObjectId,
        players: Vec<RatedPlayerDto>,
    ) -> Option<Self> {
        let court = game_day
            .extra_courts
            .iter()
            .find(|court| court.id == court_id)?;

        let other_playing_teams = game_day
            .extra_courts
            .iter()
            .filter(|other| other.id != court_id)
            .flat_map(|other| other.playing_teams.clone())
            .map(|team| team.into_iter().map(Into::into).collect())
            .collect();

        let last_match = game_day
            .extra_courts
            .iter()
            .map(|court| court.matches)
            .max()
            .unwrap_or(0);

        Some(Self {
            id: game_day.id.to_hex(),
            court_id: court.id.to_hex(),
            players,
            is_live: game_day.is_live,
            played_on: format_system_time(game_day.played_on.to_system_time()),
            join_code: game_day.join_code.clone(),
            join_code_expiration: format_system_time(
                game_day.join_code_expiration.to_system_time(),
            ),
            players_to_next_game: game_day
                .players_to_next_game
                .iter()
                .cloned()
                .map(Into::into)
                .collect(),
            max_points: court.max_points,
            players_per_team: court.players_per_team.clone(),
            auto_switch_teams_points: court.auto_switch_teams_points,
            matches: court.matches,
            playing_teams: teams_to_dtos(court.playing_teams.clone()),
            other_playing_teams,
            last_match,
        })
    }
}

/// Partial update sent by a bound session.
///
/// Absent fields are left untouched; court-level fields only affect the
/// bound court.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    #[serde(default)]
    #[validate(nested)]
    pub players: Option<Vec<GameDayPlayerDto>>,
    #[serde(default)]
    pub is_live: Option<bool>,
    #[serde(default)]
    pub auto_switch_teams_points: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_points: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub players_per_team: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub matches: Option<i32>,
    #[serde(default)]
    pub playing_teams: Option<Vec<Vec<GameDayPlayerDto>>>,
    #[serde(default)]
    pub players_to_next_game: Option<Vec<GameDayPlayerDto>>,
}

impl From<UpdateSessionRequest> for SessionPatch {
    fn from(request: UpdateSessionRequest) -> Self {
        Self {
            players: request
                .players
                .map(|players| players.into_iter().map(Into::into).collect()),
            is_live: request.is_live,
            auto_switch_teams_points: request.auto_switch_teams_points,
            max_points: request.max_points,
            players_per_team: request.players_per_team,
            matches: request.matches,
            playing_teams: request.playing_teams.map(teams_to_entities),
            players_to_next_game: request
                .players_to_next_game
                .map(|queue| queue.into_iter().map(Into::into).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::DateTime;

    use super::*;
    use crate::dao::models::{CourtEntity, GameDayPlayerEntity};

    fn member(name: &str) -> GameDayPlayerEntity {
        GameDayPlayerEntity {
            name: name.to_owned(),
            matches: 1,
            victories: 1,
            defeats: 0,
            last_played_match: 1,
            playing: true,
            order: 0,
        }
    }

    fn court(max_points: i32, matches: i32, teams: Vec<Vec<GameDayPlayerEntity>>) -> CourtEntity {
        CourtEntity {
            id: ObjectId::new(),
            max_points,
            matches,
            players_per_team: "2".to_owned(),
            playing_teams: teams,
            auto_switch_teams_points: 2,
        }
    }

    fn game_day(courts: Vec<CourtEntity>) -> GameDayEntity {
        GameDayEntity {
            id: ObjectId::new(),
            players: vec![member("Ana"), member("Bia")],
            is_live: true,
            auto_switch_teams_points: 9,
            max_points: 99,
            players_per_team: "9".to_owned(),
            played_on: DateTime::from_millis(1_700_000_000_000),
            join_code: "AB12".to_owned(),
            join_code_expiration: DateTime::from_millis(1_700_086_400_000),
            players_to_next_game: vec![member("Caio")],
            extra_courts: courts,
        }
    }

    #[test]
    fn court_settings_shadow_game_day_defaults() {
        let main = court(12, 4, vec![vec![member("Ana")]]);
        let court_id = main.id;
        let day = game_day(vec![main]);

        let view = SessionView::compose(&day, court_id, vec![]).unwrap();
        assert_eq!(view.max_points, 12);
        assert_eq!(view.matches, 4);
        assert_eq!(view.players_per_team, "2");
        assert_eq!(view.auto_switch_teams_points, 2);
        assert_eq!(view.court_id, court_id.to_hex());
        // Game day level fields stay untouched by the court.
        assert!(view.is_live);
        assert_eq!(view.join_code, "AB12");
        assert_eq!(view.players_to_next_game.len(), 1);
    }

    #[test]
    fn other_playing_teams_gather_all_courts_but_the_bound_one() {
        let bound = court(10, 1, vec![vec![member("Ana")]]);
        let second = court(10, 2, vec![vec![member("Bia")], vec![member("Caio")]]);
        let third = court(10, 3, vec![vec![member("Duda")]]);
        let bound_id = bound.id;
        let day = game_day(vec![bound, second, third]);

        let view = SessionView::compose(&day, bound_id, vec![]).unwrap();
        assert_eq!(view.playing_teams.len(), 1);
        assert_eq!(view.other_playing_teams.len(), 3);
        let names: Vec<&str> = view
            .other_playing_teams
            .iter()
            .flat_map(|team| team.iter().map(|player| player.name.as_str()))
            .collect();
        assert_eq!(names, vec!["Bia", "Caio", "Duda"]);
    }

    #[test]
    fn last_match_is_the_maximum_across_all_courts() {
        let bound = court(10, 1, vec![]);
        let busiest = court(10, 8, vec![]);
        let bound_id = bound.id;
        let day = game_day(vec![bound, busiest]);

        let view = SessionView::compose(&day, bound_id, vec![]).unwrap();
        assert_eq!(view.matches, 1);
        assert_eq!(view.last_match, 8);
    }

    #[test]
    fn compose_fails_when_the_court_vanished() {
        let day = game_day(vec![court(10, 0, vec![])]);
        assert!(SessionView::compose(&day, ObjectId::new(), vec![]).is_none());
    }

    #[test]
    fn patch_conversion_keeps_absent_fields_absent() {
        let request = UpdateSessionRequest {
            matches: Some(5),
            ..UpdateSessionRequest::default()
        };

        let patch = SessionPatch::from(request);
        assert_eq!(patch.matches, Some(5));
        assert!(patch.players.is_none());
        assert!(patch.playing_teams.is_none());
        assert!(patch.is_live.is_none());
    }

    #[test]
    fn patch_validation_rejects_negative_match_counters() {
        let request = UpdateSessionRequest {
            matches: Some(-1),
            ..UpdateSessionRequest::default()
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("matches"));
    }
}
