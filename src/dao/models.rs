use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Registry entry carrying a player's skill rating, keyed by unique name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEntity {
    /// Primary key of the registry entry.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Unique player name, also the join key against game day rosters.
    pub name: String,
    /// Skill rating mean.
    pub mu: f64,
    /// Skill rating standard deviation.
    pub sigma: f64,
}

/// Per-game-day statistics for one roster member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameDayPlayerEntity {
    /// Player name, matching the registry when the player is known there.
    pub name: String,
    /// Matches played so far on this game day.
    pub matches: i32,
    /// Matches won so far on this game day.
    pub victories: i32,
    /// Matches lost so far on this game day.
    pub defeats: i32,
    /// Index of the last match this player took part in.
    pub last_played_match: i32,
    /// Whether the player is currently on a court.
    pub playing: bool,
    /// Rotation order within the game day.
    pub order: i32,
}

/// One court embedded in a game day document.
///
/// The first element of `extraCourts` is the main court created together with
/// the game day; every join appends another one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CourtEntity {
    /// Identifier of the court inside its game day.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Points needed to win a match on this court.
    pub max_points: i32,
    /// Matches completed on this court.
    pub matches: i32,
    /// Team size setting, kept as entered (e.g. `"4"`).
    pub players_per_team: String,
    /// Teams currently on this court.
    pub playing_teams: Vec<Vec<GameDayPlayerEntity>>,
    /// Score difference that triggers an automatic team switch.
    pub auto_switch_teams_points: i32,
}

/// Aggregate game day document with its embedded courts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameDayEntity {
    /// Primary key of the game day.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Roster shared by every court of the game day.
    #[serde(default)]
    pub players: Vec<GameDayPlayerEntity>,
    /// Whether the game day is still running and joinable.
    #[serde(default)]
    pub is_live: bool,
    /// Default score difference that triggers an automatic team switch.
    pub auto_switch_teams_points: i32,
    /// Default points needed to win a match.
    pub max_points: i32,
    /// Default team size setting.
    pub players_per_team: String,
    /// Date the game day takes place.
    pub played_on: DateTime,
    /// Short uppercase-hex code other organizers use to join.
    pub join_code: String,
    /// Instant after which the join code stops matching lookups.
    pub join_code_expiration: DateTime,
    /// Players queued for the next match.
    #[serde(default)]
    pub players_to_next_game: Vec<GameDayPlayerEntity>,
    /// Courts of this game day; index 0 is the main court.
    #[serde(default)]
    pub extra_courts: Vec<CourtEntity>,
}

/// Partial update targeting one bound court and its game day.
///
/// `None` fields are left untouched by the update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    /// Replacement roster for the whole game day.
    pub players: Option<Vec<GameDayPlayerEntity>>,
    /// New liveness flag for the whole game day.
    pub is_live: Option<bool>,
    /// New auto-switch threshold for the bound court.
    pub auto_switch_teams_points: Option<i32>,
    /// New winning score for the bound court.
    pub max_points: Option<i32>,
    /// New team size setting for the bound court.
    pub players_per_team: Option<String>,
    /// New completed-match counter for the bound court.
    pub matches: Option<i32>,
    /// Replacement teams for the bound court.
    pub playing_teams: Option<Vec<Vec<GameDayPlayerEntity>>>,
    /// Replacement next-match queue for the whole game day.
    pub players_to_next_game: Option<Vec<GameDayPlayerEntity>>,
}

impl SessionPatch {
    /// Whether the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Marker persisted once per applied migration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MigrationMarkerEntity {
    /// Primary key of the marker.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Migration name, matching the endpoint that applied it.
    pub name: String,
    /// When the migration ran.
    pub applied_at: DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_player() -> GameDayPlayerEntity {
        GameDayPlayerEntity {
            name: "Ana".to_owned(),
            matches: 3,
            victories: 2,
            defeats: 1,
            last_played_match: 3,
            playing: true,
            order: 0,
        }
    }

    #[test]
    fn game_day_serializes_with_wire_field_names() {
        let entity = GameDayEntity {
            id: ObjectId::new(),
            players: vec![sample_player()],
            is_live: true,
            auto_switch_teams_points: 3,
            max_points: 12,
            players_per_team: "4".to_owned(),
            played_on: DateTime::from_millis(1_700_000_000_000),
            join_code: "A1B2".to_owned(),
            join_code_expiration: DateTime::from_millis(1_700_086_400_000),
            players_to_next_game: vec![],
            extra_courts: vec![],
        };

        let value = serde_json::to_value(&entity).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "_id",
            "players",
            "isLive",
            "autoSwitchTeamsPoints",
            "maxPoints",
            "playersPerTeam",
            "playedOn",
            "joinCode",
            "joinCodeExpiration",
            "playersToNextGame",
            "extraCourts",
        ] {
            assert!(object.contains_key(key), "missing key `{key}`");
        }

        let player = value["players"][0].as_object().unwrap();
        assert!(player.contains_key("lastPlayedMatch"));
        assert!(player.contains_key("playing"));
        assert!(player.contains_key("order"));
    }

    #[test]
    fn game_day_tolerates_documents_without_courts() {
        let entity = GameDayEntity {
            id: ObjectId::new(),
            players: vec![sample_player()],
            is_live: true,
            auto_switch_teams_points: 2,
            max_points: 10,
            players_per_team: "5".to_owned(),
            played_on: DateTime::from_millis(1_700_000_000_000),
            join_code: "00FF".to_owned(),
            join_code_expiration: DateTime::from_millis(1_700_086_400_000),
            players_to_next_game: vec![sample_player()],
            extra_courts: vec![],
        };

        let mut value = serde_json::to_value(&entity).unwrap();
        let object = value.as_object_mut().unwrap();
        for legacy_gap in ["players", "isLive", "playersToNextGame", "extraCourts"] {
            object.remove(legacy_gap);
        }

        let reloaded: GameDayEntity = serde_json::from_value(value).unwrap();
        assert!(reloaded.players.is_empty());
        assert!(reloaded.extra_courts.is_empty());
        assert!(reloaded.players_to_next_game.is_empty());
        assert!(!reloaded.is_live);
    }
}
