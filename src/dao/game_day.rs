use futures::TryStreamExt;
use mongodb::{
    Collection,
    bson::{Bson, DateTime, Document, doc, oid::ObjectId},
};

use crate::dao::{
    models::{CourtEntity, GameDayEntity, GameDayPlayerEntity, SessionPatch},
    mongodb::{GAME_DAYS_COLLECTION, MongoDaoError, MongoManager},
};

/// Data Access Object encapsulating MongoDB interaction for game day documents.
#[derive(Clone)]
pub struct GameDayRepository {
    mongo: MongoManager,
}

impl GameDayRepository {
    pub fn new(mongo: MongoManager) -> Self {
        Self { mongo }
    }

    fn collection(&self) -> Collection<GameDayEntity> {
        self.mongo
            .database()
            .collection::<GameDayEntity>(GAME_DAYS_COLLECTION)
    }

    /// Persist a freshly assembled game day document.
    pub async fn insert(&self, game_day: &GameDayEntity) -> Result<(), MongoDaoError> {
        self.collection()
            .insert_one(game_day)
            .await
            .map_err(|source| MongoDaoError::InsertGameDay { source })?;
        Ok(())
    }

    /// Fetch a game day by id regardless of liveness.
    pub async fn find(&self, id: ObjectId) -> Result<Option<GameDayEntity>, MongoDaoError> {
        self.collection()
            .find_one(doc! {"_id": id})
            .await
            .map_err(|source| MongoDaoError::FindGameDay { id, source })
    }

    /// Fetch a game day by id, restricted to live ones.
    pub async fn find_live(&self, id: ObjectId) -> Result<Option<GameDayEntity>, MongoDaoError> {
        self.collection()
            .find_one(doc! {"_id": id, "isLive": true})
            .await
            .map_err(|source| MongoDaoError::FindGameDay { id, source })
    }

    /// Fetch the game day advertising `code`, provided the code has not
    /// expired at `now`. Lookup is exact-match; codes are stored uppercase.
    pub async fn find_by_active_code(
        &self,
        code: &str,
        now: DateTime,
    ) -> Result<Option<GameDayEntity>, MongoDaoError> {
        self.collection()
            .find_one(active_code_filter(code, now))
            .await
            .map_err(|source| MongoDaoError::FindByJoinCode { source })
    }

    /// List every game day, most recent `playedOn` first.
    pub async fn list_recent_first(&self) -> Result<Vec<GameDayEntity>, MongoDaoError> {
        self.collection()
            .find(doc! {})
            .sort(doc! {"playedOn": -1})
            .await
            .map_err(|source| MongoDaoError::ListGameDays { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGameDays { source })
    }

    /// Atomically append a court to a game day. Returns `false` when no
    /// document matched the id.
    pub async fn push_court(
        &self,
        id: ObjectId,
        court: &CourtEntity,
    ) -> Result<bool, MongoDaoError> {
        let result = self
            .collection()
            .update_one(
                doc! {"_id": id},
                doc! {"$push": {"extraCourts": court_to_bson(court)}},
            )
            .await
            .map_err(|source| MongoDaoError::PushCourt { id, source })?;
        Ok(result.matched_count > 0)
    }

    /// Apply a session patch to the game day / court pair in one atomic
    /// update. Returns the number of matched documents (0 or 1); a zero means
    /// the pair no longer exists.
    ///
    /// The patch must carry at least one field; an empty `$set` is not a
    /// valid MongoDB update.
    pub async fn update_bound_court(
        &self,
        id: ObjectId,
        court_id: ObjectId,
        patch: &SessionPatch,
    ) -> Result<u64, MongoDaoError> {
        let fields = session_update_document(patch);
        let result = self
            .collection()
            .update_one(
                doc! {"_id": id, "extraCourts._id": court_id},
                doc! {"$set": fields},
            )
            .await
            .map_err(|source| MongoDaoError::UpdateCourt {
                id,
                court_id,
                source,
            })?;
        Ok(result.matched_count)
    }

    /// Empty the playing teams of one court, leaving the rest of the game day
    /// untouched. Returns the number of matched documents.
    pub async fn clear_court_teams(
        &self,
        id: ObjectId,
        court_id: ObjectId,
    ) -> Result<u64, MongoDaoError> {
        let result = self
            .collection()
            .update_one(
                doc! {"_id": id, "extraCourts._id": court_id},
                doc! {"$set": {"extraCourts.$.playingTeams": []}},
            )
            .await
            .map_err(|source| MongoDaoError::UpdateCourt {
                id,
                court_id,
                source,
            })?;
        Ok(result.matched_count)
    }
}

/// Predicate matching the game day advertising `code` whose join window is
/// still open at `now`.
fn active_code_filter(code: &str, now: DateTime) -> Document {
    doc! {
        "joinCode": code,
        "joinCodeExpiration": {"$gt": now},
    }
}

/// Build the `$set` payload for a session patch. Court-level fields go through
/// the positional operator so only the matched court is touched; roster-level
/// fields address the document root.
pub(crate) fn session_update_document(patch: &SessionPatch) -> Document {
    let mut fields = Document::new();

    if let Some(teams) = &patch.playing_teams {
        fields.insert("extraCourts.$.playingTeams", teams_to_bson(teams));
    }
    if let Some(value) = patch.auto_switch_teams_points {
        fields.insert("extraCourts.$.autoSwitchTeamsPoints", value);
    }
    if let Some(value) = patch.max_points {
        fields.insert("extraCourts.$.maxPoints", value);
    }
    if let Some(value) = &patch.players_per_team {
        fields.insert("extraCourts.$.playersPerTeam", value.as_str());
    }
    if let Some(value) = patch.matches {
        fields.insert("extraCourts.$.matches", value);
    }
    if let Some(players) = &patch.players {
        fields.insert("players", players_to_bson(players));
    }
    if let Some(value) = patch.is_live {
        fields.insert("isLive", value);
    }
    if let Some(queue) = &patch.players_to_next_game {
        fields.insert("playersToNextGame", players_to_bson(queue));
    }

    fields
}

fn player_to_bson(player: &GameDayPlayerEntity) -> Bson {
    Bson::Document(doc! {
        "name": &player.name,
        "matches": player.matches,
        "victories": player.victories,
        "defeats": player.defeats,
        "lastPlayedMatch": player.last_played_match,
        "playing": player.playing,
        "order": player.order,
    })
}

fn players_to_bson(players: &[GameDayPlayerEntity]) -> Bson {
    Bson::Array(players.iter().map(player_to_bson).collect())
}

fn teams_to_bson(teams: &[Vec<GameDayPlayerEntity>]) -> Bson {
    Bson::Array(
        teams
            .iter()
            .map(|team| players_to_bson(team.as_slice()))
            .collect(),
    )
}

pub(crate) fn court_to_bson(court: &CourtEntity) -> Bson {
    Bson::Document(doc! {
        "_id": court.id,
        "maxPoints": court.max_points,
        "matches": court.matches,
        "playersPerTeam": court.players_per_team.as_str(),
        "playingTeams": teams_to_bson(&court.playing_teams),
        "autoSwitchTeamsPoints": court.auto_switch_teams_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued_player(name: &str) -> GameDayPlayerEntity {
        GameDayPlayerEntity {
            name: name.to_owned(),
            matches: 0,
            victories: 0,
            defeats: 0,
            last_played_match: 0,
            playing: false,
            order: 0,
        }
    }

    #[test]
    fn active_code_filter_requires_an_unexpired_code() {
        let now = DateTime::from_millis(1_700_000_000_000);
        let filter = active_code_filter("AB12", now);

        assert_eq!(filter.get_str("joinCode").unwrap(), "AB12");
        let window = filter.get_document("joinCodeExpiration").unwrap();
        assert_eq!(window.get_datetime("$gt").unwrap(), &now);
    }

    #[test]
    fn empty_patch_builds_empty_document() {
        assert!(session_update_document(&SessionPatch::default()).is_empty());
    }

    #[test]
    fn court_fields_use_the_positional_operator() {
        let patch = SessionPatch {
            max_points: Some(15),
            matches: Some(7),
            players_per_team: Some("3".to_owned()),
            auto_switch_teams_points: Some(2),
            playing_teams: Some(vec![vec![queued_player("Ana")]]),
            ..SessionPatch::default()
        };

        let fields = session_update_document(&patch);
        assert_eq!(fields.get_i32("extraCourts.$.maxPoints").unwrap(), 15);
        assert_eq!(fields.get_i32("extraCourts.$.matches").unwrap(), 7);
        assert_eq!(fields.get_str("extraCourts.$.playersPerTeam").unwrap(), "3");
        assert_eq!(
            fields.get_i32("extraCourts.$.autoSwitchTeamsPoints").unwrap(),
            2
        );
        assert!(fields.get_array("extraCourts.$.playingTeams").is_ok());
        assert!(!fields.contains_key("isLive"));
        assert!(!fields.contains_key("players"));
    }

    #[test]
    fn roster_fields_address_the_document_root() {
        let patch = SessionPatch {
            players: Some(vec![queued_player("Bia")]),
            is_live: Some(false),
            players_to_next_game: Some(vec![]),
            ..SessionPatch::default()
        };

        let fields = session_update_document(&patch);
        assert!(!fields.get_bool("isLive").unwrap());
        assert!(fields.get_array("players").is_ok());
        assert!(fields.get_array("playersToNextGame").is_ok());
        assert!(!fields.keys().any(|key| key.starts_with("extraCourts")));
    }

    #[test]
    fn court_bson_carries_wire_field_names() {
        let court = CourtEntity {
            id: ObjectId::new(),
            max_points: 12,
            matches: 0,
            players_per_team: "4".to_owned(),
            playing_teams: vec![vec![queued_player("Ana")], vec![queued_player("Bia")]],
            auto_switch_teams_points: 3,
        };

        let Bson::Document(document) = court_to_bson(&court) else {
            panic!("court must serialize to a document");
        };
        assert_eq!(document.get_object_id("_id").unwrap(), court.id);
        assert_eq!(document.get_i32("maxPoints").unwrap(), 12);
        assert_eq!(document.get_str("playersPerTeam").unwrap(), "4");
        assert_eq!(document.get_array("playingTeams").unwrap().len(), 2);

        let team = document.get_array("playingTeams").unwrap()[0]
            .as_array()
            .unwrap();
        let member = team[0].as_document().unwrap();
        assert_eq!(member.get_str("name").unwrap(), "Ana");
        assert!(member.contains_key("lastPlayedMatch"));
    }
}
