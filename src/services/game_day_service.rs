use std::time::{Duration, SystemTime};

use mongodb::bson::{DateTime, oid::ObjectId};
use tracing::debug;

use crate::{
    dao::{
        game_day::GameDayRepository,
        models::{CourtEntity, GameDayEntity, GameDayPlayerEntity, PlayerEntity, SessionPatch},
        player::PlayerRepository,
    },
    dto::{
        common::{RatedPlayerDto, teams_to_entities},
        game_day::{CreateGameDayRequest, CreatedGameDay, GameDaySummary},
        session::{SessionView, UpdateSessionRequest},
        ws::GameDayEvent,
    },
    error::ServiceError,
    services::join_code,
    state::{SharedState, sessions::SessionBinding},
};

/// How long a join code stays usable after creation.
const JOIN_CODE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// List every recorded game day, most recent first.
pub async fn list(state: &SharedState) -> Result<Vec<GameDaySummary>, ServiceError> {
    let repository = GameDayRepository::new(state.mongo());
    let game_days = repository.list_recent_first().await?;
    Ok(game_days.into_iter().map(Into::into).collect())
}

/// Open a new game day with its main court and bind the caller to it.
pub async fn create(
    state: &SharedState,
    token: &str,
    request: CreateGameDayRequest,
) -> Result<CreatedGameDay, ServiceError> {
    let played_on = request
        .played_on_time()
        .map_err(|err| ServiceError::InvalidInput(format!("invalid playedOn date: {err}")))?;

    let main_court_id = ObjectId::new();
    let game_day = build_game_day(
        main_court_id,
        request,
        played_on,
        join_code::generate(),
        SystemTime::now(),
    );

    let repository = GameDayRepository::new(state.mongo());
    repository.insert(&game_day).await?;

    state.sessions().bind(
        token,
        SessionBinding {
            game_day_id: game_day.id,
            court_id: main_court_id,
        },
    );

    Ok(CreatedGameDay {
        id: game_day.id.to_hex(),
        court_id: main_court_id.to_hex(),
        join_code: game_day.join_code,
    })
}

/// Recreate a past game day with the same roster and settings, counters
/// reset, and bind the caller to the fresh main court.
pub async fn restart(
    state: &SharedState,
    token: &str,
    id: &str,
) -> Result<CreatedGameDay, ServiceError> {
    let source_id = parse_game_day_id(id)?;
    let repository = GameDayRepository::new(state.mongo());
    let Some(source) = repository.find(source_id).await? else {
        return Err(ServiceError::NotFound(format!("game day `{id}` not found")));
    };

    let main_court_id = ObjectId::new();
    let fresh = renewed_game_day(
        &source,
        main_court_id,
        join_code::generate(),
        SystemTime::now(),
    );
    repository.insert(&fresh).await?;

    state.sessions().bind(
        token,
        SessionBinding {
            game_day_id: fresh.id,
            court_id: main_court_id,
        },
    );

    Ok(CreatedGameDay {
        id: fresh.id.to_hex(),
        court_id: main_court_id.to_hex(),
        join_code: fresh.join_code,
    })
}

/// Join a live game day through its code: append a fresh court, bind the
/// caller to it and notify existing subscribers.
pub async fn join(
    state: &SharedState,
    token: &str,
    code: &str,
) -> Result<SessionView, ServiceError> {
    let repository = GameDayRepository::new(state.mongo());
    let now = DateTime::from_system_time(SystemTime::now());
    let Some(mut game_day) = repository.find_by_active_code(code, now).await? else {
        return Err(ServiceError::NotFound(format!(
            "no game day is joinable with code `{code}`"
        )));
    };

    let court = next_court(&game_day);
    let court_id = court.id;
    if !repository.push_court(game_day.id, &court).await? {
        return Err(ServiceError::NotFound(format!(
            "game day `{}` vanished during join",
            game_day.id.to_hex()
        )));
    }

    state.sessions().bind(
        token,
        SessionBinding {
            game_day_id: game_day.id,
            court_id,
        },
    );

    // Mirror the append locally so the response reflects the new court.
    game_day.extra_courts.push(court);

    let players = rated_roster(state, &game_day).await?;
    state
        .channels()
        .broadcast(&game_day.id.to_hex(), GameDayEvent::Updated);

    SessionView::compose(&game_day, court_id, players)
        .ok_or_else(|| ServiceError::NotFound("court not part of game day".into()))
}

/// Take over the main court of a live game day: rebind the caller to it and
/// tell subscribers the organizer role moved.
pub async fn transfer(
    state: &SharedState,
    token: &str,
    code: &str,
) -> Result<SessionView, ServiceError> {
    let repository = GameDayRepository::new(state.mongo());
    let now = DateTime::from_system_time(SystemTime::now());
    let Some(game_day) = repository.find_by_active_code(code, now).await? else {
        return Err(ServiceError::NotFound(format!(
            "no game day is joinable with code `{code}`"
        )));
    };

    let Some(main_court_id) = game_day.extra_courts.first().map(|court| court.id) else {
        return Err(ServiceError::NotFound(format!(
            "game day `{}` has no main court",
            game_day.id.to_hex()
        )));
    };

    state.sessions().bind(
        token,
        SessionBinding {
            game_day_id: game_day.id,
            court_id: main_court_id,
        },
    );

    let players = rated_roster(state, &game_day).await?;
    state
        .channels()
        .broadcast(&game_day.id.to_hex(), GameDayEvent::Transferred);

    SessionView::compose(&game_day, main_court_id, players)
        .ok_or_else(|| ServiceError::NotFound("court not part of game day".into()))
}

/// Resolve the caller's binding into the current court-centric view.
pub async fn current(
    state: &SharedState,
    token: Option<&str>,
) -> Result<SessionView, ServiceError> {
    let binding = token
        .and_then(|token| state.sessions().get(token))
        .ok_or_else(|| ServiceError::NotFound("no session binding".into()))?;

    let repository = GameDayRepository::new(state.mongo());
    let Some(game_day) = repository.find_live(binding.game_day_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "game day `{}` is not live",
            binding.game_day_id.to_hex()
        )));
    };

    let players = rated_roster(state, &game_day).await?;
    SessionView::compose(&game_day, binding.court_id, players)
        .ok_or_else(|| ServiceError::NotFound("bound court no longer exists".into()))
}

/// Apply a partial update to the caller's bound court and game day.
///
/// A patch flipping `isLive` to `false` ends the game day; every binding
/// attached to it is torn down once the update lands, so participants on
/// other courts lose their session too.
pub async fn update(
    state: &SharedState,
    token: Option<&str>,
    request: UpdateSessionRequest,
) -> Result<(), ServiceError> {
    let token = token.ok_or_else(|| ServiceError::Unauthorized("no session cookie".into()))?;
    let binding = state
        .sessions()
        .get(token)
        .ok_or_else(|| ServiceError::Unauthorized("no session binding".into()))?;

    let patch = SessionPatch::from(request);
    if patch.is_empty() {
        return Ok(());
    }
    let ends_game_day = patch.is_live == Some(false);

    let repository = GameDayRepository::new(state.mongo());
    let matched = repository
        .update_bound_court(binding.game_day_id, binding.court_id, &patch)
        .await?;
    if matched == 0 {
        return Err(ServiceError::NotFound(format!(
            "game day `{}` has no court `{}`",
            binding.game_day_id.to_hex(),
            binding.court_id.to_hex()
        )));
    }

    if ends_game_day {
        let swept = state.sessions().clear_game_day(binding.game_day_id);
        debug!(
            game_day_id = %binding.game_day_id,
            swept, "game day ended, dropped its session bindings"
        );
    }

    state
        .channels()
        .broadcast(&binding.game_day_id.to_hex(), GameDayEvent::Updated);

    Ok(())
}

/// Abandon the bound court: empty its teams and drop the caller's binding.
///
/// The binding goes away even when the court cleanup fails; a broken game
/// day must not keep the client stuck in a session.
pub async fn leave(state: &SharedState, token: Option<&str>) -> Result<(), ServiceError> {
    let token = token.ok_or_else(|| ServiceError::NotFound("no session cookie".into()))?;
    let Some(binding) = state.sessions().get(token) else {
        return Err(ServiceError::NotFound("no session binding".into()));
    };

    let repository = GameDayRepository::new(state.mongo());
    let outcome = repository
        .clear_court_teams(binding.game_day_id, binding.court_id)
        .await;

    state.sessions().clear(token);

    let matched = outcome?;
    if matched == 0 {
        return Err(ServiceError::NotFound(format!(
            "game day `{}` has no court `{}`",
            binding.game_day_id.to_hex(),
            binding.court_id.to_hex()
        )));
    }

    state
        .channels()
        .broadcast(&binding.game_day_id.to_hex(), GameDayEvent::Updated);

    Ok(())
}

/// Load the registry entries for the roster and merge ratings in by name.
async fn rated_roster(
    state: &SharedState,
    game_day: &GameDayEntity,
) -> Result<Vec<RatedPlayerDto>, ServiceError> {
    if game_day.players.is_empty() {
        return Ok(Vec::new());
    }

    let names: Vec<String> = game_day
        .players
        .iter()
        .map(|member| member.name.clone())
        .collect();
    let registry = PlayerRepository::new(state.mongo())
        .list(Some(&names))
        .await?;

    Ok(merge_ratings(&game_day.players, &registry))
}

/// Join roster statistics with registry ratings by exact name. The join is
/// inner: roster members unknown to the registry are dropped silently, in
/// keeping with how clients always consumed this view. Roster order is kept.
fn merge_ratings(
    roster: &[GameDayPlayerEntity],
    registry: &[PlayerEntity],
) -> Vec<RatedPlayerDto> {
    roster
        .iter()
        .filter_map(|member| {
            let rating = registry.iter().find(|entry| entry.name == member.name)?;
            Some(RatedPlayerDto {
                name: member.name.clone(),
                matches: member.matches,
                victories: member.victories,
                defeats: member.defeats,
                last_played_match: member.last_played_match,
                playing: member.playing,
                order: member.order,
                mu: rating.mu,
                sigma: rating.sigma,
            })
        })
        .collect()
}

/// Assemble the game day document for a create request.
fn build_game_day(
    main_court_id: ObjectId,
    request: CreateGameDayRequest,
    played_on: SystemTime,
    join_code: String,
    now: SystemTime,
) -> GameDayEntity {
    let CreateGameDayRequest {
        players,
        is_live,
        auto_switch_teams_points,
        max_points,
        players_per_team,
        playing_teams,
        players_to_next_game,
        ..
    } = request;

    let main_court = CourtEntity {
        id: main_court_id,
        max_points,
        matches: 0,
        players_per_team: players_per_team.clone(),
        playing_teams: teams_to_entities(playing_teams),
        auto_switch_teams_points,
    };

    GameDayEntity {
        id: ObjectId::new(),
        players: players.into_iter().map(Into::into).collect(),
        is_live,
        auto_switch_teams_points,
        max_points,
        players_per_team,
        played_on: DateTime::from_system_time(played_on),
        join_code,
        join_code_expiration: DateTime::from_system_time(now + JOIN_CODE_TTL),
        players_to_next_game: players_to_next_game.into_iter().map(Into::into).collect(),
        extra_courts: vec![main_court],
    }
}

/// Clone a past game day into a fresh live one: same roster and settings,
/// counters back to zero, new identifiers and join code.
fn renewed_game_day(
    source: &GameDayEntity,
    main_court_id: ObjectId,
    join_code: String,
    now: SystemTime,
) -> GameDayEntity {
    GameDayEntity {
        id: ObjectId::new(),
        players: source.players.iter().map(reset_counters).collect(),
        is_live: true,
        auto_switch_teams_points: source.auto_switch_teams_points,
        max_points: source.max_points,
        players_per_team: source.players_per_team.clone(),
        played_on: DateTime::from_system_time(now),
        join_code,
        join_code_expiration: DateTime::from_system_time(now + JOIN_CODE_TTL),
        players_to_next_game: Vec::new(),
        extra_courts: vec![CourtEntity {
            id: main_court_id,
            max_points: source.max_points,
            matches: 0,
            players_per_team: source.players_per_team.clone(),
            playing_teams: Vec::new(),
            auto_switch_teams_points: source.auto_switch_teams_points,
        }],
    }
}

fn reset_counters(member: &GameDayPlayerEntity) -> GameDayPlayerEntity {
    GameDayPlayerEntity {
        name: member.name.clone(),
        matches: 0,
        victories: 0,
        defeats: 0,
        last_played_match: 0,
        playing: member.playing,
        order: member.order,
    }
}

/// Court appended on behalf of a joining organizer: game day defaults, no
/// teams yet, match numbering continued from the busiest court. Counters are
/// client-supplied, so the numbering saturates instead of wrapping.
fn next_court(game_day: &GameDayEntity) -> CourtEntity {
    let last_match = game_day
        .extra_courts
        .iter()
        .map(|court| court.matches)
        .max()
        .unwrap_or(0);

    CourtEntity {
        id: ObjectId::new(),
        max_points: game_day.max_points,
        matches: last_match.saturating_add(1),
        players_per_team: game_day.players_per_team.clone(),
        playing_teams: Vec::new(),
        auto_switch_teams_points: game_day.auto_switch_teams_points,
    }
}

fn parse_game_day_id(id: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse_str(id).map_err(|_| ServiceError::NotFound(format!("game day `{id}` not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::common::GameDayPlayerDto;

    fn roster_member(name: &str, matches: i32, order: i32) -> GameDayPlayerEntity {
        GameDayPlayerEntity {
            name: name.to_owned(),
            matches,
            victories: matches,
            defeats: 0,
            last_played_match: matches,
            playing: true,
            order,
        }
    }

    fn create_request() -> CreateGameDayRequest {
        CreateGameDayRequest {
            players: vec![GameDayPlayerDto {
                name: "Ana".to_owned(),
                matches: 0,
                victories: 0,
                defeats: 0,
                last_played_match: 0,
                playing: false,
                order: 0,
            }],
            is_live: true,
            auto_switch_teams_points: 2,
            max_points: 12,
            players_per_team: "4".to_owned(),
            played_on: "2026-08-22T18:00:00Z".to_owned(),
            playing_teams: vec![],
            players_to_next_game: vec![],
        }
    }

    #[test]
    fn built_game_day_embeds_the_main_court() {
        let main_court_id = ObjectId::new();
        let now = SystemTime::now();
        let game_day = build_game_day(
            main_court_id,
            create_request(),
            now,
            "AB12".to_owned(),
            now,
        );

        assert_eq!(game_day.extra_courts.len(), 1);
        let main = &game_day.extra_courts[0];
        assert_eq!(main.id, main_court_id);
        assert_eq!(main.max_points, 12);
        assert_eq!(main.players_per_team, "4");
        assert_eq!(main.auto_switch_teams_points, 2);
        assert_eq!(main.matches, 0);
        assert!(main.playing_teams.is_empty());

        assert_eq!(game_day.join_code, "AB12");
        assert_eq!(
            game_day.join_code_expiration,
            DateTime::from_system_time(now + JOIN_CODE_TTL)
        );
        assert_eq!(game_day.players.len(), 1);
        assert!(game_day.is_live);
    }

    #[test]
    fn renewal_resets_counters_but_keeps_identity_fields() {
        let source = GameDayEntity {
            id: ObjectId::new(),
            players: vec![roster_member("Ana", 5, 1), roster_member("Bia", 3, 2)],
            is_live: false,
            auto_switch_teams_points: 2,
            max_points: 12,
            players_per_team: "4".to_owned(),
            played_on: DateTime::from_millis(1_600_000_000_000),
            join_code: "OLD1".to_owned(),
            join_code_expiration: DateTime::from_millis(1_600_086_400_000),
            players_to_next_game: vec![roster_member("Caio", 1, 3)],
            extra_courts: vec![CourtEntity {
                id: ObjectId::new(),
                max_points: 12,
                matches: 9,
                players_per_team: "4".to_owned(),
                playing_teams: vec![vec![roster_member("Ana", 5, 1)]],
                auto_switch_teams_points: 2,
            }],
        };

        let now = SystemTime::now();
        let main_court_id = ObjectId::new();
        let fresh = renewed_game_day(&source, main_court_id, "NEW1".to_owned(), now);

        assert_ne!(fresh.id, source.id);
        assert_eq!(fresh.join_code, "NEW1");
        assert!(fresh.is_live);
        assert!(fresh.players_to_next_game.is_empty());

        for member in &fresh.players {
            assert_eq!(member.matches, 0);
            assert_eq!(member.victories, 0);
            assert_eq!(member.defeats, 0);
            assert_eq!(member.last_played_match, 0);
        }
        assert_eq!(fresh.players[0].name, "Ana");
        assert_eq!(fresh.players[0].order, 1);
        assert!(fresh.players[0].playing);

        assert_eq!(fresh.extra_courts.len(), 1);
        let main = &fresh.extra_courts[0];
        assert_eq!(main.id, main_court_id);
        assert_eq!(main.matches, 0);
        assert!(main.playing_teams.is_empty());
    }

    #[test]
    fn next_court_continues_match_numbering_from_the_busiest_court() {
        let game_day = GameDayEntity {
            id: ObjectId::new(),
            players: vec![],
            is_live: true,
            auto_switch_teams_points: 3,
            max_points: 15,
            players_per_team: "5".to_owned(),
            played_on: DateTime::from_millis(1_700_000_000_000),
            join_code: "AB12".to_owned(),
            join_code_expiration: DateTime::from_millis(1_700_086_400_000),
            players_to_next_game: vec![],
            extra_courts: vec![
                CourtEntity {
                    id: ObjectId::new(),
                    max_points: 10,
                    matches: 4,
                    players_per_team: "2".to_owned(),
                    playing_teams: vec![],
                    auto_switch_teams_points: 1,
                },
                CourtEntity {
                    id: ObjectId::new(),
                    max_points: 10,
                    matches: 7,
                    players_per_team: "2".to_owned(),
                    playing_teams: vec![],
                    auto_switch_teams_points: 1,
                },
            ],
        };

        let court = next_court(&game_day);
        assert_eq!(court.matches, 8);
        // Joined courts inherit the game day defaults, not another court's
        // overrides.
        assert_eq!(court.max_points, 15);
        assert_eq!(court.players_per_team, "5");
        assert_eq!(court.auto_switch_teams_points, 3);
        assert!(court.playing_teams.is_empty());
    }

    #[test]
    fn next_court_saturates_when_a_court_stores_the_maximum_counter() {
        let game_day = GameDayEntity {
            id: ObjectId::new(),
            players: vec![],
            is_live: true,
            auto_switch_teams_points: 2,
            max_points: 12,
            players_per_team: "4".to_owned(),
            played_on: DateTime::from_millis(1_700_000_000_000),
            join_code: "AB12".to_owned(),
            join_code_expiration: DateTime::from_millis(1_700_086_400_000),
            players_to_next_game: vec![],
            extra_courts: vec![CourtEntity {
                id: ObjectId::new(),
                max_points: 12,
                matches: i32::MAX,
                players_per_team: "4".to_owned(),
                playing_teams: vec![],
                auto_switch_teams_points: 2,
            }],
        };

        let court = next_court(&game_day);
        assert_eq!(court.matches, i32::MAX);
    }

    #[test]
    fn merge_drops_roster_members_missing_from_the_registry() {
        let roster = vec![
            roster_member("Ana", 2, 1),
            roster_member("Bob", 4, 2),
            roster_member("Caio", 1, 3),
        ];
        let registry = vec![
            PlayerEntity {
                id: ObjectId::new(),
                name: "Caio".to_owned(),
                mu: 22.0,
                sigma: 8.0,
            },
            PlayerEntity {
                id: ObjectId::new(),
                name: "Ana".to_owned(),
                mu: 27.5,
                sigma: 7.2,
            },
        ];

        let merged = merge_ratings(&roster, &registry);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "Ana");
        assert_eq!(merged[0].mu, 27.5);
        assert_eq!(merged[0].sigma, 7.2);
        assert_eq!(merged[0].matches, 2);
        assert_eq!(merged[1].name, "Caio");
        assert_eq!(merged[1].mu, 22.0);
    }

    #[test]
    fn malformed_ids_read_as_missing_game_days() {
        match parse_game_day_id("not-a-hex-id") {
            Err(ServiceError::NotFound(_)) => {}
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
