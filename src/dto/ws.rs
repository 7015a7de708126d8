use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
/// Messages accepted from realtime WebSocket clients.
#[serde(tag = "type")]
pub enum ChannelCommand {
    /// Subscribe to the events of one game day.
    #[serde(rename = "join")]
    Join {
        #[serde(rename = "gameDayId")]
        game_day_id: String,
    },
    /// Drop the subscription to one game day.
    #[serde(rename = "leave")]
    Leave {
        #[serde(rename = "gameDayId")]
        game_day_id: String,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
/// Events fanned out to every subscriber of a game day.
#[serde(tag = "type")]
pub enum GameDayEvent {
    /// The game day document changed; subscribers should refetch their view.
    #[serde(rename = "game-day:updated")]
    Updated,
    /// The main court organizer role moved to another client.
    #[serde(rename = "game-day:transferred")]
    Transferred,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_command_parses_game_day_id() {
        let command: ChannelCommand =
            serde_json::from_str(r#"{"type":"join","gameDayId":"64f0aa11bb22cc33dd44ee55"}"#)
                .unwrap();
        match command {
            ChannelCommand::Join { game_day_id } => {
                assert_eq!(game_day_id, "64f0aa11bb22cc33dd44ee55");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_command_types_are_tolerated() {
        let command: ChannelCommand =
            serde_json::from_str(r#"{"type":"subscribe","gameDayId":"x"}"#).unwrap();
        assert!(matches!(command, ChannelCommand::Unknown));
    }

    #[test]
    fn events_serialize_with_their_wire_tag() {
        let payload = serde_json::to_string(&GameDayEvent::Updated).unwrap();
        assert_eq!(payload, r#"{"type":"game-day:updated"}"#);

        let payload = serde_json::to_string(&GameDayEvent::Transferred).unwrap();
        assert_eq!(payload, r#"{"type":"game-day:transferred"}"#);
    }
}
