use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::dto::ws::GameDayEvent;

/// Capacity of each per-game-day broadcast channel. Slow subscribers lag and
/// skip events rather than block publishers.
const CHANNEL_CAPACITY: usize = 16;

/// Lazily created broadcast topics, one per game day, feeding realtime
/// subscribers.
#[derive(Default)]
pub struct GameDayChannels {
    topics: DashMap<String, broadcast::Sender<GameDayEvent>>,
}

impl GameDayChannels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the topic of a game day, creating it on first use.
    pub fn subscribe(&self, game_day_id: &str) -> broadcast::Receiver<GameDayEvent> {
        self.topics
            .entry(game_day_id.to_owned())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish an event to every subscriber of a game day. A missing topic
    /// means nobody listens; the event is dropped.
    pub fn broadcast(&self, game_day_id: &str, event: GameDayEvent) {
        if let Some(sender) = self.topics.get(game_day_id) {
            let _ = sender.send(event);
        }
    }

    /// Drop the topic of a game day once its last subscriber is gone.
    pub fn release(&self, game_day_id: &str) {
        self.topics
            .remove_if(game_day_id, |_, sender| sender.receiver_count() == 0);
    }

    #[cfg(test)]
    fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let channels = GameDayChannels::new();
        let mut receiver = channels.subscribe("day-1");

        channels.broadcast("day-1", GameDayEvent::Updated);

        let event = receiver.recv().await.unwrap();
        assert!(matches!(event, GameDayEvent::Updated));
    }

    #[tokio::test]
    async fn topics_are_isolated_per_game_day() {
        let channels = GameDayChannels::new();
        let mut first = channels.subscribe("day-1");
        let mut second = channels.subscribe("day-2");

        channels.broadcast("day-2", GameDayEvent::Transferred);

        assert!(matches!(
            second.recv().await,
            Ok(GameDayEvent::Transferred)
        ));
        assert!(matches!(
            first.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn broadcast_without_topic_is_a_noop() {
        let channels = GameDayChannels::new();
        channels.broadcast("nobody", GameDayEvent::Updated);
        assert_eq!(channels.topic_count(), 0);
    }

    #[test]
    fn release_drops_only_abandoned_topics() {
        let channels = GameDayChannels::new();
        let receiver = channels.subscribe("day-1");
        channels.subscribe("day-2");

        // day-2's receiver is already gone; day-1 is still listening.
        channels.release("day-1");
        channels.release("day-2");
        assert_eq!(channels.topic_count(), 1);

        drop(receiver);
        channels.release("day-1");
        assert_eq!(channels.topic_count(), 0);
    }
}
