use std::collections::{HashMap, hash_map::Entry};

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};
use tracing::{debug, info, warn};

use crate::{
    dto::ws::{ChannelCommand, GameDayEvent},
    state::SharedState,
};

/// Handle the full lifecycle of one realtime client connection. Clients join
/// and leave game day channels over the socket and receive every event
/// broadcast on the channels they joined.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound events flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    info!("realtime client connected");

    // One forwarder task per joined game day.
    let mut subscriptions: HashMap<String, JoinHandle<()>> = HashMap::new();

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<ChannelCommand>(&text) {
                Ok(ChannelCommand::Join { game_day_id }) => match subscriptions.entry(game_day_id)
                {
                    Entry::Occupied(entry) => {
                        debug!(game_day_id = %entry.key(), "duplicate join ignored");
                    }
                    Entry::Vacant(entry) => {
                        info!(game_day_id = %entry.key(), "client joined game day channel");
                        let task = spawn_event_forwarder(
                            &state,
                            entry.key().clone(),
                            outbound_tx.clone(),
                        );
                        entry.insert(task);
                    }
                },
                Ok(ChannelCommand::Leave { game_day_id }) => {
                    match subscriptions.remove(&game_day_id) {
                        Some(task) => {
                            stop_forwarder(task).await;
                            state.channels().release(&game_day_id);
                            info!(game_day_id = %game_day_id, "client left game day channel");
                        }
                        None => {
                            debug!(game_day_id = %game_day_id, "leave for a channel never joined");
                        }
                    }
                }
                Ok(ChannelCommand::Unknown) => {
                    warn!(payload = %text, "ignoring unrecognized channel command");
                }
                Err(err) => {
                    warn!(error = %err, "failed to parse channel command");
                }
            },
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(error = %err, "websocket error");
                break;
            }
        }
    }

    for (game_day_id, task) in subscriptions {
        stop_forwarder(task).await;
        state.channels().release(&game_day_id);
    }
    info!("realtime client disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Spawn a task that forwards every event of one game day channel onto the
/// connection's writer channel.
fn spawn_event_forwarder(
    state: &SharedState,
    game_day_id: String,
    outbound_tx: mpsc::UnboundedSender<Message>,
) -> JoinHandle<()> {
    let receiver = state.channels().subscribe(&game_day_id);
    tokio::spawn(async move {
        let mut events = BroadcastStream::new(receiver);
        while let Some(event) = events.next().await {
            match event {
                Ok(event) => {
                    if !forward_event(&outbound_tx, &event) {
                        break;
                    }
                }
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(game_day_id = %game_day_id, skipped, "event stream lagged, resuming");
                }
            }
        }
    })
}

/// Stop a forwarder and wait until its channel receiver is dropped, so a
/// following `release` sees the subscriber count without it.
async fn stop_forwarder(task: JoinHandle<()>) {
    task.abort();
    let _ = task.await;
}

/// Push one event onto the writer channel. Returns `false` once the writer
/// side is gone and the forwarder should stop.
fn forward_event(tx: &mpsc::UnboundedSender<Message>, event: &GameDayEvent) -> bool {
    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "failed to serialize game day event");
            return true;
        }
    };
    tx.send(Message::Text(payload.into())).is_ok()
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarding_stops_once_the_writer_is_gone() {
        let (tx, mut rx) = mpsc::unbounded_channel();

        assert!(forward_event(&tx, &GameDayEvent::Updated));
        match rx.try_recv() {
            Ok(Message::Text(payload)) => assert!(payload.contains("game-day:updated")),
            other => panic!("unexpected message: {other:?}"),
        }

        drop(rx);
        assert!(!forward_event(&tx, &GameDayEvent::Updated));
    }
}
