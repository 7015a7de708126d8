pub mod channels;
pub mod sessions;

use std::sync::Arc;

use crate::{config::AppConfig, dao::mongodb::MongoManager};

use self::{channels::GameDayChannels, sessions::SessionRegistry};

pub type SharedState = Arc<AppState>;

/// Central application state storing shared registries and the database
/// handle.
pub struct AppState {
    config: AppConfig,
    mongo: MongoManager,
    sessions: SessionRegistry,
    channels: GameDayChannels,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig, mongo: MongoManager) -> SharedState {
        Arc::new(Self {
            config,
            mongo,
            sessions: SessionRegistry::new(),
            channels: GameDayChannels::new(),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Clone the MongoDB manager handle for repository construction.
    pub fn mongo(&self) -> MongoManager {
        self.mongo.clone()
    }

    /// Registry of session-token bindings.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Per-game-day realtime broadcast topics.
    pub fn channels(&self) -> &GameDayChannels {
        &self.channels
    }
}
