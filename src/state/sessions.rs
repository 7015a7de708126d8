use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;
use uuid::Uuid;

/// What a session token resolves to: the game day the client organizes and
/// the court it runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionBinding {
    /// Game day the session belongs to.
    pub game_day_id: ObjectId,
    /// Court within that game day the session operates.
    pub court_id: ObjectId,
}

/// In-memory registry mapping opaque session tokens to their binding.
///
/// Bindings are deliberately ephemeral: a server restart empties the registry
/// and clients re-enter through a join code.
#[derive(Default)]
pub struct SessionRegistry {
    bindings: DashMap<String, SessionBinding>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh opaque session token.
    pub fn mint_token() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Bind a token to a game day / court pair, replacing any previous
    /// binding of the same token.
    pub fn bind(&self, token: &str, binding: SessionBinding) {
        self.bindings.insert(token.to_owned(), binding);
    }

    /// Resolve a token to its current binding.
    pub fn get(&self, token: &str) -> Option<SessionBinding> {
        self.bindings.get(token).map(|entry| *entry.value())
    }

    /// Drop the binding of a token. Returns `false` when there was none.
    pub fn clear(&self, token: &str) -> bool {
        self.bindings.remove(token).is_some()
    }

    /// Drop every binding attached to a game day, returning how many were
    /// removed. Ending a game day detaches all of its participants, not just
    /// the caller.
    pub fn clear_game_day(&self, game_day_id: ObjectId) -> usize {
        let mut swept = 0;
        self.bindings.retain(|_, binding| {
            let keep = binding.game_day_id != game_day_id;
            if !keep {
                swept += 1;
            }
            keep
        });
        swept
    }
}
