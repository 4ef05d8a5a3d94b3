//! Reconnect-token persistence.
//!
//! The client never touches a concrete storage backend directly. A
//! [`KeyValueStore`] is injected at construction (browser embeddings wrap
//! their local storage, native apps a config file, tests use
//! [`MemoryStore`]), and [`TokenStore`] layers the fixed key scheme on top:
//! one entry per room, keyed `"reconnect_token:" + room`.
//!
//! Tokens are opaque bearer credentials. No expiry, no encryption — keeping
//! them confidential is the transport's and the backend's problem.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::protocol::{ReconnectToken, RoomId};

/// Key prefix for reconnect tokens, shared with the original browser client
/// so both can resume the same sessions.
const TOKEN_KEY_PREFIX: &str = "reconnect_token:";

// ── Storage surface ─────────────────────────────────────────────────

/// A persisted string-to-string mapping.
///
/// Implementations must be safe to call from the client's background task;
/// both methods are expected to be cheap and non-blocking.
pub trait KeyValueStore: Send + Sync {
    /// Look up `key`, returning the stored value if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);
}

/// In-process [`KeyValueStore`] backed by a `HashMap`.
///
/// The default backing when no store is injected. Nothing survives the
/// process, which is exactly right for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }
}

// ── Token store ─────────────────────────────────────────────────────

/// Per-room reconnect-token mapping over an injected [`KeyValueStore`].
///
/// Entries are written on every successful join or rejoin and are never
/// removed by this layer, not even when the server invalidates a token —
/// clearing is the embedding application's decision.
#[derive(Clone)]
pub struct TokenStore {
    backend: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    /// Layer the token key scheme over `backend`. The client builds its own
    /// instance from [`ClientOptions`](crate::ClientOptions); constructing
    /// one directly is useful for pre-seeding tokens or inspecting them.
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    fn key(room: &RoomId) -> String {
        format!("{TOKEN_KEY_PREFIX}{room}")
    }

    /// Token stored for `room`, if any.
    pub fn get(&self, room: &RoomId) -> Option<ReconnectToken> {
        self.backend.get(&Self::key(room)).map(ReconnectToken::new)
    }

    /// Remember `token` as the credential for `room`.
    pub fn set(&self, room: &RoomId, token: &ReconnectToken) {
        self.backend.set(&Self::key(room), token.as_str());
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k"), None);
        store.set("k", "v1");
        assert_eq!(store.get("k").as_deref(), Some("v1"));
        store.set("k", "v2");
        assert_eq!(store.get("k").as_deref(), Some("v2"));
    }

    #[test]
    fn token_store_keys_by_room_with_prefix() {
        let backend = Arc::new(MemoryStore::new());
        let tokens = TokenStore::new(Arc::clone(&backend) as Arc<dyn KeyValueStore>);

        let room = RoomId::from("R1");
        tokens.set(&room, &ReconnectToken::from("T1"));

        assert_eq!(backend.get("reconnect_token:R1").as_deref(), Some("T1"));
        assert_eq!(tokens.get(&room), Some(ReconnectToken::from("T1")));
    }

    #[test]
    fn missing_room_yields_none() {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(tokens.get(&RoomId::from("nope")), None);
    }

    #[test]
    fn rooms_do_not_collide() {
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        tokens.set(&RoomId::from("A"), &ReconnectToken::from("ta"));
        tokens.set(&RoomId::from("B"), &ReconnectToken::from("tb"));
        assert_eq!(tokens.get(&RoomId::from("A")), Some(ReconnectToken::from("ta")));
        assert_eq!(tokens.get(&RoomId::from("B")), Some(ReconnectToken::from("tb")));
    }
}
