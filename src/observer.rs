//! Session observer collaborator.
//!
//! The original browser client reached straight into globals: it pushed the
//! room path into `history` on join and logged server errors to the
//! console. Here that wiring is an injected trait so the core stays free of
//! ambient dependencies — a UI layer updates its route in
//! [`room_joined`](SessionObserver::room_joined), a headless bot just logs.
//!
//! Every method has a no-op default, so implementors override only the
//! notifications they care about. All methods are called from the client's
//! background task and must not block.

use crate::protocol::{ReconnectToken, RoomId};

/// Receives the out-of-band notifications of a session: navigation on join
/// and server-reported, non-fatal failure messages.
///
/// None of these indicate a client error — they are informational. State
/// changes proper are delivered through the observable cells.
pub trait SessionObserver: Send + Sync {
    /// A `join_response` arrived: the session now lives at `room`.
    fn room_joined(&self, room: &RoomId) {
        let _ = room;
    }

    /// The server reported a general failure for a prior request.
    fn server_error(&self, message: &str) {
        let _ = message;
    }

    /// The server rejected a submitted game action.
    fn invalid_action(&self, message: &str) {
        let _ = message;
    }

    /// The server declared a reconnect token dead. The stored entry is left
    /// in place; whether to clear it is the embedder's call.
    fn token_invalidated(&self, token: &ReconnectToken) {
        let _ = token;
    }
}

/// Discards every notification. The default when none is injected.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
