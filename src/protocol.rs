//! Wire types for the board-game room protocol.
//!
//! Every message is one JSON object per text frame, internally tagged by a
//! snake_case `"type"` field, so the wire form of
//! [`ClientMessage::JoinRoom`] is
//! `{"type":"join_room","username":"alice","room":null}`.
//!
//! All identifiers are opaque server-issued strings. The client never
//! inspects or generates them; it only echoes them back.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Identifiers ─────────────────────────────────────────────────────

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier string.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// The underlying string form.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id! {
    /// Identifies a room. Doubles as the path segment shown to the user
    /// after a join, so it implements [`Display`](fmt::Display).
    RoomId
}

string_id! {
    /// Identifies a user within a room.
    UserId
}

string_id! {
    /// Identifies a seat in the game itself, as opposed to a user in the
    /// room. The server maps users to players when a game starts.
    PlayerId
}

string_id! {
    /// Opaque bearer credential for resuming a room session without
    /// re-authenticating as a new user. Deliberately has no `Display` impl
    /// so it does not end up in rendered output by accident.
    ReconnectToken
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Membership ──────────────────────────────────────────────────────

/// One entry in the room membership list pushed by `user_info`.
///
/// The server guarantees at most one entry per [`UserId`]; the client does
/// not re-check this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    /// The one user allowed to mutate the room configuration and start
    /// the game.
    pub leader: bool,
    /// Set once a game is running and this user holds a seat.
    pub player_id: Option<PlayerId>,
}

// ── Messages ────────────────────────────────────────────────────────

/// Message types sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Join a room, or create one by passing `room: None`.
    JoinRoom {
        username: String,
        room: Option<RoomId>,
    },
    /// Resume an earlier session using a stored reconnect token.
    RejoinRoom {
        token: ReconnectToken,
        room: RoomId,
    },
    /// Replace the room configuration (leader only; the server enforces it).
    UpdateConfig { config: Value },
    /// Remove a user from the room (leader only).
    KickUser { user: UserId },
    /// Hand one user's seat to another user (leader only).
    ReassignPlayer { from_user: UserId, to_user: UserId },
    /// Start the game. `player_mapping: None` lets the server assign seats.
    StartGame {
        #[serde(default)]
        player_mapping: Option<HashMap<UserId, PlayerId>>,
    },
    /// Submit a game action. The payload is defined by the game, not by
    /// this layer.
    DoAction { action: Value },
    /// Ask the server to resend the full game view, e.g. after a dropped
    /// diff.
    GameViewRequest,
    /// Abandon the running game and return the room to its lobby.
    ResetToLobby,
}

/// Message types sent from server to client.
///
/// Decoding fails closed: a frame whose `"type"` is not listed here does not
/// deserialize, and the dispatcher drops it without touching any state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Human-readable failure report. Informational only.
    Error { message: String },
    /// Acknowledges a `join_room`/`rejoin_room`; carries the session
    /// identity and the token for later rejoins.
    JoinResponse {
        room_id: RoomId,
        token: ReconnectToken,
        user_id: UserId,
        username: String,
    },
    /// A previously issued reconnect token is no longer honored.
    InvalidateToken { token: ReconnectToken },
    /// Full replacement of the room membership list.
    UserInfo { users: Vec<UserInfo> },
    /// Full replacement of the room configuration.
    RoomInfo { config: Value },
    /// Full replacement of this user's game view.
    GameInfo { view: Value },
    /// RFC 6902 patch against the last full view.
    GameViewDiff { diff: Value },
    /// The server rejected a submitted game action.
    InvalidAction { message: String },
}

// ── Tests ───────────────────────────────────────────────────────────
