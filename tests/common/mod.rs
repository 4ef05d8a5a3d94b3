#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    dead_code
)]
//! Shared test utilities for board-game client integration tests.
//!
//! Provides a scripted [`MockTransport`] plus helpers for building the
//! server-frame JSON fixtures the tests replay.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use board_game_client::protocol::{ReconnectToken, RoomId, ServerMessage, UserId, UserInfo};
use board_game_client::{BoardGameError, Transport};

// ── MockTransport ───────────────────────────────────────────────────

/// A scripted transport for integration testing.
///
/// `recv()` consumes the scripted entries in order; an explicit `None`
/// entry signals a clean close, and an exhausted script hangs forever so
/// the transport loop stays alive until shutdown. Everything the client
/// sends is recorded in `sent`.
pub struct MockTransport {
    incoming: VecDeque<Option<Result<String, BoardGameError>>>,
    pub sent: Arc<StdMutex<Vec<String>>>,
    pub closed: Arc<AtomicBool>,
}

impl MockTransport {
    /// Build a transport replaying `incoming`; returns shared handles for
    /// inspecting sent frames and the close flag.
    pub fn new(
        incoming: Vec<Option<Result<String, BoardGameError>>>,
    ) -> (Self, Arc<StdMutex<Vec<String>>>, Arc<AtomicBool>) {
        let sent = Arc::new(StdMutex::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));
        let transport = Self {
            incoming: VecDeque::from(incoming),
            sent: Arc::clone(&sent),
            closed: Arc::clone(&closed),
        };
        (transport, sent, closed)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, message: String) -> Result<(), BoardGameError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }

    async fn recv(&mut self) -> Option<Result<String, BoardGameError>> {
        if let Some(item) = self.incoming.pop_front() {
            item
        } else {
            std::future::pending().await
        }
    }

    async fn close(&mut self) -> Result<(), BoardGameError> {
        self.closed.store(true, Ordering::Relaxed);
        Ok(())
    }
}

// ── Fixture helpers ─────────────────────────────────────────────────

/// `join_response` frame for room `R1`, user `U1` ("alice"), token `T1`.
pub fn join_response_json() -> String {
    join_response_json_for("R1", "U1", "alice", "T1")
}

pub fn join_response_json_for(room: &str, user: &str, username: &str, token: &str) -> String {
    serde_json::to_string(&ServerMessage::JoinResponse {
        room_id: RoomId::from(room),
        token: ReconnectToken::from(token),
        user_id: UserId::from(user),
        username: username.to_owned(),
    })
    .unwrap()
}

/// `user_info` frame from `(id, username, leader)` triples.
pub fn user_info_json(users: &[(&str, &str, bool)]) -> String {
    let users: Vec<UserInfo> = users
        .iter()
        .map(|(id, username, leader)| UserInfo {
            id: UserId::from(*id),
            username: (*username).to_owned(),
            leader: *leader,
            player_id: None,
        })
        .collect();
    serde_json::to_string(&ServerMessage::UserInfo { users }).unwrap()
}

pub fn room_info_json(config: serde_json::Value) -> String {
    serde_json::to_string(&ServerMessage::RoomInfo { config }).unwrap()
}

pub fn game_info_json(view: serde_json::Value) -> String {
    serde_json::to_string(&ServerMessage::GameInfo { view }).unwrap()
}

pub fn game_view_diff_json(diff: serde_json::Value) -> String {
    serde_json::to_string(&ServerMessage::GameViewDiff { diff }).unwrap()
}

pub fn error_json(message: &str) -> String {
    serde_json::to_string(&ServerMessage::Error {
        message: message.to_owned(),
    })
    .unwrap()
}

pub fn invalid_action_json(message: &str) -> String {
    serde_json::to_string(&ServerMessage::InvalidAction {
        message: message.to_owned(),
    })
    .unwrap()
}

pub fn invalidate_token_json(token: &str) -> String {
    serde_json::to_string(&ServerMessage::InvalidateToken {
        token: ReconnectToken::from(token),
    })
    .unwrap()
}
