//! # Board Game Client
//!
//! Transport-agnostic Rust client for synchronizing multiplayer board-game
//! room sessions over a single persistent duplex connection.
//!
//! The server owns all state. This crate mirrors what the server pushes
//! into three independently observable cells — room membership, room
//! configuration, and the per-user game view — and forwards user intents as
//! JSON messages. It never validates game rules or room invariants.
//!
//! ## Features
//!
//! - **Transport-agnostic** — implement the [`Transport`] trait for any
//!   backend; the default `transport-websocket` feature ships
//!   [`WebSocketTransport`]
//! - **Observable state** — subscribe to [`ReadCell`]/[`WriteCell`] handles;
//!   callbacks fire synchronously, in subscription order, starting with the
//!   current value
//! - **Leader-gated config writes** — a write to the config cell only takes
//!   (and only reaches the wire) while the local user leads the room
//! - **Session resumption** — reconnect tokens persist through an injected
//!   [`KeyValueStore`], so `rejoin_room` can resume without a fresh identity
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use board_game_client::{BoardGameClient, ClientOptions, WebSocketTransport};
//!
//! let transport = WebSocketTransport::connect("ws://localhost:9002").await?;
//! let client = BoardGameClient::start(transport, ClientOptions::new());
//!
//! let _sub = client.users().subscribe(|users| println!("{} users", users.len()));
//! client.join_room("alice", None)?;
//! ```

pub mod cell;
pub mod client;
pub mod error;
pub mod observer;
pub mod protocol;
pub mod store;
pub mod transport;
pub mod transports;

// Re-export primary types for ergonomic imports.
pub use cell::{ReadCell, Subscription, WriteCell, WritePolicy};
pub use client::{BoardGameClient, ClientOptions};
pub use error::BoardGameError;
pub use observer::{NoopObserver, SessionObserver};
pub use protocol::{
    ClientMessage, PlayerId, ReconnectToken, RoomId, ServerMessage, UserId, UserInfo,
};
pub use store::{KeyValueStore, MemoryStore, TokenStore};
pub use transport::Transport;

#[cfg(feature = "transport-websocket")]
pub use transports::WebSocketTransport;
