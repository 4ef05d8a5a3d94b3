//! # Basic Room Example
//!
//! Demonstrates a complete client lifecycle:
//!
//! 1. Connect to a room server via WebSocket
//! 2. Join (or create) a room
//! 3. Subscribe to the three observable cells
//! 4. Nudge the room config once this user leads the room
//! 5. Shut down gracefully on Ctrl+C
//!
//! ## Running
//!
//! ```sh
//! # Start a room server on localhost:9002, then:
//! cargo run --example basic_room
//!
//! # Join an existing room instead of creating one:
//! BOARD_GAME_ROOM=QXYZ cargo run --example basic_room
//! ```

use std::sync::Arc;

use board_game_client::{
    BoardGameClient, ClientOptions, RoomId, SessionObserver, WebSocketTransport,
};

/// Default server URL when `BOARD_GAME_URL` is not set.
const DEFAULT_URL: &str = "ws://localhost:9002";

/// Prints what the original browser client pushed into the address bar and
/// the console.
struct LoggingObserver;

impl SessionObserver for LoggingObserver {
    fn room_joined(&self, room: &RoomId) {
        tracing::info!("session now lives at /{room}");
    }

    fn server_error(&self, message: &str) {
        tracing::warn!("server error: {message}");
    }

    fn invalid_action(&self, message: &str) {
        tracing::warn!("invalid action: {message}");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Logging ─────────────────────────────────────────────────────
    // Set `RUST_LOG=debug` for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let url = std::env::var("BOARD_GAME_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let room = std::env::var("BOARD_GAME_ROOM").ok().map(RoomId::from);
    tracing::info!("connecting to {url}");

    // ── Connect & start ─────────────────────────────────────────────
    let transport = WebSocketTransport::connect(&url).await?;
    let options = ClientOptions::new().with_observer(Arc::new(LoggingObserver));
    let mut client = BoardGameClient::start(transport, options);

    // ── Subscribe ───────────────────────────────────────────────────
    // Each subscription fires immediately with the current value, then once
    // per server push.
    let _users = client.users().subscribe(|users| {
        let names: Vec<_> = users
            .iter()
            .map(|u| {
                if u.leader {
                    format!("{}*", u.username)
                } else {
                    u.username.clone()
                }
            })
            .collect();
        tracing::info!("lobby: [{}]", names.join(", "));
    });
    let _config = client
        .config()
        .subscribe(|config| tracing::info!("room config: {config}"));
    let _view = client
        .view()
        .subscribe(|view| tracing::info!("game view: {view}"));

    // ── Join ────────────────────────────────────────────────────────
    // Try to resume a previous session first; fall back to a fresh join.
    let resumed = match &room {
        Some(room) => client.rejoin_room(room)?,
        None => false,
    };
    if !resumed {
        client.join_room("RustPlayer", room)?;
    }

    // ── Run until Ctrl+C ────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    client.shutdown().await;

    Ok(())
}
