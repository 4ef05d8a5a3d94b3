//! # Custom Transport Example
//!
//! Implements [`Transport`] over a pair of in-process channels and drives
//! the client against a tiny scripted "server". Useful as a template for
//! wiring the client onto transports the crate does not ship (TCP, QUIC,
//! unix sockets, a test harness).
//!
//! ## Running
//!
//! ```sh
//! cargo run --example custom_transport
//! ```

use async_trait::async_trait;
use board_game_client::{
    BoardGameClient, BoardGameError, ClientOptions, RoomId, Transport,
};
use tokio::sync::mpsc;

/// A [`Transport`] backed by two in-process channels.
struct ChannelTransport {
    to_server: mpsc::UnboundedSender<String>,
    from_server: mpsc::UnboundedReceiver<String>,
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&mut self, message: String) -> Result<(), BoardGameError> {
        self.to_server
            .send(message)
            .map_err(|e| BoardGameError::TransportSend(e.to_string()))
    }

    async fn recv(&mut self) -> Option<Result<String, BoardGameError>> {
        // `mpsc::Receiver::recv` is cancel-safe, which makes this transport
        // safe inside the client's `tokio::select!` loop.
        self.from_server.recv().await.map(Ok)
    }

    async fn close(&mut self) -> Result<(), BoardGameError> {
        self.from_server.close();
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let (to_server, mut server_rx) = mpsc::unbounded_channel::<String>();
    let (server_tx, from_server) = mpsc::unbounded_channel::<String>();

    // A scripted server: acknowledge the join, then push a membership list.
    tokio::spawn(async move {
        while let Some(frame) = server_rx.recv().await {
            tracing::info!("server received: {frame}");
            if frame.contains("join_room") {
                let _ = server_tx.send(
                    r#"{"type":"join_response","room_id":"DEMO","token":"tok","user_id":"U1","username":"RustPlayer"}"#
                        .to_string(),
                );
                let _ = server_tx.send(
                    r#"{"type":"user_info","users":[{"id":"U1","username":"RustPlayer","leader":true,"player_id":null}]}"#
                        .to_string(),
                );
            }
        }
    });

    let transport = ChannelTransport {
        to_server,
        from_server,
    };
    let mut client = BoardGameClient::start(transport, ClientOptions::new());

    let _users = client
        .users()
        .subscribe(|users| tracing::info!("lobby has {} user(s)", users.len()));

    client.join_room("RustPlayer", None)?;

    // Give the scripted exchange a moment to play out.
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    assert_eq!(client.room_id(), Some(RoomId::from("DEMO")));
    tracing::info!("joined room {:?} as {:?}", client.room_id(), client.username());

    client.shutdown().await;
    Ok(())
}
