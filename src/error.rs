//! Error types for the board-game client.
//!
//! Server-reported application failures (`error`, `invalid_action` frames)
//! are never surfaced through this enum — they go to the
//! [`SessionObserver`](crate::SessionObserver). These variants cover the
//! ambient failures of the client itself: the transport and the codec.

use thiserror::Error;

/// Errors that can occur when using the board-game client.
#[derive(Debug, Error)]
pub enum BoardGameError {
    /// Failed to send a message through the transport.
    #[error("transport send error: {0}")]
    TransportSend(String),

    /// Failed to receive a message from the transport.
    #[error("transport receive error: {0}")]
    TransportReceive(String),

    /// The transport connection was closed unexpectedly.
    #[error("transport connection closed")]
    TransportClosed,

    /// Failed to serialize or deserialize a protocol message.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Attempted an operation after the background transport loop exited.
    #[error("not connected to server")]
    NotConnected,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized [`Result`] type for board-game client operations.
pub type Result<T> = std::result::Result<T, BoardGameError>;
