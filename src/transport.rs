//! Transport abstraction for the room protocol.
//!
//! The protocol is JSON text frames over any persistent duplex connection.
//! [`Transport`] captures exactly that: one serialized envelope per `send`,
//! one per `recv`, framing handled inside the implementation (WebSocket
//! frames, length-prefixed TCP, an in-process channel pair in tests).
//!
//! Connection setup is deliberately not part of the trait — a WebSocket
//! wants a URL, a unix socket a path, a test a channel. Build a connected
//! transport however you like and hand it to
//! [`BoardGameClient::start`](crate::BoardGameClient::start). Likewise,
//! reconnection and backoff live outside: when a transport dies, the outer
//! layer decides whether to dial again and start a fresh client over it.

use async_trait::async_trait;

use crate::error::BoardGameError;

/// A bidirectional text-frame channel carrying protocol envelopes.
///
/// The trait is object-safe (`Box<dyn Transport>` works), though
/// [`BoardGameClient::start`](crate::BoardGameClient::start) takes
/// `impl Transport` for the common case.
///
/// # Cancel Safety
///
/// [`recv`](Transport::recv) runs inside a `tokio::select!` and **MUST** be
/// cancel-safe: a dropped `recv` future must not lose a frame. Channel-backed
/// implementations get this for free.
#[async_trait]
pub trait Transport: Send + 'static {
    /// Transmit one serialized envelope.
    ///
    /// # Errors
    ///
    /// [`BoardGameError::TransportSend`] if the frame could not be written.
    async fn send(&mut self, message: String) -> Result<(), BoardGameError>;

    /// Await the next inbound envelope.
    ///
    /// - `Some(Ok(text))` — one complete frame
    /// - `Some(Err(e))` — the connection failed
    /// - `None` — the server closed the connection cleanly
    async fn recv(&mut self) -> Option<Result<String, BoardGameError>>;

    /// Shut the connection down gracefully. Implementations should release
    /// resources even when the close handshake fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the graceful shutdown fails.
    async fn close(&mut self) -> Result<(), BoardGameError>;
}
