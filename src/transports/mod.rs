//! Concrete [`Transport`](crate::Transport) implementations.
//!
//! Each transport lives behind a Cargo feature so embedders only pull in
//! the backends they use:
//!
//! | Feature                | Transport              |
//! |------------------------|------------------------|
//! | `transport-websocket`  | [`WebSocketTransport`] |

#[cfg(feature = "transport-websocket")]
pub mod websocket;

#[cfg(feature = "transport-websocket")]
pub use websocket::WebSocketTransport;
