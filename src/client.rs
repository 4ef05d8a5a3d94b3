//! Async session façade for the board-game room protocol.
//!
//! [`BoardGameClient`] is a thin handle over a background transport loop.
//! Intents are queued on an unbounded MPSC channel and written to the
//! transport by the loop; inbound frames are decoded and dispatched — each
//! one either replaces an observable cell or notifies the injected
//! [`SessionObserver`]. The loop is the only place state is mutated, so
//! every subscriber notification for one inbound message completes before
//! the next message is looked at.
//!
//! # Example
//!
//! ```rust,ignore
//! let transport = WebSocketTransport::connect("ws://localhost:9002").await?;
//! let client = BoardGameClient::start(transport, ClientOptions::new());
//!
//! let _users = client.users().subscribe(|users| render_lobby(users));
//! let _config = client.config().subscribe(|config| render_settings(config));
//!
//! client.join_room("alice", None)?;
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::cell::{ReadCell, WriteCell, WritePolicy};
use crate::error::{BoardGameError, Result};
use crate::observer::{NoopObserver, SessionObserver};
use crate::protocol::{ClientMessage, PlayerId, RoomId, ServerMessage, UserId, UserInfo};
use crate::store::{KeyValueStore, MemoryStore, TokenStore};
use crate::transport::Transport;

/// Default timeout for the graceful shutdown.
const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Lock a mutex, recovering the guard if another thread poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Options ─────────────────────────────────────────────────────────

/// Construction-time collaborators for a [`BoardGameClient`].
///
/// Everything has a default: tokens go to an in-process [`MemoryStore`] and
/// observer notifications are discarded. Embedders that want persistent
/// rejoins or navigation hooks inject their own implementations.
///
/// # Example
///
/// ```
/// use board_game_client::ClientOptions;
/// use std::time::Duration;
///
/// let options = ClientOptions::new()
///     .with_shutdown_timeout(Duration::from_secs(5));
/// ```
#[derive(Clone)]
pub struct ClientOptions {
    /// Persistence surface for reconnect tokens.
    pub store: Arc<dyn KeyValueStore>,
    /// Collaborator notified on join, server errors, and token invalidation.
    pub observer: Arc<dyn SessionObserver>,
    /// How long [`BoardGameClient::shutdown`] waits for the transport loop
    /// to close before aborting it.
    pub shutdown_timeout: Duration,
}

impl ClientOptions {
    /// Options with an in-process token store and a no-op observer.
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            observer: Arc::new(NoopObserver),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    /// Inject the persistence surface backing the reconnect-token store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = store;
        self
    }

    /// Inject the session observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Set the graceful shutdown timeout.
    #[must_use]
    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish_non_exhaustive()
    }
}

// ── Shared state ────────────────────────────────────────────────────

/// Session identity assigned by the server in `join_response`.
#[derive(Debug, Clone)]
struct Identity {
    room_id: RoomId,
    user_id: UserId,
    username: String,
}

/// State shared between the client handle, the config gate, and the loop.
struct SessionState {
    connected: AtomicBool,
    /// Unset until the first `join_response`; replaced wholesale by any
    /// later successful join.
    identity: Mutex<Option<Identity>>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            identity: Mutex::new(None),
        }
    }

    fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::Release);
    }
}

// ── Config write gate ───────────────────────────────────────────────

/// Write policy on the config cell: only the room leader may write.
///
/// Scans the current membership for the local user. If that user is the
/// leader, the candidate config is sent to the server as a side effect and
/// the local optimistic replace is allowed; in every other case (not
/// leader, not in the list, not yet joined) the write is silently dropped
/// and nothing is sent. The server answers an accepted update with an
/// authoritative `room_info`, which overwrites the optimistic value.
struct LeaderGate {
    state: Arc<SessionState>,
    users: ReadCell<Vec<UserInfo>>,
    cmd_tx: mpsc::UnboundedSender<ClientMessage>,
}

impl WritePolicy<Value> for LeaderGate {
    fn allow(&self, candidate: &Value, _current: &Value) -> bool {
        let user_id = match lock(&self.state.identity).as_ref() {
            Some(identity) => identity.user_id.clone(),
            None => return false,
        };
        for user in self.users.get() {
            if user.id == user_id {
                if user.leader {
                    let _ = self.cmd_tx.send(ClientMessage::UpdateConfig {
                        config: candidate.clone(),
                    });
                    return true;
                }
                debug!(user = %user_id, "config write dropped: not the leader");
                return false;
            }
        }
        debug!(user = %user_id, "config write dropped: not in the room");
        false
    }
}

// ── Client handle ───────────────────────────────────────────────────

/// Client handle for one room session over one connection.
///
/// Created via [`BoardGameClient::start`], which spawns the background
/// transport loop. The public surface is the three observable cells
/// ([`users`](Self::users), [`config`](Self::config), [`view`](Self::view))
/// plus the intent operations. Intents are fire-and-forget: they return as
/// soon as the message is queued, and the eventual effect arrives as a
/// server push on one of the cells (or as an observer notification).
pub struct BoardGameClient {
    cmd_tx: mpsc::UnboundedSender<ClientMessage>,
    state: Arc<SessionState>,
    users: ReadCell<Vec<UserInfo>>,
    config: WriteCell<Value>,
    view: ReadCell<Value>,
    tokens: TokenStore,
    task: Option<tokio::task::JoinHandle<()>>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    shutdown_timeout: Duration,
}

impl BoardGameClient {
    /// Start the transport loop over a connected [`Transport`].
    ///
    /// Must be called from within a tokio runtime. The loop runs until the
    /// server closes the connection, the transport fails, or
    /// [`shutdown`](Self::shutdown) is called.
    pub fn start(transport: impl Transport, options: ClientOptions) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<ClientMessage>();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let state = Arc::new(SessionState::new());
        let users = ReadCell::new(Vec::new());
        let view = ReadCell::new(Value::Null);
        let config = WriteCell::with_policy(
            Value::Null,
            Arc::new(LeaderGate {
                state: Arc::clone(&state),
                users: users.clone(),
                cmd_tx: cmd_tx.clone(),
            }),
        );
        let tokens = TokenStore::new(Arc::clone(&options.store));

        let ctx = LoopContext {
            state: Arc::clone(&state),
            users: users.clone(),
            config: config.clone(),
            view: view.clone(),
            tokens: tokens.clone(),
            observer: Arc::clone(&options.observer),
        };
        let task = tokio::spawn(transport_loop(transport, cmd_rx, ctx, shutdown_rx));

        Self {
            cmd_tx,
            state,
            users,
            config,
            view,
            tokens,
            task: Some(task),
            shutdown_tx: Some(shutdown_tx),
            shutdown_timeout: options.shutdown_timeout,
        }
    }

    // ── Observable state ────────────────────────────────────────────

    /// Room membership, replaced wholesale on every `user_info` push.
    pub fn users(&self) -> &ReadCell<Vec<UserInfo>> {
        &self.users
    }

    /// Room configuration. Writable, but a write only takes (locally, and
    /// as an outbound `update_config`) while the local user is the room
    /// leader; otherwise it is silently dropped. Even an accepted write is
    /// provisional until the server's `room_info` confirms it.
    pub fn config(&self) -> &WriteCell<Value> {
        &self.config
    }

    /// This user's game view, replaced on `game_info` and patched forward
    /// on `game_view_diff`.
    pub fn view(&self) -> &ReadCell<Value> {
        &self.view
    }

    // ── Session identity ────────────────────────────────────────────

    /// Room joined in the current session, once a `join_response` arrived.
    pub fn room_id(&self) -> Option<RoomId> {
        lock(&self.state.identity).as_ref().map(|i| i.room_id.clone())
    }

    /// Server-assigned user id, once a `join_response` arrived.
    pub fn user_id(&self) -> Option<UserId> {
        lock(&self.state.identity).as_ref().map(|i| i.user_id.clone())
    }

    /// Username the server acknowledged, once a `join_response` arrived.
    pub fn username(&self) -> Option<String> {
        lock(&self.state.identity).as_ref().map(|i| i.username.clone())
    }

    /// Whether the background transport loop is still running.
    pub fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::Acquire)
    }

    // ── Intents ─────────────────────────────────────────────────────

    /// Join `room` as `username`, or create a new room with `room: None`.
    ///
    /// # Errors
    ///
    /// [`BoardGameError::NotConnected`] if the transport loop has exited.
    pub fn join_room(&self, username: impl Into<String>, room: Option<RoomId>) -> Result<()> {
        self.send(ClientMessage::JoinRoom {
            username: username.into(),
            room,
        })
    }

    /// Resume an earlier session in `room` using the stored reconnect token.
    ///
    /// This is a pre-flight check, not a round trip: `Ok(false)` means no
    /// token is stored for that room and nothing was sent; `Ok(true)` means
    /// the rejoin request went out — whether the server honors it arrives
    /// later as a `join_response` or an `invalidate_token`.
    ///
    /// # Errors
    ///
    /// [`BoardGameError::NotConnected`] if the transport loop has exited.
    pub fn rejoin_room(&self, room: &RoomId) -> Result<bool> {
        let Some(token) = self.tokens.get(room) else {
            debug!(room = %room, "rejoin skipped: no stored token");
            return Ok(false);
        };
        self.send(ClientMessage::RejoinRoom {
            token,
            room: room.clone(),
        })?;
        Ok(true)
    }

    /// Send a configuration update without touching the local config cell.
    ///
    /// Prefer `config().write(..)` for the optimistic path; this raw send
    /// is unconditional and leaves rejection entirely to the server.
    ///
    /// # Errors
    ///
    /// [`BoardGameError::NotConnected`] if the transport loop has exited.
    pub fn update_config(&self, config: Value) -> Result<()> {
        self.send(ClientMessage::UpdateConfig { config })
    }

    /// Ask the server to start the game, optionally pinning the user-to-seat
    /// mapping.
    ///
    /// # Errors
    ///
    /// [`BoardGameError::NotConnected`] if the transport loop has exited.
    pub fn start_game(&self, player_mapping: Option<HashMap<UserId, PlayerId>>) -> Result<()> {
        self.send(ClientMessage::StartGame { player_mapping })
    }

    /// Submit a game action. Rejections come back as `invalid_action`.
    ///
    /// # Errors
    ///
    /// [`BoardGameError::NotConnected`] if the transport loop has exited.
    pub fn do_action(&self, action: Value) -> Result<()> {
        self.send(ClientMessage::DoAction { action })
    }

    /// Ask the server to remove `user` from the room.
    ///
    /// # Errors
    ///
    /// [`BoardGameError::NotConnected`] if the transport loop has exited.
    pub fn kick_user(&self, user: UserId) -> Result<()> {
        self.send(ClientMessage::KickUser { user })
    }

    /// Ask the server to hand `from_user`'s seat to `to_user`.
    ///
    /// # Errors
    ///
    /// [`BoardGameError::NotConnected`] if the transport loop has exited.
    pub fn reassign_player(&self, from_user: UserId, to_user: UserId) -> Result<()> {
        self.send(ClientMessage::ReassignPlayer { from_user, to_user })
    }

    /// Ask the server to abandon the running game and reopen the lobby.
    ///
    /// # Errors
    ///
    /// [`BoardGameError::NotConnected`] if the transport loop has exited.
    pub fn reset_to_lobby(&self) -> Result<()> {
        self.send(ClientMessage::ResetToLobby)
    }

    /// Ask the server to resend the full game view. Useful after a
    /// `game_view_diff` failed to apply locally.
    ///
    /// # Errors
    ///
    /// [`BoardGameError::NotConnected`] if the transport loop has exited.
    pub fn request_game_view(&self) -> Result<()> {
        self.send(ClientMessage::GameViewRequest)
    }

    /// Shut down the client, closing the transport and stopping the
    /// background loop. Waits up to the configured shutdown timeout, then
    /// aborts the task.
    pub async fn shutdown(&mut self) {
        debug!("BoardGameClient: shutdown requested");

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }

        if let Some(mut task) = self.task.take() {
            match tokio::time::timeout(self.shutdown_timeout, &mut task).await {
                Ok(Ok(())) => {}
                Ok(Err(join_err)) => {
                    warn!("transport loop terminated with join error: {join_err}");
                }
                Err(_) => {
                    warn!("transport loop did not exit within timeout; aborting task");
                    task.abort();
                    if let Err(join_err) = task.await {
                        debug!("transport loop aborted: {join_err}");
                    }
                }
            }
        }

        self.state.mark_disconnected();
    }

    // ── Internal helpers ────────────────────────────────────────────

    /// Queue a message for the transport loop.
    fn send(&self, msg: ClientMessage) -> Result<()> {
        if !self.state.connected.load(Ordering::Acquire) {
            return Err(BoardGameError::NotConnected);
        }
        self.cmd_tx
            .send(msg)
            .map_err(|_| BoardGameError::NotConnected)
    }
}

impl std::fmt::Debug for BoardGameClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardGameClient")
            .field("connected", &self.is_connected())
            .field("room_id", &self.room_id())
            .field("has_task", &self.task.is_some())
            .finish()
    }
}

impl Drop for BoardGameClient {
    fn drop(&mut self) {
        // `Drop` is synchronous, so there is no executor context to drive a
        // graceful close. Abort the loop task; the transport is dropped
        // with the future.
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ── Transport loop ──────────────────────────────────────────────────

/// Everything the loop task needs to dispatch inbound messages.
struct LoopContext {
    state: Arc<SessionState>,
    users: ReadCell<Vec<UserInfo>>,
    config: WriteCell<Value>,
    view: ReadCell<Value>,
    tokens: TokenStore,
    observer: Arc<dyn SessionObserver>,
}

/// Background loop multiplexing outbound intents and inbound frames via
/// `tokio::select!`.
///
/// Exits when:
/// - The command channel closes (client handle dropped)
/// - The shutdown signal fires
/// - The transport returns `None` (server closed) or an error
async fn transport_loop(
    mut transport: impl Transport,
    mut cmd_rx: mpsc::UnboundedReceiver<ClientMessage>,
    ctx: LoopContext,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) {
    debug!("transport loop started");

    loop {
        tokio::select! {
            // Branch 1: outgoing intent from the client handle
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(msg) => {
                        debug!("sending client message: {:?}", std::mem::discriminant(&msg));
                        match serde_json::to_string(&msg) {
                            Ok(json) => {
                                if let Err(e) = transport.send(json).await {
                                    error!("transport send error: {e}");
                                    ctx.state.mark_disconnected();
                                    break;
                                }
                            }
                            Err(e) => {
                                error!("failed to serialize ClientMessage: {e}");
                                // Serialization errors are programming bugs; don't kill the loop.
                            }
                        }
                    }
                    None => {
                        debug!("command channel closed, shutting down transport loop");
                        let _ = transport.close().await;
                        ctx.state.mark_disconnected();
                        break;
                    }
                }
            }

            // Branch 2: shutdown signal
            _ = &mut shutdown_rx => {
                debug!("shutdown signal received");
                let _ = transport.close().await;
                ctx.state.mark_disconnected();
                break;
            }

            // Branch 3: incoming frame from the server
            incoming = transport.recv() => {
                match incoming {
                    Some(Ok(text)) => {
                        match serde_json::from_str::<ServerMessage>(&text) {
                            Ok(message) => apply_server_message(&ctx, message),
                            Err(e) => {
                                // Fail closed: unknown or malformed frames
                                // mutate nothing.
                                warn!("dropping undecodable server message: {e} — raw: {text}");
                            }
                        }
                    }
                    Some(Err(e)) => {
                        error!("transport receive error: {e}");
                        ctx.state.mark_disconnected();
                        break;
                    }
                    None => {
                        debug!("transport closed by server");
                        ctx.state.mark_disconnected();
                        break;
                    }
                }
            }
        }
    }

    debug!("transport loop exited");
}

/// Route one decoded server message to the cell it replaces or the observer
/// callback it triggers. Runs on the loop task; all subscriber
/// notifications complete before the next frame is dispatched.
fn apply_server_message(ctx: &LoopContext, message: ServerMessage) {
    match message {
        ServerMessage::Error { message } => {
            warn!(%message, "server reported an error");
            ctx.observer.server_error(&message);
        }
        ServerMessage::JoinResponse {
            room_id,
            token,
            user_id,
            username,
        } => {
            debug!(room = %room_id, user = %user_id, "join acknowledged");
            ctx.tokens.set(&room_id, &token);
            *lock(&ctx.state.identity) = Some(Identity {
                room_id: room_id.clone(),
                user_id,
                username,
            });
            ctx.observer.room_joined(&room_id);
        }
        ServerMessage::InvalidateToken { token } => {
            debug!("server invalidated a reconnect token");
            ctx.observer.token_invalidated(&token);
        }
        ServerMessage::UserInfo { users } => ctx.users.replace(users),
        // Server-authoritative: bypasses the leader gate.
        ServerMessage::RoomInfo { config } => ctx.config.replace(config),
        ServerMessage::GameInfo { view } => ctx.view.replace(view),
        ServerMessage::GameViewDiff { diff } => apply_view_diff(ctx, diff),
        ServerMessage::InvalidAction { message } => {
            warn!(%message, "server rejected an action");
            ctx.observer.invalid_action(&message);
        }
    }
}

/// Patch the current view forward. A diff that fails to parse or apply is
/// dropped like any malformed frame — the view cell keeps its last good
/// value and the consumer can resynchronize with a `game_view_request`.
fn apply_view_diff(ctx: &LoopContext, diff: Value) {
    let patch: json_patch::Patch = match serde_json::from_value(diff) {
        Ok(patch) => patch,
        Err(e) => {
            warn!("dropping undecodable game view diff: {e}");
            return;
        }
    };
    let mut view = ctx.view.get();
    if let Err(e) = json_patch::patch(&mut view, &patch) {
        warn!("game view diff did not apply: {e}");
        return;
    }
    ctx.view.replace(view);
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    // ── Mock transport ──────────────────────────────────────────────

    /// Records sent frames and replays scripted inbound frames. An explicit
    /// `None` entry signals a clean close; once the script runs out, `recv`
    /// hangs so the loop stays alive until shutdown.
    struct MockTransport {
        incoming: VecDeque<Option<std::result::Result<String, BoardGameError>>>,
        sent: Arc<StdMutex<Vec<String>>>,
        closed: Arc<AtomicBool>,
    }

    impl MockTransport {
        fn new(
            incoming: Vec<Option<std::result::Result<String, BoardGameError>>>,
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
        async fn send(&mut self, message: String) -> std::result::Result<(), BoardGameError> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }

        async fn recv(&mut self) -> Option<std::result::Result<String, BoardGameError>> {
            if let Some(item) = self.incoming.pop_front() {
                item
            } else {
                std::future::pending().await
            }
        }

        async fn close(&mut self) -> std::result::Result<(), BoardGameError> {
            self.closed.store(true, Ordering::Relaxed);
            Ok(())
        }
    }

    fn join_response_json() -> String {
        serde_json::to_string(&ServerMessage::JoinResponse {
            room_id: RoomId::from("R1"),
            token: crate::protocol::ReconnectToken::from("T1"),
            user_id: UserId::from("U1"),
            username: "alice".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn join_room_sends_correct_message() {
        let (transport, sent, _closed) = MockTransport::new(vec![]);
        let mut client = BoardGameClient::start(transport, ClientOptions::new());

        client.join_room("alice", None).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        {
            let messages = sent.lock().unwrap();
            assert_eq!(messages.len(), 1);
            let msg: ClientMessage = serde_json::from_str(&messages[0]).unwrap();
            if let ClientMessage::JoinRoom { username, room } = msg {
                assert_eq!(username, "alice");
                assert!(room.is_none());
            } else {
                panic!("expected JoinRoom, got {msg:?}");
            }
        }

        client.shutdown().await;
    }

    #[tokio::test]
    async fn join_response_sets_identity() {
        let (transport, _sent, _closed) =
            MockTransport::new(vec![Some(Ok(join_response_json()))]);
        let mut client = BoardGameClient::start(transport, ClientOptions::new());

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(client.room_id(), Some(RoomId::from("R1")));
        assert_eq!(client.user_id(), Some(UserId::from("U1")));
        assert_eq!(client.username().as_deref(), Some("alice"));

        client.shutdown().await;
    }

    #[tokio::test]
    async fn not_connected_error_after_shutdown() {
        let (transport, _sent, _closed) = MockTransport::new(vec![]);
        let mut client = BoardGameClient::start(transport, ClientOptions::new());

        client.shutdown().await;

        let result = client.do_action(serde_json::json!({"kind": "pass"}));
        assert!(matches!(result, Err(BoardGameError::NotConnected)));
    }

    #[tokio::test]
    async fn shutdown_closes_transport() {
        let (transport, _sent, closed) = MockTransport::new(vec![]);
        let mut client = BoardGameClient::start(transport, ClientOptions::new());

        client.shutdown().await;

        assert!(closed.load(Ordering::Relaxed));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn double_shutdown_does_not_panic() {
        let (transport, _sent, _closed) = MockTransport::new(vec![]);
        let mut client = BoardGameClient::start(transport, ClientOptions::new());

        client.shutdown().await;
        client.shutdown().await;
    }

    #[tokio::test]
    async fn disconnects_on_transport_close() {
        let (transport, _sent, _closed) = MockTransport::new(vec![None]);
        let client = BoardGameClient::start(transport, ClientOptions::new());

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!client.is_connected());
        assert!(matches!(
            client.request_game_view(),
            Err(BoardGameError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn disconnects_on_transport_error() {
        let (transport, _sent, _closed) = MockTransport::new(vec![Some(Err(
            BoardGameError::TransportReceive("boom".into()),
        ))]);
        let client = BoardGameClient::start(transport, ClientOptions::new());

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn drop_without_explicit_shutdown() {
        let (transport, _sent, _closed) = MockTransport::new(vec![]);
        let client = BoardGameClient::start(transport, ClientOptions::new());

        // Dropping must abort the loop task without panicking or hanging.
        drop(client);
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn debug_impl_for_client() {
        let (transport, _sent, _closed) = MockTransport::new(vec![]);
        let mut client = BoardGameClient::start(transport, ClientOptions::new());

        let debug_str = format!("{client:?}");
        assert!(debug_str.contains("BoardGameClient"));
        assert!(debug_str.contains("connected"));

        client.shutdown().await;
    }

    #[tokio::test]
    async fn options_defaults() {
        let options = ClientOptions::new();
        assert_eq!(options.shutdown_timeout, Duration::from_secs(1));
    }
}
