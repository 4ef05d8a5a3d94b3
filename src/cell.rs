//! Observable state cells.
//!
//! A cell holds one slice of session state and notifies subscribers
//! synchronously whenever the value is replaced. Two flavors exist:
//!
//! - [`ReadCell`] — mutated only by the client's dispatcher as server
//!   messages arrive. Consumers subscribe and read.
//! - [`WriteCell`] — additionally writable by the consumer, with every
//!   write checked by an injected [`WritePolicy`]. A rejected write is
//!   silently dropped: no notification, no error. The caller cannot
//!   distinguish it from a no-op write, which is the intended contract —
//!   the server remains the authority and will push the real value.
//!
//! Values are replaced wholesale, never merged. Notification runs in
//! subscription order, with the subscriber list snapshotted at the start of
//! each round: a subscriber added from inside a callback is appended but
//! does not see that round's value (it already received the current value
//! when it subscribed).
//!
//! Cells are cheap `Clone` handles over shared state. Server pushes all
//! land on the single transport-loop task, so the notifications for one
//! inbound message run to completion before the next message is dispatched.
//! An optimistic [`WriteCell::write`] runs on the caller's thread instead;
//! the value and subscriber list are internally locked, so storage stays
//! consistent either way.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Lock a mutex, recovering the guard if a panicking subscriber poisoned it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Write policy ────────────────────────────────────────────────────

/// Authorization strategy consulted by [`WriteCell::write`].
///
/// Implementations receive the candidate value and a snapshot of the
/// current value, and may perform side effects (the client's config gate
/// sends the outbound `update_config` from here) before deciding.
pub trait WritePolicy<T>: Send + Sync {
    /// Return `true` to let `candidate` replace `current`, `false` to drop
    /// the write silently.
    fn allow(&self, candidate: &T, current: &T) -> bool;
}

// ── Shared core ─────────────────────────────────────────────────────

struct Subscriber<T> {
    id: u64,
    callback: Callback<T>,
}

struct Core<T> {
    value: Mutex<T>,
    subscribers: Mutex<Vec<Subscriber<T>>>,
    next_id: AtomicU64,
}

impl<T: Clone> Core<T> {
    fn new(initial: T) -> Self {
        Self {
            value: Mutex::new(initial),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    fn get(&self) -> T {
        lock(&self.value).clone()
    }

    /// Store `value`, then invoke every subscriber present at the start of
    /// the round, in subscription order, with the new value.
    fn replace(&self, value: T) {
        *lock(&self.value) = value.clone();
        let round: Vec<Callback<T>> = lock(&self.subscribers)
            .iter()
            .map(|s| Arc::clone(&s.callback))
            .collect();
        for callback in round {
            callback(&value);
        }
    }

    /// Invoke `callback` with the current value, then append it.
    fn subscribe(core: &Arc<Self>, callback: Callback<T>) -> Subscription
    where
        T: Send + 'static,
    {
        let current = core.get();
        callback(&current);

        let id = core.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&core.subscribers).push(Subscriber { id, callback });

        let core = Arc::downgrade(core);
        Subscription {
            cancel: Box::new(move || {
                if let Some(core) = core.upgrade() {
                    let mut subscribers = lock(&core.subscribers);
                    if let Some(pos) = subscribers.iter().position(|s| s.id == id) {
                        subscribers.remove(pos);
                    }
                }
            }),
        }
    }
}

// ── Subscription handle ─────────────────────────────────────────────

/// Handle returned by `subscribe`, used to detach that one callback.
///
/// Dropping the handle does NOT detach: a consumer that subscribes and
/// discards the handle keeps receiving notifications for the lifetime of
/// the cell. Removal is identity-based — subscribing the same closure twice
/// yields two handles, and each unsubscribe removes exactly one occurrence.
pub struct Subscription {
    cancel: Box<dyn FnOnce() + Send>,
}

impl Subscription {
    /// Remove the associated callback. Other subscribers are unaffected.
    pub fn unsubscribe(self) {
        (self.cancel)();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ── Read-only cell ──────────────────────────────────────────────────

/// Observable cell mutated only by the client itself.
pub struct ReadCell<T> {
    core: Arc<Core<T>>,
}

impl<T: Clone + Send + Sync + 'static> ReadCell<T> {
    pub(crate) fn new(initial: T) -> Self {
        Self {
            core: Arc::new(Core::new(initial)),
        }
    }

    /// Current value, without side effects.
    pub fn get(&self) -> T {
        self.core.get()
    }

    /// Register `callback`. It is invoked immediately with the current
    /// value — even if no mutation ever occurs — and then once per
    /// subsequent replacement.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        Core::subscribe(&self.core, Arc::new(callback))
    }

    /// Server-authoritative replacement: store and notify unconditionally.
    pub(crate) fn replace(&self, value: T) {
        self.core.replace(value);
    }
}

impl<T> Clone for ReadCell<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for ReadCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadCell").field("value", &self.core.get()).finish()
    }
}

// ── Writable cell ───────────────────────────────────────────────────

/// Observable cell the consumer may also write to, subject to a
/// [`WritePolicy`].
pub struct WriteCell<T> {
    core: Arc<Core<T>>,
    policy: Option<Arc<dyn WritePolicy<T>>>,
}

impl<T: Clone + Send + Sync + 'static> WriteCell<T> {
    #[cfg(test)]
    pub(crate) fn new(initial: T) -> Self {
        Self {
            core: Arc::new(Core::new(initial)),
            policy: None,
        }
    }

    pub(crate) fn with_policy(initial: T, policy: Arc<dyn WritePolicy<T>>) -> Self {
        Self {
            core: Arc::new(Core::new(initial)),
            policy: Some(policy),
        }
    }

    /// Current value, without side effects.
    pub fn get(&self) -> T {
        self.core.get()
    }

    /// Register `callback`; same contract as [`ReadCell::subscribe`].
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        Core::subscribe(&self.core, Arc::new(callback))
    }

    /// Propose a replacement value.
    ///
    /// The policy sees `(candidate, current)` and may veto the write, in
    /// which case nothing is stored and nobody is notified. An accepted
    /// write stores and notifies like a server replacement — note that a
    /// later server push can still overwrite it, so subscribers may
    /// transiently observe a locally written value that the server never
    /// accepted.
    pub fn write(&self, value: T) {
        if let Some(policy) = &self.policy {
            let current = self.core.get();
            if !policy.allow(&value, &current) {
                tracing::debug!("cell write vetoed by policy");
                return;
            }
        }
        self.core.replace(value);
    }

    /// Server-authoritative replacement: bypasses the policy entirely.
    pub(crate) fn replace(&self, value: T) {
        self.core.replace(value);
    }
}

impl<T> Clone for WriteCell<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
            policy: self.policy.clone(),
        }
    }
}

impl<T: Clone + std::fmt::Debug> std::fmt::Debug for WriteCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteCell")
            .field("value", &self.core.get())
            .field("guarded", &self.policy.is_some())
            .finish()
    }
}

// ── Tests ───────────────────────────────────────────────────────────
