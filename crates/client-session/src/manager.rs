//! Session lifecycle: restore on start, log in, log out and expire.
//!
//! [`SessionManager`] owns the authenticated flag. The flag changes only
//! through [`SessionManager::initialize`], [`SessionManager::login`],
//! [`SessionManager::logout`] and the expiry task, and every change is
//! broadcast on a [`watch`] channel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::store::SessionStore;

/// Store key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Store key holding the expiry instant in milliseconds since the epoch.
pub const EXPIRY_KEY: &str = "tokenExpiry";

/// Tunables for [`SessionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Lifetime granted by [`SessionManager::login`].
    pub session_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_duration: Duration::from_secs(60 * 60),
        }
    }
}

#[derive(Debug)]
struct PendingExpiry {
    generation: u64,
    delay: Duration,
    cancel: CancellationToken,
}

#[derive(Debug, Default)]
struct ExpiryState {
    generation: u64,
    pending: Option<PendingExpiry>,
}

impl ExpiryState {
    /// Invalidate the current task and return its token for cancelling.
    fn supersede(&mut self) -> Option<CancellationToken> {
        self.generation = self.generation.wrapping_add(1);
        self.pending.take().map(|pending| pending.cancel)
    }
}

struct Inner {
    clock: Arc<dyn Clock>,
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
    expiry: Mutex<ExpiryState>,
    authenticated: watch::Sender<bool>,
}

/// Client-side session state shared by clones.
///
/// At most one expiry task is live per manager. Scheduling a new one, or
/// logging out, cancels the previous task; a task that fires after being
/// superseded does nothing.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Manager over `store`, reading time from `clock`. Starts logged out.
    pub fn new(
        clock: Arc<dyn Clock>,
        store: Arc<dyn SessionStore>,
        config: SessionConfig,
    ) -> Self {
        let (authenticated, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                clock,
                store,
                config,
                expiry: Mutex::new(ExpiryState::default()),
                authenticated,
            }),
        }
    }

    /// Restore a persisted session.
    ///
    /// A live session marks the manager authenticated and schedules expiry
    /// for the remaining lifetime. An expired one is logged out. A missing,
    /// partial or unreadable pair leaves the manager logged out.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoRuntime`] when a live session is found
    /// outside a Tokio runtime, and [`SessionError::Store`] when clearing an
    /// expired session fails.
    pub fn initialize(&self) -> Result<(), SessionError> {
        let mut state = self.expiry_state();
        let Some(expires_at) = self.persisted_expiry() else {
            debug!("no persisted session");
            return Ok(());
        };
        let now = self.inner.clock.utc();
        match (expires_at - now).to_std() {
            Ok(remaining) if !remaining.is_zero() => {
                let handle = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
                self.spawn_expiry(&mut state, &handle, remaining);
                self.set_authenticated(true);
                info!(expires_at = %expires_at, "restored persisted session");
                Ok(())
            }
            _ => {
                info!(expires_at = %expires_at, "persisted session already expired");
                self.clear(&mut state)
            }
        }
    }

    /// Start a session for `token` lasting the configured duration.
    ///
    /// # Errors
    ///
    /// See [`SessionManager::login_with_ttl`].
    pub fn login(&self, token: &str) -> Result<(), SessionError> {
        self.login_with_ttl(token, self.inner.config.session_duration)
    }

    /// Start a session for `token` lasting `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoRuntime`] outside a Tokio runtime,
    /// [`SessionError::LifetimeOutOfRange`] for an unrepresentable `ttl`
    /// and [`SessionError::Store`] when the pair cannot be persisted. The
    /// manager and the persisted pair are left unchanged on error.
    pub fn login_with_ttl(&self, token: &str, ttl: Duration) -> Result<(), SessionError> {
        let handle = Handle::try_current().map_err(|_| SessionError::NoRuntime)?;
        let lifetime = TimeDelta::from_std(ttl).map_err(|_| SessionError::LifetimeOutOfRange)?;
        let expires_at = self
            .inner
            .clock
            .utc()
            .checked_add_signed(lifetime)
            .ok_or(SessionError::LifetimeOutOfRange)?;

        let mut state = self.expiry_state();
        self.persist(token, expires_at)?;
        self.spawn_expiry(&mut state, &handle, ttl);
        self.set_authenticated(true);
        info!(expires_at = %expires_at, "session started");
        Ok(())
    }

    /// End the session: clear the persisted pair, drop the flag and cancel
    /// any pending expiry. Calling it again has no further effect.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] when a key cannot be removed. The
    /// manager is logged out regardless.
    pub fn logout(&self) -> Result<(), SessionError> {
        let mut state = self.expiry_state();
        self.clear(&mut state)
    }

    /// Whether a session is live.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        *self.inner.authenticated.borrow()
    }

    /// Receiver observing the authenticated flag.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.authenticated.subscribe()
    }

    /// Delay the current expiry task was scheduled with.
    #[must_use]
    pub fn pending_expiry(&self) -> Option<Duration> {
        self.expiry_state()
            .pending
            .as_ref()
            .map(|pending| pending.delay)
    }

    /// Persisted token of the live session.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        if !self.is_authenticated() {
            return None;
        }
        self.read(TOKEN_KEY)
    }

    /// Write the pair, restoring the previous token if the expiry write
    /// fails so the store never mixes two sessions.
    fn persist(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), SessionError> {
        let store = &self.inner.store;
        let previous_token = self.read(TOKEN_KEY);
        store.set(TOKEN_KEY, token)?;
        if let Err(err) = store.set(EXPIRY_KEY, &expires_at.timestamp_millis().to_string()) {
            let restored = match previous_token.as_deref() {
                Some(previous) => store.set(TOKEN_KEY, previous),
                None => store.remove(TOKEN_KEY),
            };
            if let Err(restore_err) = restored {
                warn!(error = %restore_err, "failed to restore previous session token");
            }
            return Err(err.into());
        }
        Ok(())
    }

    /// Log out while the caller holds the expiry lock.
    fn clear(&self, state: &mut ExpiryState) -> Result<(), SessionError> {
        if let Some(cancel) = state.supersede() {
            cancel.cancel();
        }
        self.set_authenticated(false);

        let store = &self.inner.store;
        let token_removed = store.remove(TOKEN_KEY);
        let expiry_removed = store.remove(EXPIRY_KEY);
        token_removed?;
        expiry_removed?;
        debug!("session cleared");
        Ok(())
    }

    fn spawn_expiry(&self, state: &mut ExpiryState, handle: &Handle, delay: Duration) {
        if let Some(previous) = state.supersede() {
            previous.cancel();
        }
        let cancel = CancellationToken::new();
        let generation = state.generation;
        state.pending = Some(PendingExpiry {
            generation,
            delay,
            cancel: cancel.clone(),
        });

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        handle.spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    if let Some(inner) = weak.upgrade() {
                        Self { inner }.expire(generation);
                    }
                }
            }
        });
    }

    /// Log out if `generation` still names the pending expiry. The check and
    /// the logout run under one hold of the expiry lock.
    fn expire(&self, generation: u64) {
        let mut state = self.expiry_state();
        let current = state
            .pending
            .as_ref()
            .is_some_and(|pending| pending.generation == generation);
        if !current {
            debug!(generation, "ignoring superseded session expiry");
            return;
        }
        info!("session expired");
        if let Err(err) = self.clear(&mut state) {
            warn!(error = %err, "failed to clear expired session");
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        self.inner
            .store
            .get(key)
            .inspect_err(|err| warn!(error = %err, key, "failed to read session store"))
            .ok()
            .flatten()
    }

    /// Expiry instant of a complete, well-formed persisted pair.
    fn persisted_expiry(&self) -> Option<DateTime<Utc>> {
        self.read(TOKEN_KEY)?;
        let raw = self.read(EXPIRY_KEY)?;
        let parsed = raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis);
        if parsed.is_none() {
            warn!(value = %raw, "ignoring malformed session expiry");
        }
        parsed
    }

    fn set_authenticated(&self, value: bool) {
        self.inner.authenticated.send_if_modified(|current| {
            let changed = *current != value;
            *current = value;
            changed
        });
    }

    fn expiry_state(&self) -> MutexGuard<'_, ExpiryState> {
        self.inner
            .expiry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
