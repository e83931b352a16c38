//! The session manager
//!
//! One instance per application, layered over the shared [`ApiClient`] and
//! an [`AuthGateway`]. The invariant it maintains: the client either has a
//! bearer token, a current user, and a scheduled refresh, or none of the
//! three, and every transition out of the authenticated state also clears
//! the response cache so no data from the old session can leak into the
//! next one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use fleetline_common::storage::KeyValueStore;
use fleetline_common::time::{Clock, SystemClock};
use fleetline_core::AuthGateway;
use fleetline_domain::constants::{
    REFRESH_FLOOR_SECS, REFRESH_LEAD_SECS, STORAGE_ACCESS_TOKEN, STORAGE_REFRESH_TOKEN,
    STORAGE_USER,
};
use fleetline_domain::{
    ApiError, AuthReply, Credentials, LoginOutcome, StoredSession, TokenGrant, UserAccount,
};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::ApiClient;

/// Callback invoked whenever the session state changes. Receives the new
/// current user, or `None` after logout.
pub type SessionListener = Arc<dyn Fn(Option<UserAccount>) + Send + Sync>;

/// Manages the authenticated session behind the shared API client.
///
/// Constructed via [`SessionManager::new`], which returns an `Arc` because
/// the scheduled refresh task holds a weak reference back to the manager.
pub struct SessionManager<C = SystemClock>
where
    C: Clock + Clone,
{
    api: Arc<ApiClient<C>>,
    gateway: Arc<dyn AuthGateway>,
    storage: Arc<dyn KeyValueStore>,
    session: RwLock<Option<StoredSession>>,
    listeners: Mutex<Vec<(u64, SessionListener)>>,
    next_listener_id: AtomicU64,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    weak_self: Weak<Self>,
}

impl<C> SessionManager<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(
        api: Arc<ApiClient<C>>,
        gateway: Arc<dyn AuthGateway>,
        storage: Arc<dyn KeyValueStore>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            api,
            gateway,
            storage,
            session: RwLock::new(None),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(0),
            refresh_task: Mutex::new(None),
            weak_self: weak_self.clone(),
        })
    }

    /// Whether a session is currently established.
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    /// The currently authenticated user, if any.
    pub fn current_user(&self) -> Option<UserAccount> {
        self.session.read().as_ref().map(|session| session.user.clone())
    }

    /// Register a listener for session changes. Returns an id for
    /// [`SessionManager::unsubscribe`].
    pub fn subscribe(&self, listener: SessionListener) -> u64 {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, listener));
        id
    }

    /// Remove a previously registered listener.
    pub fn unsubscribe(&self, id: u64) {
        self.listeners.lock().retain(|(listener_id, _)| *listener_id != id);
    }

    /// Submit credentials.
    ///
    /// A verification challenge is a normal outcome: the session stays
    /// anonymous and the caller should prompt for the emailed code.
    ///
    /// # Errors
    /// Propagates the gateway's [`ApiError`]; the session is untouched on
    /// failure.
    pub async fn login(
        &self,
        credentials: &Credentials,
    ) -> Result<LoginOutcome, ApiError> {
        match self.gateway.login(credentials).await? {
            AuthReply::Granted(grant) => {
                let user = grant.user.clone();
                self.establish(grant).await;
                Ok(LoginOutcome::Authenticated(user))
            }
            AuthReply::VerificationRequired { email } => {
                debug!(email = %email, "login requires verification code");
                Ok(LoginOutcome::VerificationRequired { email })
            }
        }
    }

    /// Complete a verification challenge with the emailed code.
    ///
    /// # Errors
    /// Propagates the gateway's [`ApiError`].
    pub async fn verify_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<LoginOutcome, ApiError> {
        match self.gateway.verify_code(email, code).await? {
            AuthReply::Granted(grant) => {
                let user = grant.user.clone();
                self.establish(grant).await;
                Ok(LoginOutcome::Authenticated(user))
            }
            AuthReply::VerificationRequired { email } => {
                Ok(LoginOutcome::VerificationRequired { email })
            }
        }
    }

    /// Restore a persisted session without a network round trip.
    ///
    /// Optimistic: the stored token is installed immediately so the UI can
    /// render; callers wanting certainty follow up with
    /// [`SessionManager::verify_session`]. Storage failures are logged and
    /// read as "no stored session".
    pub async fn rehydrate(&self) -> Option<UserAccount> {
        let raw = match self.storage.get(STORAGE_USER).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "failed to read stored session");
                return None;
            }
        };
        let session: StoredSession = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "stored session is unreadable, discarding");
                self.clear_persisted().await;
                return None;
            }
        };

        info!(user = %session.user.email, "restored persisted session");
        self.api.set_token(&session.access_token);
        let user = session.user.clone();
        *self.session.write() = Some(session);
        self.schedule_refresh();
        self.notify();
        Some(user)
    }

    /// Confirm the current token against the backend.
    ///
    /// Returns `Ok(true)` when the token holds, refreshing the stored
    /// account from the server's answer. An auth rejection tears the
    /// session down locally and returns `Ok(false)`.
    ///
    /// # Errors
    /// Non-auth failures (network, 5xx) propagate and leave the session in
    /// place; an unreachable backend is not evidence the token is bad.
    pub async fn verify_session(&self) -> Result<bool, ApiError> {
        if !self.is_authenticated() {
            return Ok(false);
        }
        match self.gateway.me().await {
            Ok(user) => {
                if let Some(session) = self.session.write().as_mut() {
                    session.user = user;
                }
                self.notify();
                Ok(true)
            }
            Err(err) if err.is_auth() => {
                info!("stored session rejected by backend, logging out");
                self.teardown().await;
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// End the session.
    ///
    /// The server-side logout is best effort; local teardown always runs,
    /// clearing the token, the persisted session, and the response cache.
    pub async fn logout(&self) {
        if self.is_authenticated() {
            if let Err(err) = self.gateway.logout().await {
                warn!(error = %err, "server-side logout failed, continuing locally");
            }
        }
        self.teardown().await;
    }

    /// Stop background work. Call before dropping the last handle.
    pub fn shutdown(&self) {
        if let Some(task) = self.refresh_task.lock().take() {
            task.abort();
        }
    }

    async fn establish(&self, grant: TokenGrant) {
        let session = StoredSession {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            user: grant.user,
            issued_at: Utc::now(),
            expires_in_secs: grant.expires_in_secs,
        };

        self.api.set_token(&session.access_token);
        self.persist(&session).await;
        info!(user = %session.user.email, "session established");
        *self.session.write() = Some(session);
        self.schedule_refresh();
        self.notify();
    }

    /// Write the session to durable storage. Failures are logged; the
    /// in-memory session stands either way.
    async fn persist(&self, session: &StoredSession) {
        match serde_json::to_string(session) {
            Ok(json) => {
                if let Err(err) = self.storage.set(STORAGE_USER, &json).await {
                    warn!(error = %err, "failed to persist session");
                }
            }
            Err(err) => warn!(error = %err, "failed to encode session"),
        }
        // Tokens are mirrored under their own keys for external tooling.
        if let Err(err) = self.storage.set(STORAGE_ACCESS_TOKEN, &session.access_token).await {
            warn!(error = %err, "failed to persist access token");
        }
        let refresh_result = match &session.refresh_token {
            Some(token) => self.storage.set(STORAGE_REFRESH_TOKEN, token).await,
            None => self.storage.remove(STORAGE_REFRESH_TOKEN).await,
        };
        if let Err(err) = refresh_result {
            warn!(error = %err, "failed to persist refresh token");
        }
    }

    async fn clear_persisted(&self) {
        for key in [STORAGE_USER, STORAGE_ACCESS_TOKEN, STORAGE_REFRESH_TOKEN] {
            if let Err(err) = self.storage.remove(key).await {
                warn!(key, error = %err, "failed to clear stored session key");
            }
        }
    }

    async fn teardown(&self) {
        self.shutdown();
        *self.session.write() = None;
        self.api.clear_token();
        self.clear_persisted().await;
        self.api.invalidate(None);
        self.notify();
    }

    /// Schedule a token refresh ahead of expiry.
    ///
    /// No-op when the token lifetime is unknown. The task holds a weak
    /// reference, so dropping the manager cancels the schedule implicitly.
    fn schedule_refresh(&self) {
        self.shutdown();

        let Some(wait) = self.refresh_wait() else {
            debug!("token lifetime unknown, refresh not scheduled");
            return;
        };

        let manager = self.weak_self.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            if let Some(manager) = Weak::upgrade(&manager) {
                manager.refresh_now().await;
            }
        });
        debug!(wait_secs = wait.as_secs(), "token refresh scheduled");
        *self.refresh_task.lock() = Some(task);
    }

    fn refresh_wait(&self) -> Option<Duration> {
        let session = self.session.read();
        let remaining = session.as_ref()?.seconds_until_expiry(Utc::now())?;
        let wait = remaining.saturating_sub(REFRESH_LEAD_SECS).max(REFRESH_FLOOR_SECS);
        Some(Duration::from_secs(wait))
    }

    async fn refresh_now(&self) {
        let Some(refresh_token) =
            self.session.read().as_ref().and_then(|session| session.refresh_token.clone())
        else {
            debug!("no refresh token, session will expire naturally");
            return;
        };

        match self.gateway.refresh(&refresh_token).await {
            Ok(AuthReply::Granted(grant)) => {
                debug!("access token refreshed");
                self.establish(grant).await;
            }
            Ok(AuthReply::VerificationRequired { .. }) => {
                warn!("refresh answered with a verification challenge, logging out");
                self.teardown().await;
            }
            Err(err) if err.is_auth() => {
                info!("refresh token rejected, logging out");
                self.teardown().await;
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, will retry");
                self.schedule_retry();
            }
        }
    }

    fn schedule_retry(&self) {
        let manager = self.weak_self.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(REFRESH_FLOOR_SECS)).await;
            if let Some(manager) = Weak::upgrade(&manager) {
                manager.refresh_now().await;
            }
        });
        *self.refresh_task.lock() = Some(task);
    }

    fn notify(&self) {
        let user = self.current_user();
        let listeners: Vec<SessionListener> =
            self.listeners.lock().iter().map(|(_, listener)| Arc::clone(listener)).collect();
        for listener in listeners {
            listener(user.clone());
        }
    }
}

impl<C> Drop for SessionManager<C>
where
    C: Clock + Clone,
{
    fn drop(&mut self) {
        if let Some(task) = self.refresh_task.lock().take() {
            task.abort();
        }
    }
}
