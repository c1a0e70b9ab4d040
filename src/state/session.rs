//! Authoritative authentication state for the running app.
//!
//! SYSTEM CONTEXT
//! ==============
//! Constructed once by `Services` and shared by handle. Pages and the route
//! guard read it; the auth interceptor drives `force_logout` through a weak
//! handle. The Leptos `RwSignal<SessionState>` in the app shell mirrors the
//! observable published here.
//!
//! DESIGN
//! ======
//! Three reachable states: unauthenticated, resolving (startup only) and
//! authenticated. `SessionState` fields are private so an authenticated state
//! without a user cannot be built.
//!
//! Every logout bumps a generation counter. A login response that arrives
//! after the counter moved is discarded, so a logout issued while a login is
//! in flight always wins.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures are swallowed below this layer. Gateway errors from
//! login and registration are returned to the caller unchanged after the
//! loading flag is reset.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::Cell;
use std::rc::{Rc, Weak};

use super::observable::{Observable, Subscription};
use crate::auth::token::{TokenService, decode_claims};
use crate::net::api::AuthApi;
use crate::net::error::ApiError;
use crate::net::types::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::storage::credentials::{CredentialStore, DEFAULT_TOKEN_TYPE};
use crate::util::navigation::{HOME_PATH, LOGIN_PATH, Navigator};

/// Snapshot of the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    user: Option<User>,
    is_loading: bool,
}

impl SessionState {
    pub fn unauthenticated() -> Self {
        Self { user: None, is_loading: false }
    }

    /// Startup resolution in progress.
    pub fn resolving() -> Self {
        Self { user: None, is_loading: true }
    }

    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user), is_loading: false }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Same state with the loading flag replaced.
    #[must_use]
    pub fn with_loading(mut self, is_loading: bool) -> Self {
        self.is_loading = is_loading;
        self
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::unauthenticated()
    }
}

struct SessionInner {
    state: Observable<SessionState>,
    credentials: CredentialStore,
    tokens: TokenService,
    api: AuthApi,
    navigator: Rc<dyn Navigator>,
    generation: Cell<u64>,
}

/// Shared session manager handle.
#[derive(Clone)]
pub struct SessionManager {
    inner: Rc<SessionInner>,
}

/// Non-owning handle used by the gateway's interceptor.
#[derive(Clone)]
pub struct WeakSession {
    inner: Weak<SessionInner>,
}

impl WeakSession {
    pub fn upgrade(&self) -> Option<SessionManager> {
        self.inner.upgrade().map(|inner| SessionManager { inner })
    }
}

impl SessionManager {
    /// Starts in the resolving state; call [`Self::initialize`] once.
    pub fn new(credentials: CredentialStore, tokens: TokenService, api: AuthApi, navigator: Rc<dyn Navigator>) -> Self {
        Self {
            inner: Rc::new(SessionInner {
                state: Observable::new(SessionState::resolving()),
                credentials,
                tokens,
                api,
                navigator,
                generation: Cell::new(0),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakSession {
        WeakSession { inner: Rc::downgrade(&self.inner) }
    }

    // =========================================================================
    // READ SURFACE
    // =========================================================================

    pub fn state(&self) -> SessionState {
        self.inner.state.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.with(SessionState::is_authenticated)
    }

    pub fn current_user(&self) -> Option<User> {
        self.inner.state.with(|s| s.user.clone())
    }

    /// Fires immediately with the current state, then on every transition.
    pub fn subscribe(&self, callback: impl Fn(&SessionState) + 'static) -> Subscription {
        self.inner.state.subscribe(callback)
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Resolve the stored session.
    pub fn initialize(&self) {
        self.publish(SessionState::resolving());
        let resolved = self.resolve_stored_session();
        let authenticated = resolved.is_authenticated();
        self.publish(resolved);
        if authenticated && self.inner.navigator.current_path() == LOGIN_PATH {
            self.inner.navigator.navigate(HOME_PATH);
        }
    }

    fn resolve_stored_session(&self) -> SessionState {
        let inner = &self.inner;
        if let Some(token) = inner.credentials.token() {
            if inner.tokens.is_token_expired(&token) {
                log::info!("session: stored token expired or unreadable, clearing credentials");
                self.clear_local();
                return SessionState::unauthenticated();
            }
            let user = inner.credentials.user().or_else(|| decode_claims(&token).map(|c| c.to_user()));
            return match user {
                Some(user) => {
                    log::debug!("session: restored stored session for {}", user.id);
                    SessionState::authenticated(user)
                }
                None => {
                    log::warn!("session: stored token has no usable user, clearing credentials");
                    self.clear_local();
                    SessionState::unauthenticated()
                }
            };
        }

        if let Some(token) = inner.tokens.token() {
            match decode_claims(&token) {
                Some(claims) if !claims.is_expired_at(chrono::Utc::now()) => {
                    log::debug!("session: restored session from token claims for {}", claims.subject_id);
                    return SessionState::authenticated(claims.to_user());
                }
                _ => {
                    log::info!("session: live token expired or unreadable, clearing it");
                    inner.tokens.clear();
                }
            }
        }
        SessionState::unauthenticated()
    }

    /// Exchange credentials for a session.
    ///
    /// A success payload missing the token or user leaves the session
    /// unauthenticated and is still returned as `Ok`. When storage rejects the
    /// credential pair, the token lives only in memory and nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unchanged.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        let generation = self.inner.generation.get();
        self.inner.state.update(|s| s.is_loading = true);

        let result = self.inner.api.login(&request).await;

        if self.inner.generation.get() != generation {
            log::debug!("session: discarding login response that arrived after logout");
            return result;
        }

        match result {
            Ok(response) => {
                let token = response.access_token.as_deref().filter(|t| !t.is_empty());
                match (token, response.user.as_ref()) {
                    (Some(token), Some(user)) => {
                        let token_type =
                            response.token_type.as_deref().filter(|t| !t.is_empty()).unwrap_or(DEFAULT_TOKEN_TYPE);
                        if self.inner.credentials.set_credential(token, token_type, user) {
                            self.inner.tokens.set_token(token);
                        } else {
                            log::warn!("session: credentials not persisted, session lasts until reload");
                            self.inner.tokens.hold_in_memory(token);
                        }
                        log::info!("session: logged in as {}", user.id);
                        self.publish(SessionState::authenticated(user.clone()));
                        self.inner.navigator.navigate(HOME_PATH);
                    }
                    _ => {
                        log::warn!("session: login response is missing the token or user");
                        self.publish(SessionState::unauthenticated());
                    }
                }
                Ok(response)
            }
            Err(e) => {
                self.inner.state.update(|s| s.is_loading = false);
                Err(e)
            }
        }
    }

    /// Create an account. Never authenticates.
    ///
    /// # Errors
    ///
    /// Returns the gateway error unchanged.
    pub async fn register(&self, request: RegisterRequest) -> Result<serde_json::Value, ApiError> {
        self.inner.state.update(|s| s.is_loading = true);
        let result = self.inner.api.register(&request).await;
        self.inner.state.update(|s| s.is_loading = false);
        result
    }

    /// Clear local credentials and return to the login view. Idempotent.
    pub fn logout(&self) {
        self.inner.generation.set(self.inner.generation.get() + 1);
        self.clear_local();
        self.publish(SessionState::unauthenticated());
        if self.inner.navigator.current_path() != LOGIN_PATH {
            self.inner.navigator.navigate(LOGIN_PATH);
        }
    }

    /// Logout triggered by a rejected credential.
    pub fn force_logout(&self) {
        log::warn!("session: credential rejected by server, logging out");
        self.logout();
    }

    /// Tell the backend, ignore its answer, then log out locally.
    pub async fn sign_out(&self) {
        if let Err(e) = self.inner.api.logout().await {
            log::debug!("session: server logout failed ({}), continuing locally", e.kind);
        }
        self.logout();
    }

    fn clear_local(&self) {
        self.inner.credentials.clear_all();
        self.inner.tokens.clear();
    }

    fn publish(&self, state: SessionState) {
        log::debug!(
            "session: authenticated={} loading={}",
            state.is_authenticated(),
            state.is_loading()
        );
        self.inner.state.set(state);
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").field("state", &self.state()).finish()
    }
}
