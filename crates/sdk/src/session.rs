//! Authentication session persisted across restarts.
//!
//! A [`SessionStore`] is a cheap handle: clones share the same in-memory
//! session and storage backend, so the API client and every view controller
//! observe login, logout and profile updates as they happen.

use std::sync::Arc;

use greentick_types::{AUTH_TOKEN_KEY, CURRENT_USER_KEY, SignupRequest, TokenResponse, User};
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::{
    client::ApiClient,
    error::Result,
    storage::{KeyValueStore, MemoryStore},
};

/// Token and profile of the logged-in user
#[derive(Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    current: Arc<RwLock<Option<Session>>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl SessionStore {
    /// Create an empty store over `storage`. Call [`SessionStore::load`] to
    /// pick up a persisted session.
    pub fn new<S: KeyValueStore + 'static>(storage: S) -> Self {
        Self::from_shared(Arc::new(storage))
    }

    pub fn from_shared(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Session that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Read the persisted session.
    ///
    /// Never fails: a missing, unreadable or unparsable session is logged
    /// and treated as logged out.
    pub fn load(&self) -> Option<Session> {
        let session = match self.read_persisted() {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "Failed to load auth data from storage");
                None
            }
        };
        debug!(authenticated = session.is_some(), "Session loaded");
        *self.current.write() = session.clone();
        session
    }

    fn read_persisted(&self) -> Result<Option<Session>> {
        let token = self.storage.get(AUTH_TOKEN_KEY)?;
        let user = self.storage.get(CURRENT_USER_KEY)?;
        match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => {
                let user: User = serde_json::from_str(&user)?;
                Ok(Some(Session { token, user }))
            }
            _ => Ok(None),
        }
    }

    /// Log in with email and password and persist the resulting session.
    ///
    /// Backend errors are returned unchanged.
    pub async fn login(&self, api: &ApiClient, email: &str, password: &str) -> Result<Session> {
        let response = api.login(email, password).await.inspect_err(|e| {
            error!(email = %email, error = %e, "Login failed");
        })?;
        self.establish(api, response).await
    }

    /// Create an account and persist the resulting session.
    pub async fn signup(&self, api: &ApiClient, request: &SignupRequest) -> Result<Session> {
        let response = api.signup(request).await.inspect_err(|e| {
            error!(email = %request.email, error = %e, "Signup failed");
        })?;
        self.establish(api, response).await
    }

    /// Resolve the profile for a fresh token, then persist both.
    ///
    /// Nothing is stored unless both the profile and the persistence succeed.
    async fn establish(&self, api: &ApiClient, response: TokenResponse) -> Result<Session> {
        let user = match response.user {
            Some(user) => user,
            None => api.current_user_as(&response.access_token).await?,
        };
        let session = Session {
            token: response.access_token,
            user,
        };

        let user_json = serde_json::to_string(&session.user)?;
        self.storage.set(AUTH_TOKEN_KEY, &session.token)?;
        if let Err(e) = self.storage.set(CURRENT_USER_KEY, &user_json) {
            if let Err(cleanup) = self.storage.remove(AUTH_TOKEN_KEY) {
                warn!(error = %cleanup, "Failed to roll back stored token");
            }
            return Err(e.into());
        }

        *self.current.write() = Some(session.clone());
        info!(email = %session.user.email, "Logged in");
        Ok(session)
    }

    /// Forget the session in memory and in storage.
    ///
    /// Never fails: storage errors are logged and every key is still attempted.
    pub fn logout(&self) {
        *self.current.write() = None;
        for key in [CURRENT_USER_KEY, AUTH_TOKEN_KEY] {
            if let Err(e) = self.storage.remove(key) {
                error!(key = %key, error = %e, "Failed to remove auth data from storage");
            }
        }
        info!("Logged out");
    }

    /// Replace the stored profile. `None` is a no-op, as is an update while
    /// logged out.
    pub fn update(&self, user: Option<User>) {
        let Some(user) = user else {
            return;
        };

        {
            let mut current = self.current.write();
            match current.as_mut() {
                Some(session) => session.user = user.clone(),
                None => {
                    warn!("Ignoring profile update without an active session");
                    return;
                }
            }
        }

        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(e) = self.storage.set(CURRENT_USER_KEY, &json) {
                    error!(error = %e, "Failed to save updated user data to storage");
                }
            }
            Err(e) => error!(error = %e, "Failed to serialize updated user data"),
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.current.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.current.read().as_ref().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Greeting name of the current user, if logged in
    pub fn display_name(&self) -> Option<String> {
        self.current
            .read()
            .as_ref()
            .map(|s| s.user.display_name().to_string())
    }
}
