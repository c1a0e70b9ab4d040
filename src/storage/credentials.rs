//! Persistent credential store: token, token type and cached user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Written by the session manager after a successful login and read by the
//! HTTP gateway for every outbound request. All three keys move together: a
//! completed write never leaves a token without a user or the reverse.

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use std::rc::Rc;

use super::{KeyValueStore, StorageError};
use crate::net::types::User;

pub const TOKEN_KEY: &str = "access_token";
pub const TOKEN_TYPE_KEY: &str = "token_type";
pub const USER_KEY: &str = "user_data";
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Handle onto the durable credential keys. Clones share the backend.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Rc<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Persist a token/user pair.
    ///
    /// The user is serialized before anything is written. If any write fails,
    /// keys already written by this call are removed again. Failures are
    /// logged; the return value reports whether the pair was saved.
    pub fn set_credential(&self, token: &str, token_type: &str, user: &User) -> bool {
        match self.try_set_credential(token, token_type, user) {
            Ok(()) => true,
            Err(e) => {
                log::error!("credential store: write failed, credentials not saved: {e}");
                false
            }
        }
    }

    fn try_set_credential(&self, token: &str, token_type: &str, user: &User) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user).map_err(|e| StorageError::Serialize(e.to_string()))?;
        let writes = [(TOKEN_KEY, token), (TOKEN_TYPE_KEY, token_type), (USER_KEY, user_json.as_str())];

        for (written, (key, value)) in writes.iter().enumerate() {
            if let Err(e) = self.storage.set_item(key, value) {
                for (rollback_key, _) in &writes[..written] {
                    if let Err(rollback) = self.storage.remove_item(rollback_key) {
                        log::error!("credential store: rollback of {rollback_key} failed, store is half-written: {rollback}");
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Stored token type, `"Bearer"` when unset.
    pub fn token_type(&self) -> String {
        self.read(TOKEN_TYPE_KEY)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_owned())
    }

    /// Cached user; unreadable JSON reads as absent.
    pub fn user(&self) -> Option<User> {
        let raw = self.read(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("credential store: cached user is unreadable: {e}");
                None
            }
        }
    }

    /// True iff a token is stored. Expiry is not checked here.
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// `"{token_type} {token}"`, or `None` when no token is stored.
    pub fn authorization_header_value(&self) -> Option<String> {
        let token = self.token()?;
        Some(format!("{} {token}", self.token_type()))
    }

    /// Remove all credential keys. Safe to call repeatedly.
    pub fn clear_all(&self) {
        for key in [TOKEN_KEY, TOKEN_TYPE_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                log::warn!("credential store: failed to remove {key}: {e}");
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("credential store: failed to read {key}: {e}");
                None
            }
        }
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").field("logged_in", &self.is_logged_in()).finish()
    }
}
