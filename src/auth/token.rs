//! Bearer token decoding, expiry checks and the live token slot.
//!
//! DESIGN
//! ======
//! Expiry is derived from the decoded `exp` claim on every check rather than
//! from a timer, so the answer always matches what a fresh decode would say.
//! Anything that cannot be decoded into the required claims (`sub`, `email`,
//! `exp`) counts as expired.
//!
//! The token is not verified here; the backend remains the authority on
//! whether it is genuine.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use std::rc::Rc;

use base64::Engine;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::net::types::User;
use crate::state::observable::{Observable, Subscription};
use crate::storage::KeyValueStore;
use crate::storage::credentials::TOKEN_KEY;

/// JWT payloads are unpadded base64url, but some issuers pad anyway.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims decoded from a token payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Claims {
    pub subject_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub picture_url: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub scopes: Vec<String>,
}

impl Claims {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Build a session user when no cached profile exists.
    pub fn to_user(&self) -> User {
        User {
            id: self.subject_id.clone(),
            email: self.email.clone(),
            username: self.display_name.clone().unwrap_or_else(|| self.email.clone()),
            display_name: self.display_name.clone(),
            picture_url: self.picture_url.clone(),
        }
    }
}

#[derive(Deserialize)]
struct RawClaims {
    sub: Option<serde_json::Value>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    iat: Option<serde_json::Number>,
    exp: Option<serde_json::Number>,
    scope: Option<serde_json::Value>,
}

/// Decode the payload segment of `token`.
///
/// Returns `None` for a wrong segment count, invalid base64url, invalid JSON,
/// or a payload missing `sub`, `email` or `exp`.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return None;
    };

    let bytes = PAYLOAD_ENGINE.decode(payload).ok()?;
    let raw: RawClaims = serde_json::from_slice(&bytes).ok()?;

    let subject_id = match raw.sub? {
        serde_json::Value::String(s) if !s.is_empty() => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let email = raw.email.filter(|e| !e.is_empty())?;
    let expires_at = timestamp_from_number(&raw.exp?)?;
    let issued_at = raw.iat.as_ref().and_then(timestamp_from_number);
    let scopes = match raw.scope {
        Some(serde_json::Value::String(s)) => s.split_whitespace().map(str::to_owned).collect(),
        Some(serde_json::Value::Array(items)) => {
            items.into_iter().filter_map(|v| v.as_str().map(str::to_owned)).collect()
        }
        _ => Vec::new(),
    };

    Some(Claims {
        subject_id,
        email,
        display_name: raw.name.filter(|n| !n.is_empty()),
        picture_url: raw.picture,
        issued_at,
        expires_at,
        scopes,
    })
}

#[allow(clippy::cast_possible_truncation)]
fn timestamp_from_number(n: &serde_json::Number) -> Option<DateTime<Utc>> {
    let secs = match n.as_i64() {
        Some(secs) => secs,
        None => {
            let float = n.as_f64().filter(|f| f.is_finite())?;
            float.floor() as i64
        }
    };
    DateTime::from_timestamp(secs, 0)
}

/// Owner of the live bearer token.
///
/// Writes go to durable storage under the same key the credential store uses,
/// so both views of "the token" agree after a reload.
#[derive(Clone)]
pub struct TokenService {
    storage: Rc<dyn KeyValueStore>,
    slot: Observable<Option<String>>,
}

impl TokenService {
    /// Seed the live slot from durable storage.
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        let initial = match storage.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("token service: could not read stored token: {e}");
                None
            }
        };
        Self { storage, slot: Observable::new(initial) }
    }

    pub fn set_token(&self, token: &str) {
        if let Err(e) = self.storage.set_item(TOKEN_KEY, token) {
            log::error!("token service: could not persist token: {e}");
        }
        self.slot.set(Some(token.to_owned()));
    }

    /// Replace the live token without touching durable storage.
    pub fn hold_in_memory(&self, token: &str) {
        self.slot.set(Some(token.to_owned()));
    }

    pub fn token(&self) -> Option<String> {
        self.slot.get()
    }

    /// Observe the live slot; fires immediately with the current token.
    pub fn subscribe(&self, callback: impl Fn(&Option<String>) + 'static) -> Subscription {
        self.slot.subscribe(callback)
    }

    pub fn decode(&self, token: &str) -> Option<Claims> {
        decode_claims(token)
    }

    /// Claims of the live token, if it decodes.
    pub fn current_claims(&self) -> Option<Claims> {
        self.slot.with(|token| token.as_deref().and_then(decode_claims))
    }

    /// True when the live token is missing, undecodable or past `exp`.
    pub fn is_expired(&self) -> bool {
        self.current_claims().map_or(true, |claims| claims.is_expired_at(Utc::now()))
    }

    /// Same rule as [`Self::is_expired`] for an arbitrary token.
    pub fn is_token_expired(&self, token: &str) -> bool {
        decode_claims(token).map_or(true, |claims| claims.is_expired_at(Utc::now()))
    }

    /// `"Bearer {token}"` for the live token.
    pub fn authorization_header_value(&self) -> Option<String> {
        self.token().map(|token| format!("Bearer {token}"))
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove_item(TOKEN_KEY) {
            log::warn!("token service: could not remove stored token: {e}");
        }
        self.slot.set(None);
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("has_token", &self.slot.with(Option::is_some)).finish()
    }
}
