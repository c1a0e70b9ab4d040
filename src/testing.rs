//! Test doubles shared by unit tests across modules.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use futures::future::LocalBoxFuture;

use crate::net::transport::{HttpRequest, HttpResponse, Timer, Transport, TransportError};
use crate::net::types::User;
use crate::storage::{KeyValueStore, MemoryStorage, StorageError};
use crate::util::navigation::Navigator;

// =============================================================================
// TOKENS
// =============================================================================

/// Unsigned JWT-shaped token with the given payload.
pub fn make_jwt(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}

/// Token for `a@b.com` expiring an hour from now.
pub fn valid_jwt() -> String {
    let now = chrono::Utc::now().timestamp();
    make_jwt(&serde_json::json!({
        "sub": "42",
        "email": "a@b.com",
        "name": "Ada",
        "iat": now,
        "exp": now + 3600
    }))
}

/// Token for `a@b.com` that expired an hour ago.
pub fn expired_jwt() -> String {
    let now = chrono::Utc::now().timestamp();
    make_jwt(&serde_json::json!({
        "sub": "42",
        "email": "a@b.com",
        "iat": now - 7200,
        "exp": now - 3600
    }))
}

pub fn sample_user() -> User {
    User {
        id: "1".to_owned(),
        email: "a@b.com".to_owned(),
        username: "a".to_owned(),
        display_name: None,
        picture_url: None,
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Memory storage that rejects writes to selected keys, or everything.
#[derive(Clone, Default)]
pub struct FlakyStorage {
    pub inner: MemoryStorage,
    failing_keys: Rc<RefCell<HashSet<String>>>,
    fail_all: Rc<Cell<bool>>,
    fail_removes: Rc<Cell<bool>>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys.borrow_mut().insert(key.to_owned());
    }

    pub fn fail_everything(&self) {
        self.fail_all.set(true);
    }

    pub fn fail_removes(&self) {
        self.fail_removes.set(true);
    }
}

impl KeyValueStore for FlakyStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_all.get() {
            return Err(StorageError::Unavailable);
        }
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_all.get() || self.failing_keys.borrow().contains(key) {
            return Err(StorageError::Write("quota exceeded".to_owned()));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_all.get() || self.fail_removes.get() {
            return Err(StorageError::Unavailable);
        }
        self.inner.remove_item(key)
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

pub enum Scripted {
    Respond(u16, String),
    Fail(TransportError),
    Hang,
}

/// Transport that replays scripted outcomes and records every request.
#[derive(Clone, Default)]
pub struct FakeTransport {
    script: Rc<RefCell<VecDeque<Scripted>>>,
    pub requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: serde_json::Value) -> &Self {
        self.script.borrow_mut().push_back(Scripted::Respond(status, body.to_string()));
        self
    }

    pub fn respond_raw(&self, status: u16, body: &str) -> &Self {
        self.script.borrow_mut().push_back(Scripted::Respond(status, body.to_owned()));
        self
    }

    pub fn fail(&self, error: TransportError) -> &Self {
        self.script.borrow_mut().push_back(Scripted::Fail(error));
        self
    }

    pub fn hang(&self) -> &Self {
        self.script.borrow_mut().push_back(Scripted::Hang);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: HttpRequest) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>> {
        self.requests.borrow_mut().push(request);
        let next = self.script.borrow_mut().pop_front();
        Box::pin(async move {
            match next {
                Some(Scripted::Respond(status, body)) => Ok(HttpResponse { status, body }),
                Some(Scripted::Fail(error)) => Err(error),
                Some(Scripted::Hang) => futures::future::pending().await,
                None => Err(TransportError::Network("no scripted response".to_owned())),
            }
        })
    }
}

// =============================================================================
// TIMERS
// =============================================================================

/// Timer whose sleeps complete immediately; records requested durations.
#[derive(Clone, Default)]
pub struct ImmediateTimer {
    pub sleeps: Rc<RefCell<Vec<Duration>>>,
}

impl Timer for ImmediateTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        self.sleeps.borrow_mut().push(duration);
        Box::pin(futures::future::ready(()))
    }
}

/// Timer that never fires, so timeouts never trigger.
#[derive(Clone, Copy, Default)]
pub struct NeverTimer;

impl Timer for NeverTimer {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(futures::future::pending())
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[derive(Clone)]
pub struct RecordingNavigator {
    pub current: Rc<RefCell<String>>,
    pub visits: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self { current: Rc::new(RefCell::new(path.to_owned())), visits: Rc::new(RefCell::new(Vec::new())) }
    }

    pub fn last_visit(&self) -> Option<String> {
        self.visits.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        *self.current.borrow_mut() = path.to_owned();
        self.visits.borrow_mut().push(path.to_owned());
    }

    fn current_path(&self) -> String {
        self.current.borrow().clone()
    }
}
