//! One-shot gate for protected views.
//!
//! Reads the session synchronously; it never waits for startup resolution.
//! Protected pages reach it through `util::auth::install_route_guard`, which
//! holds off until the session has settled.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::rc::Rc;

use crate::state::session::SessionManager;
use crate::util::navigation::{LOGIN_PATH, Navigator};

#[derive(Clone)]
pub struct RouteGuard {
    session: SessionManager,
    navigator: Rc<dyn Navigator>,
}

impl RouteGuard {
    pub fn new(session: SessionManager, navigator: Rc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Allow iff authenticated; otherwise redirect to the login view.
    pub fn can_activate(&self, path: &str) -> bool {
        if self.session.is_authenticated() {
            return true;
        }
        log::debug!("route guard: denied {path}, redirecting to {LOGIN_PATH}");
        self.navigator.navigate(LOGIN_PATH);
        false
    }
}

impl std::fmt::Debug for RouteGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGuard").field("authenticated", &self.session.is_authenticated()).finish()
    }
}
