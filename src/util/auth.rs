//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected pages run the route guard on arrival, whether reached through an
//! in-app link or typed into the address bar. The check waits until startup
//! resolution has settled and re-runs whenever the session changes.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::auth::guard::RouteGuard;
use crate::state::session::SessionState;

/// Guard verdict for `path`, or `None` while the session is still loading.
pub fn check_route(state: &SessionState, guard: &RouteGuard, path: &str) -> Option<bool> {
    if state.is_loading() {
        return None;
    }
    Some(guard.can_activate(path))
}

/// Run the route guard for `path` each time the session settles.
pub fn install_route_guard(session: RwSignal<SessionState>, guard: RouteGuard, path: &'static str) {
    Effect::new(move || {
        let _ = check_route(&session.get(), &guard, path);
    });
}
