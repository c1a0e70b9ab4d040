//! Cross-cutting reaction to failed API calls.
//!
//! A 401 or 403 from any endpoint forces a logout and posts the
//! session-expired notice. Every other classified error posts its own notice.
//! The session is held weakly: the session manager owns the auth API, which
//! owns the gateway, which owns this interceptor.

#[cfg(test)]
#[path = "interceptor_test.rs"]
mod interceptor_test;

use super::error::ApiError;
use super::gateway::ResponseInterceptor;
use crate::state::notice::Notices;
use crate::state::session::WeakSession;

pub const SESSION_EXPIRED_NOTICE: &str = "Session expired. Please log in again.";

pub struct AuthInterceptor {
    session: WeakSession,
    notices: Notices,
}

impl AuthInterceptor {
    pub fn new(session: WeakSession, notices: Notices) -> Self {
        Self { session, notices }
    }
}

impl ResponseInterceptor for AuthInterceptor {
    fn on_error(&self, error: &ApiError) {
        if !error.is_auth_failure() {
            self.notices.post(error.notice());
            return;
        }
        match self.session.upgrade() {
            Some(session) => session.force_logout(),
            None => log::warn!("auth interceptor: session dropped, cannot log out after {}", error.status_code),
        }
        self.notices.post(SESSION_EXPIRED_NOTICE);
    }
}
