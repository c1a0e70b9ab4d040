//! Composition root.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds one `Services` at startup and shares it through Leptos
//! context. Every field is a cheap handle, so components clone what they
//! need. Tests build the same graph over in-memory storage and a scripted
//! transport.

#[cfg(test)]
#[path = "services_test.rs"]
mod services_test;

use std::rc::Rc;

use crate::auth::guard::RouteGuard;
use crate::auth::token::TokenService;
use crate::config::ClientConfig;
use crate::net::api::{ActivityApi, AuthApi, EmotionApi, MoodApi};
use crate::net::gateway::HttpGateway;
use crate::net::interceptor::AuthInterceptor;
use crate::net::transport::{BrowserTimer, BrowserTransport, Timer, Transport};
use crate::state::notice::Notices;
use crate::state::session::SessionManager;
use crate::storage::credentials::CredentialStore;
use crate::storage::{BrowserStorage, KeyValueStore};
use crate::util::navigation::{BrowserNavigator, Navigator};

#[derive(Clone, Debug)]
pub struct Services {
    pub credentials: CredentialStore,
    pub tokens: TokenService,
    pub gateway: HttpGateway,
    pub session: SessionManager,
    pub guard: RouteGuard,
    pub moods: MoodApi,
    pub emotions: EmotionApi,
    pub activities: ActivityApi,
    pub notices: Notices,
}

impl Services {
    /// Wire the service graph. The session is not resolved yet; call
    /// `session.initialize()` once the navigator can answer `current_path`.
    pub fn new(
        config: ClientConfig,
        storage: Rc<dyn KeyValueStore>,
        transport: Rc<dyn Transport>,
        timer: Rc<dyn Timer>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        let credentials = CredentialStore::new(Rc::clone(&storage));
        let tokens = TokenService::new(storage);
        let gateway = HttpGateway::new(config, credentials.clone(), tokens.clone(), transport, timer);
        let session = SessionManager::new(
            credentials.clone(),
            tokens.clone(),
            AuthApi::new(gateway.clone()),
            Rc::clone(&navigator),
        );
        let notices = Notices::new();
        gateway.add_interceptor(Rc::new(AuthInterceptor::new(session.downgrade(), notices.clone())));

        Self {
            guard: RouteGuard::new(session.clone(), navigator),
            moods: MoodApi::new(gateway.clone()),
            emotions: EmotionApi::new(gateway.clone()),
            activities: ActivityApi::new(gateway.clone()),
            credentials,
            tokens,
            gateway,
            session,
            notices,
        }
    }

    /// Browser wiring: `localStorage`, `fetch`, build-time configuration.
    pub fn browser(navigator: Rc<BrowserNavigator>) -> Self {
        Self::new(
            ClientConfig::from_build_env(),
            Rc::new(BrowserStorage),
            Rc::new(BrowserTransport),
            Rc::new(BrowserTimer),
            navigator,
        )
    }
}
