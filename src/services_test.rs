use super::*;
use crate::net::error::ErrorKind;
use crate::net::gateway::RequestOptions;
use crate::net::types::LoginRequest;
use crate::state::session::SessionState;
use crate::storage::MemoryStorage;
use crate::testing::{FakeTransport, NeverTimer, RecordingNavigator, expired_jwt, sample_user, valid_jwt};
use crate::util::navigation::{HOME_PATH, LOGIN_PATH};
use futures::executor::block_on;
use serde_json::json;

struct App {
    services: Services,
    storage: MemoryStorage,
    transport: FakeTransport,
    navigator: RecordingNavigator,
}

fn boot(storage: MemoryStorage, path: &str) -> App {
    let transport = FakeTransport::new();
    let navigator = RecordingNavigator::at(path);
    let services = Services::new(
        ClientConfig::default(),
        Rc::new(storage.clone()),
        Rc::new(transport.clone()),
        Rc::new(NeverTimer),
        Rc::new(navigator.clone()),
    );
    services.session.initialize();
    App { services, storage, transport, navigator }
}

fn seeded(token: &str) -> MemoryStorage {
    let storage = MemoryStorage::new();
    CredentialStore::new(Rc::new(storage.clone())).set_credential(token, "Bearer", &sample_user());
    storage
}

// =============================================================
// Startup
// =============================================================

#[test]
fn startup_with_valid_credentials_is_authenticated() {
    let app = boot(seeded(&valid_jwt()), "/history");
    assert_eq!(app.services.session.state(), SessionState::authenticated(sample_user()));
    assert!(app.services.guard.can_activate("/history"));
}

#[test]
fn startup_with_expired_credentials_clears_storage() {
    let app = boot(seeded(&expired_jwt()), "/history");
    assert_eq!(app.services.session.state(), SessionState::unauthenticated());
    assert!(app.storage.is_empty());
    assert_eq!(app.services.tokens.token(), None);
}

#[test]
fn token_service_sees_token_written_before_startup() {
    let token = valid_jwt();
    let app = boot(seeded(&token), "/");
    assert_eq!(app.services.tokens.token(), Some(token));
    assert!(!app.services.tokens.is_expired());
}

// =============================================================
// Login scenarios
// =============================================================

#[test]
fn login_then_authenticated_calls_carry_the_token() {
    let app = boot(MemoryStorage::new(), LOGIN_PATH);
    app.transport
        .respond(
            200,
            json!({
                "accessToken": "tok1",
                "tokenType": "Bearer",
                "user": {"id": 1, "email": "a@b.com", "username": "a"},
                "success": true
            }),
        )
        .respond(200, json!([]));

    let request = LoginRequest { username_or_email: "a@b.com".to_owned(), password: "secret1".to_owned() };
    block_on(app.services.session.login(request)).unwrap();

    let state = app.services.session.state();
    assert!(state.is_authenticated());
    assert_eq!(state.user().map(|u| u.id.as_str()), Some("1"));
    assert_eq!(app.services.credentials.authorization_header_value().as_deref(), Some("Bearer tok1"));
    assert_eq!(app.navigator.last_visit().as_deref(), Some(HOME_PATH));

    block_on(app.services.moods.today()).unwrap();
    let request = app.transport.last_request().unwrap();
    assert_eq!(request.header("Authorization"), Some("Bearer tok1"));
}

#[test]
fn login_with_malformed_response_writes_nothing() {
    let app = boot(MemoryStorage::new(), LOGIN_PATH);
    app.transport.respond(200, json!({"success": true}));

    let request = LoginRequest { username_or_email: "a@b.com".to_owned(), password: "secret1".to_owned() };
    assert!(block_on(app.services.session.login(request)).is_ok());

    let state = app.services.session.state();
    assert!(!state.is_authenticated());
    assert!(!state.is_loading());
    assert!(app.storage.is_empty());
    assert_eq!(app.services.credentials.authorization_header_value(), None);
}

// =============================================================
// Forced logout
// =============================================================

#[test]
fn unauthorized_call_returns_error_and_logs_out() {
    let app = boot(seeded(&valid_jwt()), "/dashboard");
    app.transport.respond(401, json!({"message": "expired"}));

    let err = block_on(app.services.gateway.get::<serde_json::Value>("mood-entries", RequestOptions::new().with_retries(0)))
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(app.services.session.state(), SessionState::unauthenticated());
    assert_eq!(app.navigator.current_path(), LOGIN_PATH);
    assert!(app.storage.is_empty());
}

#[test]
fn forbidden_from_any_endpoint_logs_out() {
    for endpoint in ["activities/today", "emotions", "mood-entries/statistics"] {
        let app = boot(seeded(&valid_jwt()), "/dashboard");
        app.transport.respond(403, json!({}));
        let options = RequestOptions::new().with_retries(0);
        let err = block_on(app.services.gateway.get::<serde_json::Value>(endpoint, options)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization, "{endpoint}");
        assert!(!app.services.session.is_authenticated(), "{endpoint}");
        assert_eq!(app.navigator.last_visit().as_deref(), Some(LOGIN_PATH), "{endpoint}");
    }
}

#[test]
fn sign_out_rejected_by_server_posts_no_notice() {
    for status in [401, 503] {
        let app = boot(seeded(&valid_jwt()), "/dashboard");
        app.transport.respond(status, json!({}));

        block_on(app.services.session.sign_out());

        assert_eq!(app.services.notices.current(), None, "{status}");
        assert!(!app.services.session.is_authenticated(), "{status}");
        assert_eq!(app.navigator.current_path(), LOGIN_PATH, "{status}");
        assert!(app.storage.is_empty(), "{status}");
    }
}

#[test]
fn repeated_logout_matches_single_logout() {
    let app = boot(seeded(&valid_jwt()), "/dashboard");
    app.services.session.logout();
    let after_one = (app.services.session.state(), app.storage.len(), app.navigator.current_path());
    app.services.session.logout();
    app.services.credentials.clear_all();
    let after_two = (app.services.session.state(), app.storage.len(), app.navigator.current_path());
    assert_eq!(after_one, after_two);
}
