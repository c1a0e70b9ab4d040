use super::*;
use crate::config::ClientConfig;
use crate::services::Services;
use crate::storage::MemoryStorage;
use crate::testing::{FakeTransport, NeverTimer, RecordingNavigator, sample_user, valid_jwt};
use crate::util::navigation::LOGIN_PATH;
use std::rc::Rc;

fn services_at(storage: &MemoryStorage, navigator: &RecordingNavigator) -> Services {
    Services::new(
        ClientConfig::default(),
        Rc::new(storage.clone()),
        Rc::new(FakeTransport::new()),
        Rc::new(NeverTimer),
        Rc::new(navigator.clone()),
    )
}

#[test]
fn direct_visit_without_session_redirects_to_login() {
    let navigator = RecordingNavigator::at("/history");
    let services = services_at(&MemoryStorage::new(), &navigator);
    services.session.initialize();

    assert_eq!(check_route(&services.session.state(), &services.guard, "/history"), Some(false));
    assert_eq!(navigator.last_visit().as_deref(), Some(LOGIN_PATH));
}

#[test]
fn waits_while_resolving() {
    let navigator = RecordingNavigator::at("/dashboard");
    let services = services_at(&MemoryStorage::new(), &navigator);

    assert_eq!(check_route(&SessionState::resolving(), &services.guard, "/dashboard"), None);
    assert!(navigator.visits.borrow().is_empty());
}

#[test]
fn waits_during_login_attempt() {
    let navigator = RecordingNavigator::at("/auth");
    let services = services_at(&MemoryStorage::new(), &navigator);
    let state = SessionState::unauthenticated().with_loading(true);

    assert_eq!(check_route(&state, &services.guard, "/dashboard"), None);
    assert!(navigator.visits.borrow().is_empty());
}

#[test]
fn direct_visit_with_session_is_allowed() {
    let storage = MemoryStorage::new();
    let navigator = RecordingNavigator::at("/mood-entry");
    let services = services_at(&storage, &navigator);
    services.credentials.set_credential(&valid_jwt(), "Bearer", &sample_user());
    services.session.initialize();

    assert_eq!(check_route(&services.session.state(), &services.guard, "/mood-entry"), Some(true));
    assert!(navigator.visits.borrow().is_empty());
}
