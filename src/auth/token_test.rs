use super::*;
use crate::storage::MemoryStorage;
use crate::testing::{expired_jwt, make_jwt, valid_jwt};
use serde_json::json;

fn service_over(storage: &MemoryStorage) -> TokenService {
    TokenService::new(Rc::new(storage.clone()))
}

// =============================================================
// decode_claims
// =============================================================

#[test]
fn decodes_required_and_optional_claims() {
    let token = make_jwt(&json!({
        "sub": "u1",
        "email": "a@b.com",
        "name": "Ada",
        "picture": "https://img/a.png",
        "iat": 1_700_000_000,
        "exp": 1_700_003_600,
        "scope": ["read", "write"]
    }));
    let claims = decode_claims(&token).unwrap();
    assert_eq!(claims.subject_id, "u1");
    assert_eq!(claims.email, "a@b.com");
    assert_eq!(claims.display_name.as_deref(), Some("Ada"));
    assert_eq!(claims.picture_url.as_deref(), Some("https://img/a.png"));
    assert_eq!(claims.issued_at.map(|t| t.timestamp()), Some(1_700_000_000));
    assert_eq!(claims.expires_at.timestamp(), 1_700_003_600);
    assert_eq!(claims.scopes, vec!["read", "write"]);
}

#[test]
fn numeric_subject_and_space_delimited_scope() {
    let token = make_jwt(&json!({"sub": 7, "email": "x@y.z", "exp": 2_000_000_000, "scope": "a b"}));
    let claims = decode_claims(&token).unwrap();
    assert_eq!(claims.subject_id, "7");
    assert_eq!(claims.scopes, vec!["a", "b"]);
}

#[test]
fn fractional_expiry_is_truncated() {
    let token = make_jwt(&json!({"sub": "u", "email": "e@x.io", "exp": 1_700_000_000.75}));
    assert_eq!(decode_claims(&token).unwrap().expires_at.timestamp(), 1_700_000_000);
}

#[test]
fn padded_payload_is_accepted() {
    let token = make_jwt(&json!({"sub": "u", "email": "e@x.io", "exp": 1}));
    let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
    while parts[1].len() % 4 != 0 {
        parts[1].push('=');
    }
    assert!(decode_claims(&parts.join(".")).is_some());
}

#[test]
fn malformed_tokens_fail_to_decode() {
    let missing_exp = make_jwt(&json!({"sub": "u", "email": "e@x.io"}));
    let missing_email = make_jwt(&json!({"sub": "u", "exp": 2_000_000_000}));
    let missing_sub = make_jwt(&json!({"email": "e@x.io", "exp": 2_000_000_000}));
    let cases = [
        String::new(),
        "tok1".to_owned(),
        "a.b".to_owned(),
        "a.b.c.d".to_owned(),
        "header.!!!notbase64!!!.sig".to_owned(),
        format!("h.{}.s", base64::engine::general_purpose::URL_SAFE_NO_PAD.encode("not json")),
        missing_exp,
        missing_email,
        missing_sub,
    ];
    for token in &cases {
        assert!(decode_claims(token).is_none(), "expected decode failure for {token:?}");
    }
}

#[test]
fn claims_to_user_falls_back_to_email_for_username() {
    let claims = decode_claims(&make_jwt(&json!({"sub": "u", "email": "e@x.io", "exp": 1}))).unwrap();
    let user = claims.to_user();
    assert_eq!(user.id, "u");
    assert_eq!(user.username, "e@x.io");
    assert_eq!(user.display_name, None);
}

// =============================================================
// TokenService
// =============================================================

#[test]
fn malformed_live_tokens_count_as_expired() {
    let service = service_over(&MemoryStorage::new());
    assert!(service.is_expired());
    for bad in ["tok1", "a.b", "x.y.z", "a.b.c.d"] {
        service.set_token(bad);
        assert!(service.is_expired(), "{bad} should be expired");
        assert!(service.is_token_expired(bad));
    }
}

#[test]
fn expiry_follows_exp_claim() {
    let service = service_over(&MemoryStorage::new());
    service.set_token(&valid_jwt());
    assert!(!service.is_expired());
    assert!(service.is_token_expired(&expired_jwt()));
    service.set_token(&expired_jwt());
    assert!(service.is_expired());
}

#[test]
fn seeds_live_slot_from_storage() {
    let storage = MemoryStorage::new();
    storage.set_item(TOKEN_KEY, "stored").unwrap();
    let service = service_over(&storage);
    assert_eq!(service.token().as_deref(), Some("stored"));
    assert_eq!(service.authorization_header_value().as_deref(), Some("Bearer stored"));
}

#[test]
fn set_and_clear_write_through_and_publish() {
    let storage = MemoryStorage::new();
    let service = service_over(&storage);
    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = service.subscribe(move |t| sink.borrow_mut().push(t.clone()));

    service.set_token("t1");
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap().as_deref(), Some("t1"));
    service.clear();
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
    assert_eq!(service.token(), None);

    assert_eq!(*seen.borrow(), vec![None, Some("t1".to_owned()), None]);
}

#[test]
fn current_claims_reads_live_token() {
    let service = service_over(&MemoryStorage::new());
    assert!(service.current_claims().is_none());
    service.set_token(&valid_jwt());
    assert_eq!(service.current_claims().map(|c| c.subject_id).as_deref(), Some("42"));
}

#[test]
fn hold_in_memory_leaves_storage_untouched() {
    let storage = MemoryStorage::new();
    let service = service_over(&storage);

    service.hold_in_memory("t1");

    assert_eq!(service.token().as_deref(), Some("t1"));
    assert_eq!(storage.get_item(TOKEN_KEY).unwrap(), None);
}
