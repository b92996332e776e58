use super::*;
use crate::storage::MemoryStorage;

#[test]
fn storage_key_uses_project_ref() {
    assert_eq!(storage_key("abcd1234"), "sb-abcd1234-auth-token");
}

#[test]
fn session_without_expiry_never_expires() {
    assert!(!Session::new("t").is_expired(i64::MAX - EXPIRY_MARGIN_SECS));
}

#[test]
fn session_expiry_includes_margin() {
    let session = Session { expires_at: Some(1_000), ..Session::new("t") };
    assert!(!session.is_expired(1_000 - EXPIRY_MARGIN_SECS - 1));
    assert!(session.is_expired(1_000 - EXPIRY_MARGIN_SECS));
    assert!(session.is_expired(2_000));
}

#[test]
fn load_missing_returns_none() {
    let storage = MemoryStorage::new();
    assert_eq!(load(&storage, "sb-x-auth-token").unwrap(), None);
}

#[test]
fn save_then_load() {
    let storage = MemoryStorage::new();
    let session = Session { refresh_token: Some("r".into()), expires_at: Some(42), ..Session::new("a") };
    save(&storage, "sb-x-auth-token", &session).unwrap();
    assert_eq!(load(&storage, "sb-x-auth-token").unwrap(), Some(session));
}

#[test]
fn load_ignores_unknown_fields() {
    let storage = MemoryStorage::new();
    storage
        .set_item(
            "k",
            r#"{"access_token":"a","expires_in":3600,"expires_at":99,"provider_token":null,"user":{"id":"u1"}}"#,
        )
        .unwrap();
    let session = load(&storage, "k").unwrap().unwrap();
    assert_eq!(session.access_token, "a");
    assert_eq!(session.expires_at, Some(99));
    assert_eq!(session.user, Some(serde_json::json!({ "id": "u1" })));
}

#[test]
fn load_discards_garbage() {
    let storage = MemoryStorage::new();
    storage.set_item("k", "not json").unwrap();
    assert_eq!(load(&storage, "k").unwrap(), None);
    assert_eq!(storage.get_item("k").unwrap(), None);
}
