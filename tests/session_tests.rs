use papertrade::session::SessionStore;

fn temp_session(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("papertrade-session-{}-{}.json", name, std::process::id()))
}

#[tokio::test]
async fn the_session_lifecycle_round_trips_through_the_file() {
    let path = temp_session("lifecycle");
    let _ = std::fs::remove_file(&path);

    let store = SessionStore::open(&path).unwrap();
    assert!(!store.is_authenticated().await);

    store
        .init("access-1".into(), "refresh-1".into(), None)
        .await
        .unwrap();
    assert!(store.is_authenticated().await);
    assert_eq!(store.access_token().await.as_deref(), Some("access-1"));

    // Refresh replaces both tokens.
    store
        .refresh("access-2".into(), "refresh-2".into())
        .await
        .unwrap();
    assert_eq!(store.access_token().await.as_deref(), Some("access-2"));
    assert_eq!(store.refresh_token().await.as_deref(), Some("refresh-2"));

    // A fresh store picks the record up from disk.
    let reopened = SessionStore::open(&path).unwrap();
    assert_eq!(reopened.access_token().await.as_deref(), Some("access-2"));

    store.clear().await.unwrap();
    assert!(!store.is_authenticated().await);
    assert!(!path.exists());
}

#[tokio::test]
async fn the_persisted_record_uses_the_expected_keys() {
    let path = temp_session("keys");
    let _ = std::fs::remove_file(&path);

    let store = SessionStore::open(&path).unwrap();
    store
        .init("the-access".into(), "the-refresh".into(), None)
        .await
        .unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["token"], "the-access");
    assert_eq!(json["refreshToken"], "the-refresh");
    assert!(json["user"].is_null());

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn refreshing_without_a_session_is_an_error() {
    let path = temp_session("no-session");
    let _ = std::fs::remove_file(&path);

    let store = SessionStore::open(&path).unwrap();
    assert!(store
        .refresh("access".into(), "refresh".into())
        .await
        .is_err());
}
