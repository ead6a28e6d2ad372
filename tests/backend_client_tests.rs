use papertrade::api::backend::BackendClient;
use papertrade::session::SessionStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn temp_session(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("papertrade-{}-{}.json", name, std::process::id()))
}

/// Minimal stub that answers every request with 401.
async fn spawn_unauthorized_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 401 Unauthorized\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    )
                    .await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn a_401_read_degrades_to_an_empty_default_and_drops_the_cached_user() {
    let base_url = spawn_unauthorized_server().await;
    let path = temp_session("unauthorized");
    let store = Arc::new(SessionStore::open(&path).unwrap());
    store
        .init("stale-access".into(), "stale-refresh".into(), None)
        .await
        .unwrap();

    let backend = BackendClient::new(&base_url, store.clone());

    assert!(backend.user_assets().await.is_empty());
    assert_eq!(backend.funds().await, Decimal::ZERO);
    assert!(backend.transactions().await.is_empty());
    assert!(backend.fetch_profile().await.is_none());

    // Tokens survive a 401; only the cached profile is discarded.
    assert!(store.is_authenticated().await);
    assert!(store.user().await.is_none());

    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn reads_without_a_session_return_defaults_without_a_network_call() {
    let path = temp_session("anonymous");
    let _ = std::fs::remove_file(&path);
    let store = Arc::new(SessionStore::open(&path).unwrap());

    // Unroutable base URL: any attempted request would error loudly.
    let backend = BackendClient::new("http://127.0.0.1:1", store);
    assert!(backend.user_assets().await.is_empty());
    assert_eq!(backend.funds().await, Decimal::ZERO);
}

#[tokio::test]
async fn an_invalid_login_form_never_reaches_the_network() {
    let path = temp_session("login-validation");
    let _ = std::fs::remove_file(&path);
    let store = Arc::new(SessionStore::open(&path).unwrap());

    // Connection-refused base URL: a network attempt would surface a
    // request error instead of the validation message.
    let backend = BackendClient::new("http://127.0.0.1:1", store);

    let err = backend.login("bob", "short").await.unwrap_err();
    assert_eq!(err.to_string(), "Password must be at least 8 characters long");

    let err = backend.login("", "longenough").await.unwrap_err();
    assert_eq!(err.to_string(), "Username is required");
}
