use crate::api::backend::BackendClient;
use crate::types::UserProfile;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// On-disk session record. Field names match the persisted keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(rename = "token")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    #[serde(rename = "user")]
    pub user: Option<UserProfile>,
}

/// Access/refresh token pair plus the cached profile, persisted to a local
/// JSON file so the session survives between invocations.
///
/// Lifecycle: `init` on login/signup, `refresh` on every token exchange,
/// `discard_user` when a 401 invalidates the cached profile, `clear` on
/// logout.
pub struct SessionStore {
    path: PathBuf,
    inner: RwLock<Option<SessionRecord>>,
}

impl SessionStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let record = match std::fs::read_to_string(&path) {
            Ok(raw) => Some(
                serde_json::from_str(&raw)
                    .with_context(|| format!("corrupt session file {}", path.display()))?,
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| format!("read session file {}", path.display()))
            }
        };
        Ok(Self {
            path,
            inner: RwLock::new(record),
        })
    }

    pub async fn init(&self, access: String, refresh: String, user: Option<UserProfile>) -> Result<()> {
        let mut guard = self.inner.write().await;
        *guard = Some(SessionRecord {
            access_token: access,
            refresh_token: refresh,
            user,
        });
        self.persist(guard.as_ref())
    }

    /// Replace both tokens after a refresh exchange.
    pub async fn refresh(&self, access: String, refresh: String) -> Result<()> {
        let mut guard = self.inner.write().await;
        let record = guard
            .as_mut()
            .context("no active session to refresh")?;
        record.access_token = access;
        record.refresh_token = refresh;
        self.persist(guard.as_ref())
    }

    pub async fn set_user(&self, user: UserProfile) -> Result<()> {
        let mut guard = self.inner.write().await;
        let record = guard.as_mut().context("no active session")?;
        record.user = Some(user);
        self.persist(guard.as_ref())
    }

    /// Drop the cached profile. Called when an authenticated read comes back
    /// 401; the tokens stay in place so the refresh task can still try.
    pub async fn discard_user(&self) {
        let mut guard = self.inner.write().await;
        if let Some(record) = guard.as_mut() {
            record.user = None;
            if let Err(e) = self.persist(guard.as_ref()) {
                tracing::warn!(error = ?e, "failed to persist session after discarding user");
            }
        }
    }

    /// Logout: forget the session and remove the file.
    pub async fn clear(&self) -> Result<()> {
        let mut guard = self.inner.write().await;
        *guard = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("remove session file {}", self.path.display()))
            }
        }
    }

    pub async fn access_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|r| r.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.inner
            .read()
            .await
            .as_ref()
            .map(|r| r.refresh_token.clone())
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.inner.read().await.as_ref().and_then(|r| r.user.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    fn persist(&self, record: Option<&SessionRecord>) -> Result<()> {
        let Some(record) = record else {
            return Ok(());
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create session dir {}", parent.display()))?;
            }
        }
        let raw = serde_json::to_string_pretty(record).context("serialize session")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("write session file {}", self.path.display()))
    }
}

/// Handle to the background token-refresh task. Aborting the task is tied to
/// this guard so a dropped session cannot leave a timer running.
pub struct RefreshTask {
    handle: JoinHandle<()>,
}

impl RefreshTask {
    pub fn abort(self) {
        self.handle.abort();
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Exchange the refresh token immediately and then on a fixed interval.
/// Failures are logged and the loop keeps going; the next authenticated call
/// surfaces an expired session reactively.
pub fn spawn_refresh(backend: BackendClient, interval: Duration) -> RefreshTask {
    let handle = tokio::spawn(async move {
        loop {
            if let Err(e) = backend.refresh_session().await {
                tracing::warn!(error = ?e, "token refresh failed");
            }
            tokio::time::sleep(interval).await;
        }
    });
    RefreshTask { handle }
}
