//! Durable credential and profile storage
//!
//! The backend session state a client keeps between runs: the
//! access/refresh token pair and the cached user profile. Writers always
//! persist the pair as a unit so an access token can never outlive its
//! matching refresh token.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::types::{TokenPair, UserProfile};

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read the stored credential pair, if any.
    async fn load_tokens(&self) -> CoreResult<Option<TokenPair>>;

    /// Persist a freshly issued credential pair. Both tokens are written
    /// together; there is no way to store one without the other.
    async fn store_tokens(&self, pair: &TokenPair) -> CoreResult<()>;

    /// Read the cached user profile, if any.
    async fn load_profile(&self) -> CoreResult<Option<UserProfile>>;

    /// Cache the user profile alongside the credentials.
    async fn store_profile(&self, profile: &UserProfile) -> CoreResult<()>;

    /// Erase tokens and profile. Used on logout and on irrecoverable
    /// refresh failure.
    async fn clear(&self) -> CoreResult<()>;
}

/// On-disk snapshot format shared by the store implementations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    tokens: Option<TokenPair>,
    #[serde(default)]
    profile: Option<UserProfile>,
}

/// File-backed store with a write-through in-memory cache.
///
/// Reads never touch the disk after startup; every mutation rewrites the
/// snapshot file atomically (temp file + rename).
pub struct FileCredentialStore {
    path: PathBuf,
    cache: RwLock<Snapshot>,
}

impl FileCredentialStore {
    /// Open (or lazily create) the snapshot at `path`.
    ///
    /// A missing file means an anonymous session. A corrupt file is
    /// logged and treated as absent rather than failing startup.
    pub async fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let snapshot = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Snapshot>(&bytes) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "discarding unreadable credential snapshot");
                    Snapshot::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Snapshot::default(),
            Err(err) => {
                return Err(CoreError::io_error(format!(
                    "failed to read credential snapshot {}: {err}",
                    path.display()
                )));
            }
        };

        Ok(Self {
            path,
            cache: RwLock::new(snapshot),
        })
    }

    async fn persist(&self, snapshot: &Snapshot) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let body = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load_tokens(&self) -> CoreResult<Option<TokenPair>> {
        Ok(self.cache.read().await.tokens.clone())
    }

    async fn store_tokens(&self, pair: &TokenPair) -> CoreResult<()> {
        let mut cache = self.cache.write().await;
        cache.tokens = Some(pair.clone());
        self.persist(&cache).await
    }

    async fn load_profile(&self) -> CoreResult<Option<UserProfile>> {
        Ok(self.cache.read().await.profile.clone())
    }

    async fn store_profile(&self, profile: &UserProfile) -> CoreResult<()> {
        let mut cache = self.cache.write().await;
        cache.profile = Some(profile.clone());
        self.persist(&cache).await
    }

    async fn clear(&self) -> CoreResult<()> {
        let mut cache = self.cache.write().await;
        *cache = Snapshot::default();
        self.persist(&cache).await
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryCredentialStore {
    inner: RwLock<Snapshot>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the store with a credential pair.
    pub async fn with_tokens(pair: TokenPair) -> Self {
        let store = Self::new();
        store
            .store_tokens(&pair)
            .await
            .expect("memory store never fails");
        store
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load_tokens(&self) -> CoreResult<Option<TokenPair>> {
        Ok(self.inner.read().await.tokens.clone())
    }

    async fn store_tokens(&self, pair: &TokenPair) -> CoreResult<()> {
        self.inner.write().await.tokens = Some(pair.clone());
        Ok(())
    }

    async fn load_profile(&self) -> CoreResult<Option<UserProfile>> {
        Ok(self.inner.read().await.profile.clone())
    }

    async fn store_profile(&self, profile: &UserProfile) -> CoreResult<()> {
        self.inner.write().await.profile = Some(profile.clone());
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        *self.inner.write().await = Snapshot::default();
        Ok(())
    }
}
