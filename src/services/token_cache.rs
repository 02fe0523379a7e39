use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;

/// Seconds before expiry at which a token is already treated as expired
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Errors that can occur reading or writing the token cache
#[derive(Debug, Error)]
pub enum TokenCacheError {
    #[error("Token cache IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Token cache is corrupt: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// OAuth token as stored in the cache file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    /// Unix timestamp (seconds) after which the access token is invalid
    pub expires_at: i64,
}

fn default_token_type() -> String { "Bearer".to_string() }

impl TokenInfo {
    pub fn is_expired(&self) -> bool {
        self.expires_at - EXPIRY_MARGIN_SECS < chrono::Utc::now().timestamp()
    }
}

/// Single-entry token cache backed by a JSON file
///
/// The file survives restarts so the user only logs in once. Reads hit
/// memory after the first load.
pub struct TokenCache {
    path: PathBuf,
    current: RwLock<Option<TokenInfo>>,
}

impl TokenCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            current: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the cached token, loading it from disk on first access
    pub async fn get(&self) -> Result<Option<TokenInfo>, TokenCacheError> {
        if let Some(token) = self.current.read().await.as_ref() {
            return Ok(Some(token.clone()));
        }

        let mut current = self.current.write().await;
        if current.is_none() {
            *current = self.load().await?;
            if current.is_some() {
                tracing::debug!("Loaded token from {}", self.path.display());
            }
        }

        Ok(current.clone())
    }

    /// Replace the cached token in memory and on disk
    pub async fn store(&self, token: TokenInfo) -> Result<(), TokenCacheError> {
        let mut current = self.current.write().await;

        let json = serde_json::to_vec_pretty(&token)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, json).await?;

        *current = Some(token);
        tracing::debug!("Stored token in {}", self.path.display());
        Ok(())
    }

    async fn load(&self) -> Result<Option<TokenInfo>, TokenCacheError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_at: i64) -> TokenInfo {
        TokenInfo {
            access_token: "access".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            refresh_token: Some("refresh".to_string()),
            scope: None,
            expires_at,
        }
    }

    #[test]
    fn test_expiry_margin() {
        let now = chrono::Utc::now().timestamp();
        assert!(!token(now + 3600).is_expired());
        assert!(token(now + 30).is_expired());
        assert!(token(now - 10).is_expired());
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = TokenCache::new(dir.path().join("token.json"));

        assert!(cache.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token.json");
        let stored = token(chrono::Utc::now().timestamp() + 3600);

        TokenCache::new(&path).store(stored.clone()).await.unwrap();

        let reloaded = TokenCache::new(&path).get().await.unwrap();
        assert_eq!(reloaded, Some(stored));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, b"not json").unwrap();

        let cache = TokenCache::new(&path);
        assert!(matches!(cache.get().await, Err(TokenCacheError::SerializationError(_))));
    }
}
