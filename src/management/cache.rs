use std::{io::ErrorKind, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::Result, types::UserToken};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedUserToken {
    user_token: UserToken,
    obtained_at: DateTime<Utc>,
}

/// Keeps the user token between runs in the local data directory.
pub struct UserTokenCache {
    path: PathBuf,
}

impl Default for UserTokenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl UserTokenCache {
    pub fn new() -> Self {
        Self::at(Self::default_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        UserTokenCache { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// `Ok(None)` when nothing was cached yet.
    pub async fn load(&self) -> Result<Option<UserToken>> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let cached: CachedUserToken = serde_json::from_str(&content)?;
        Ok(Some(cached.user_token))
    }

    pub async fn persist(&self, token: &UserToken) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let cached = CachedUserToken {
            user_token: token.clone(),
            obtained_at: Utc::now(),
        };
        let json = serde_json::to_string_pretty(&cached)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        match async_fs::remove_file(&self.path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn default_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("amkit/cache/user-token.json");
        path
    }
}
