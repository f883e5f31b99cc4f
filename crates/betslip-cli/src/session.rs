//! Session persistence.
//!
//! Persists the bearer token and the last server-confirmed user snapshot to
//! `~/.betslip/session.json`. The snapshot is only ever replaced by a profile
//! refresh, never adjusted locally.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use betslip_core::UserAccessState;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{ApiError, ProfileApi};

/// Persistent session state.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SessionFile {
    /// Authentication credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
    /// Last user snapshot returned by the profile endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserAccessState>,
}

/// Stored authentication credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub access_token: String,
}

impl SessionFile {
    /// Path to the session directory: `~/.betslip/`.
    pub fn session_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".betslip"))
    }

    /// Path to the session file: `~/.betslip/session.json`.
    pub fn session_path() -> Option<PathBuf> {
        Self::session_dir().map(|d| d.join("session.json"))
    }

    /// Load from `path`. Returns default if the file doesn't exist or is invalid.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save to `path`, creating its directory.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Forget the token and the cached snapshot.
    pub fn clear_auth(&mut self) {
        self.auth = None;
        self.user = None;
    }

    pub fn access_token(&self) -> Option<&str> {
        self.auth.as_ref().map(|a| a.access_token.as_str())
    }

    /// Snapshot the access gate sees.
    ///
    /// Without a token the client is anonymous whatever the cache holds.
    pub fn snapshot(&self) -> UserAccessState {
        let Some(auth) = &self.auth else {
            return UserAccessState::anonymous();
        };
        self.user.clone().map_or_else(
            || UserAccessState {
                is_authenticated: true,
                username: auth.username.clone(),
                ..UserAccessState::default()
            },
            |user| UserAccessState {
                is_authenticated: true,
                ..user
            },
        )
    }
}

/// Session collaborator of the generation flow.
#[async_trait]
pub trait SessionSource: Send {
    /// Current snapshot, read synchronously.
    fn state(&self) -> UserAccessState;

    /// Re-fetch the authoritative snapshot from the backend.
    async fn refresh(&mut self) -> Result<UserAccessState, ApiError>;
}

/// Session backed by the session file and the profile endpoint.
pub struct Session<P> {
    file: SessionFile,
    path: Option<PathBuf>,
    profile: P,
}

impl<P: ProfileApi> Session<P> {
    /// `path` is where refreshed snapshots are written back; `None` keeps them in memory.
    pub const fn new(file: SessionFile, path: Option<PathBuf>, profile: P) -> Self {
        Self {
            file,
            path,
            profile,
        }
    }

    pub const fn file(&self) -> &SessionFile {
        &self.file
    }
}

#[async_trait]
impl<P: ProfileApi> SessionSource for Session<P> {
    fn state(&self) -> UserAccessState {
        self.file.snapshot()
    }

    async fn refresh(&mut self) -> Result<UserAccessState, ApiError> {
        let fresh = self.profile.fetch_profile().await?;
        self.file.user = Some(fresh.clone());
        if let Some(path) = &self.path
            && let Err(e) = self.file.save_to(path)
        {
            warn!(error = %e, path = %path.display(), "Failed to persist session snapshot");
        }
        Ok(fresh)
    }
}
