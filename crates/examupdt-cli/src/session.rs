//! Session storage for persisting login state.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use examupdt_core::{AuthUser, Session};
use serde::{Deserialize, Serialize};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// What `login` leaves behind for later commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub service_url: String,
    pub token: String,
    pub user: AuthUser,
}

impl StoredSession {
    pub fn new(service_url: &str, session: Session) -> Self {
        Self {
            service_url: service_url.to_string(),
            token: session.token,
            user: session.user,
        }
    }
}

/// Get the session file path.
pub fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "examupdt").context("Could not determine config directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

pub fn save_to(path: &Path, session: &StoredSession) -> Result<()> {
    let json = serde_json::to_string_pretty(session)?;
    fs::write(path, &json).context("Failed to write session file")?;

    // Tokens grant admin access.
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

pub fn load_from(path: &Path) -> Result<Option<StoredSession>> {
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(path).context("Failed to read session file")?;
    let stored = serde_json::from_str(&json).context("Invalid session file")?;
    Ok(Some(stored))
}

pub fn clear_at(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).context("Failed to remove session file")?;
    }
    Ok(())
}

pub fn save(session: &StoredSession) -> Result<()> {
    save_to(&session_path()?, session)
}

pub fn load() -> Result<Option<StoredSession>> {
    load_from(&session_path()?)
}

pub fn clear() -> Result<()> {
    clear_at(&session_path()?)
}
