use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const SESSION_FILE: &str = "session.yaml";

/// Persisted sign-in state, written under `~/.axora`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredSession {
    pub session_key: String,
    pub username: String,
    pub signed_in_at: chrono::DateTime<chrono::Utc>,
}

/// Loads and saves the session file
pub struct SessionStore {
    config_dir: PathBuf,
}

impl SessionStore {
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".axora");
        SessionStore { config_dir }
    }

    /// Store rooted at an explicit directory (used by tests)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        SessionStore { config_dir }
    }

    fn path(&self) -> PathBuf {
        self.config_dir.join(SESSION_FILE)
    }

    /// Load the stored session; a missing file means signed out
    pub fn load(&self) -> Result<Option<StoredSession>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_yaml::from_str(&content)?))
    }

    /// Persist a session, creating the config directory if needed
    pub fn save(&self, session: &StoredSession) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        let content = serde_yaml::to_string(session)?;
        fs::write(self.path(), content)?;
        Ok(())
    }

    /// Remove the stored session (sign out)
    pub fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(dir.path().join("axora"));
        assert!(store.load().unwrap().is_none());

        let session = StoredSession {
            session_key: String::from("sk_live_123"),
            username: String::from("ana"),
            signed_in_at: chrono::Utc::now(),
        };
        store.save(&session).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.session_key, "sk_live_123");
        assert_eq!(loaded.username, "ana");
    }

    #[test]
    fn test_clear_signs_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());
        let session = StoredSession {
            session_key: String::from("sk"),
            username: String::new(),
            signed_in_at: chrono::Utc::now(),
        };
        store.save(&session).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_clear_without_session_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(dir.path().to_path_buf());
        store.clear().unwrap();
    }
}
