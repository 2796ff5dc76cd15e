//! The session context: who is logged in and with which token.
//!
//! Replaces ambient storage with an explicit object and lifecycle: load at
//! startup, save after login, clear on logout. The file is plain JSON under
//! the config directory; the backend token is the only secret it holds.

use std::{fs, io, path::Path};

use api_types::user::User;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SESSION_PATH: &str = "config/session.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    /// Loads the session from disk. A missing file is a logged-out session,
    /// not an error.
    pub fn load(path: &str) -> io::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err),
        };
        serde_json::from_str(&content).map_err(io::Error::other)
    }

    pub fn save(&self, path: &str) -> io::Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, payload)
    }

    /// Logs out: drops token and profile and removes the file.
    pub fn clear(&mut self, path: &str) -> io::Result<()> {
        self.token = None;
        self.user = None;
        match fs::remove_file(path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|user| user.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            email: "diego@example.com".to_string(),
            first_name: "Diego".to_string(),
            last_name: "Salas".to_string(),
            birth_date: None,
            gender: "male".to_string(),
            plan: "free".to_string(),
        }
    }

    #[test]
    fn load_missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = Session::load(path.to_str().unwrap()).unwrap();
        assert!(!session.is_logged_in());
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/session.json");
        let path = path.to_str().unwrap();

        let session = Session {
            token: Some("abc123".to_string()),
            user: Some(sample_user()),
        };
        session.save(path).unwrap();

        let loaded = Session::load(path).unwrap();
        assert!(loaded.is_logged_in());
        assert_eq!(loaded.user_id(), Some(7));
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let path = path.to_str().unwrap();

        let mut session = Session {
            token: Some("abc123".to_string()),
            user: Some(sample_user()),
        };
        session.save(path).unwrap();
        session.clear(path).unwrap();

        assert!(!session.is_logged_in());
        assert!(Session::load(path).unwrap().user.is_none());

        // Clearing an already-cleared session stays quiet.
        session.clear(path).unwrap();
    }
}
