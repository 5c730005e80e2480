//! Persisted authentication session.
//!
//! The bearer token and the signed-in user survive restarts in a
//! `session.yml` file next to the configuration. Every request reads the
//! token afresh, so signing in or out takes effect on the next call.

use crate::api::{AuthResponse, User};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

pub const SESSION_FILE_NAME: &str = "session.yml";

/// Errors that can occur while reading or writing the session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Session file could not be read or written
    #[error("Session I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Stored session could not be parsed or encoded
    #[error("Session data is corrupt: {0}")]
    Corrupt(String),
}

/// Persisted session contents.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Backing storage for the session.
///
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<StoredSession>, SessionError>;
    fn save(&self, session: &StoredSession) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// Stores the session as YAML on disk.
///
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Returns a store for the session file inside the given directory.
    ///
    pub fn in_dir(dir: &Path) -> Self {
        FileSessionStore {
            path: dir.join(SESSION_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        if contents.trim().is_empty() {
            return Ok(None);
        }
        let session: StoredSession =
            serde_yaml::from_str(&contents).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        Ok(Some(session))
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        let content =
            serde_yaml::to_string(session).map_err(|e| SessionError::Corrupt(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        let mut file = fs::File::create(&self.path).map_err(|e| self.io_error(e))?;
        write!(file, "{}", content).map_err(|e| self.io_error(e))?;
        file.flush().map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| self.io_error(e))?;
        }
        Ok(())
    }
}

/// Keeps the session in memory only.
///
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Option<StoredSession>>,
}

impl MemorySessionStore {
    fn guard(&self) -> Result<std::sync::MutexGuard<'_, Option<StoredSession>>, SessionError> {
        self.inner
            .lock()
            .map_err(|_| SessionError::Corrupt("session lock poisoned".to_string()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        Ok(self.guard()?.clone())
    }

    fn save(&self, session: &StoredSession) -> Result<(), SessionError> {
        *self.guard()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.guard()? = None;
        Ok(())
    }
}

/// Shared handle to the current session.
///
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Session { store }
    }

    /// Session persisted in `session.yml` inside the given directory.
    ///
    pub fn from_dir(dir: &Path) -> Self {
        Session::new(Arc::new(FileSessionStore::in_dir(dir)))
    }

    /// Session that only lives as long as the process.
    ///
    pub fn in_memory() -> Self {
        Session::new(Arc::new(MemorySessionStore::default()))
    }

    /// Current bearer token, if signed in.
    ///
    pub fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.store.load()?.and_then(|s| s.token))
    }

    /// Signed-in user, if known.
    ///
    pub fn user(&self) -> Result<Option<User>, SessionError> {
        Ok(self.store.load()?.and_then(|s| s.user))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    /// Record a successful sign-in.
    ///
    pub fn set(&self, auth: &AuthResponse) -> Result<(), SessionError> {
        self.store.save(&StoredSession {
            token: Some(auth.token.clone()),
            user: Some(auth.user.clone()),
        })
    }

    /// Replace the stored user after a profile update, keeping the token.
    ///
    pub fn set_user(&self, user: &User) -> Result<(), SessionError> {
        let mut session = self.store.load()?.unwrap_or_default();
        session.user = Some(user.clone());
        self.store.save(&session)
    }

    /// Forget the token and user.
    ///
    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.clear()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::{Fake, Faker};

    fn auth() -> AuthResponse {
        AuthResponse {
            user: Faker.fake(),
            token: uuid::Uuid::new_v4().to_string(),
        }
    }

    #[test]
    fn test_memory_session_lifecycle() {
        let session = Session::in_memory();
        assert!(!session.is_authenticated());
        assert_eq!(session.token().unwrap(), None);

        let auth = auth();
        session.set(&auth).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token().unwrap(), Some(auth.token.clone()));
        assert_eq!(session.user().unwrap(), Some(auth.user.clone()));

        session.clear().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.user().unwrap(), None);
    }

    #[test]
    fn test_set_user_keeps_token() {
        let session = Session::in_memory();
        let auth = auth();
        session.set(&auth).unwrap();

        let mut user = auth.user.clone();
        user.name = "Renamed".to_string();
        session.set_user(&user).unwrap();

        assert_eq!(session.token().unwrap(), Some(auth.token));
        assert_eq!(session.user().unwrap().map(|u| u.name), Some("Renamed".to_string()));
    }

    #[test]
    fn test_file_session_persists_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let auth = auth();

        Session::from_dir(dir.path()).set(&auth).unwrap();
        let reopened = Session::from_dir(dir.path());
        assert_eq!(reopened.token().unwrap(), Some(auth.token));

        reopened.clear().unwrap();
        assert!(!dir.path().join(SESSION_FILE_NAME).exists());
        assert!(!Session::from_dir(dir.path()).is_authenticated());
    }

    #[test]
    fn test_file_session_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE_NAME), "token: [unclosed").unwrap();
        let store = FileSessionStore::in_dir(dir.path());
        assert!(matches!(store.load(), Err(SessionError::Corrupt(_))));
    }
}
