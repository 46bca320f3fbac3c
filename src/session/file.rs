//! Session token kept in a JSON file.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{LoadResult, Session, SessionError, SessionStore};

/// Layout version written into every session file.
const FORMAT_VERSION: u32 = 1;

/// File name of the session inside the storage directory.
pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Serialize, Deserialize)]
struct Stored {
    version: u32,
    /// Seconds since the Unix epoch at which the login happened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    logged_in_at: Option<u64>,
    session: Session,
}

impl Stored {
    fn wrap(session: &Session) -> Self {
        let logged_in_at = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs());

        Self {
            version: FORMAT_VERSION,
            logged_in_at,
            session: session.clone(),
        }
    }
}

/// Keeps the bearer token in `<storage_dir>/session.json`.
///
/// The file is replaced through a sibling `.tmp` file and a rename, so a
/// crash never leaves half a token behind. On unix it is readable by the
/// owner only.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Stores the session at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Stores the session as `session.json` inside `storage_dir`.
    #[must_use]
    pub fn in_dir(storage_dir: impl AsRef<Path>) -> Self {
        Self::new(storage_dir.as_ref().join(SESSION_FILE_NAME))
    }

    /// Location of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(path: &Path, stored: &Stored) -> Result<(), SessionError> {
        let json = serde_json::to_vec_pretty(stored).map_err(SessionError::Serialize)?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(SessionError::Write)?;
        }

        let mut staging = path.as_os_str().to_owned();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        let mut file = owner_only()
            .open(&staging)
            .map_err(SessionError::Write)?;
        file.write_all(&json).map_err(SessionError::Write)?;
        file.sync_all().map_err(SessionError::Write)?;
        drop(file);

        std::fs::rename(&staging, path).map_err(SessionError::Write)
    }
}

#[cfg(unix)]
fn owner_only() -> std::fs::OpenOptions {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true).mode(0o600);
    options
}

#[cfg(not(unix))]
fn owner_only() -> std::fs::OpenOptions {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    options
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> LoadResult {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return LoadResult::NotFound,
            Err(e) => {
                return LoadResult::Corrupted {
                    reason: format!("unreadable: {e}"),
                };
            }
        };

        match serde_json::from_slice::<Stored>(&raw) {
            Ok(stored) if stored.version == FORMAT_VERSION => LoadResult::Loaded(stored.session),
            Ok(stored) => LoadResult::Corrupted {
                reason: format!("format version {} is not {FORMAT_VERSION}", stored.version),
            },
            Err(e) => LoadResult::Corrupted {
                reason: format!("not a session file: {e}"),
            },
        }
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        let path = self.path.clone();
        let stored = Stored::wrap(session);

        tokio::task::spawn_blocking(move || Self::write_file(&path, &stored))
            .await
            .map_err(|e| SessionError::Write(std::io::Error::other(e)))?
    }

    async fn clear(&self) -> Result<(), SessionError> {
        let path = self.path.clone();

        let removed = tokio::task::spawn_blocking(move || std::fs::remove_file(path))
            .await
            .map_err(|e| SessionError::Write(std::io::Error::other(e)))?;

        match removed {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(SessionError::Write(e)),
            _ => Ok(()),
        }
    }
}
