//! Durable storage for the session token.
//!
//! The storefront persists exactly one value, the auth token, under
//! [`keys::AUTH_TOKEN`]. The file format is a JSON object of string values so
//! other keys can be added without migrating existing files.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use directories::ProjectDirs;
use secrecy::{ExposeSecret, SecretString};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::session::keys;

const SESSION_FILE_NAME: &str = "session.json";

/// Errors that can occur while reading or writing stored values.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Reading or writing the backing file failed.
    #[error("token storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("token storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// No platform data directory could be determined.
    #[error("no data directory available for token storage")]
    NoDataDir,
}

/// Storage for the session token.
///
/// Implementations are synchronous; calls are short local I/O.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self) -> Result<Option<SecretString>, TokenStoreError>;

    /// Store `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, token: &SecretString) -> Result<(), TokenStoreError>;

    /// Remove the stored token. Removing a missing token succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn remove(&self) -> Result<(), TokenStoreError>;
}

// =============================================================================
// FileTokenStore
// =============================================================================

/// Token storage in a JSON file.
///
/// Writes go to a uniquely named sibling temporary file that is renamed over
/// the target, so a crash mid-write leaves either the old or the new contents.
/// The file is readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store values in the file at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store values in the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns `TokenStoreError::NoDataDir` if the home directory is unknown.
    pub fn in_data_dir() -> Result<Self, TokenStoreError> {
        Self::default_path().map(Self::new)
    }

    /// `<data dir>/session.json` for this application.
    ///
    /// # Errors
    ///
    /// Returns `TokenStoreError::NoDataDir` if the home directory is unknown.
    pub fn default_path() -> Result<PathBuf, TokenStoreError> {
        ProjectDirs::from("com", "Yummeal", "yummeal")
            .map(|dirs| dirs.data_dir().join(SESSION_FILE_NAME))
            .ok_or(TokenStoreError::NoDataDir)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, TokenStoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_entries_for_update(&self) -> Result<BTreeMap<String, String>, TokenStoreError> {
        match self.read_entries() {
            Ok(entries) => Ok(entries),
            Err(TokenStoreError::Corrupt(e)) => {
                warn!(path = %self.path.display(), error = %e, "Replacing corrupt token storage");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), TokenStoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // Created with mode 0600 on Unix
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&serde_json::to_vec_pretty(entries)?)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), "Token storage written");
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<SecretString>, TokenStoreError> {
        Ok(self
            .read_entries()?
            .remove(keys::AUTH_TOKEN)
            .map(SecretString::from))
    }

    fn set(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        // Keep unrelated keys; a corrupt file is replaced.
        let mut entries = self.read_entries_for_update()?;
        entries.insert(
            keys::AUTH_TOKEN.to_string(),
            token.expose_secret().to_string(),
        );
        self.write_entries(&entries)
    }

    fn remove(&self) -> Result<(), TokenStoreError> {
        if !self.path.exists() {
            return Ok(());
        }

        let mut entries = self.read_entries_for_update()?;
        entries.remove(keys::AUTH_TOKEN);
        self.write_entries(&entries)
    }
}

// =============================================================================
// MemoryTokenStore
// =============================================================================

/// Token storage that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SecretString>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<SecretString>, TokenStoreError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn exposed(token: Option<SecretString>) -> Option<String> {
        token.map(|t| t.expose_secret().to_string())
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.get().unwrap().is_none());

        store.set(&SecretString::from("abc123")).unwrap();
        assert_eq!(exposed(store.get().unwrap()).as_deref(), Some("abc123"));

        let reopened = FileTokenStore::new(store.path());
        assert_eq!(exposed(reopened.get().unwrap()).as_deref(), Some("abc123"));

        store.remove().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_file_uses_token_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::new(&path);
        store.set(&SecretString::from("abc123")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["token"], "abc123");

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["session.json"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileTokenStore::new(&path);
        store.set(&SecretString::from("secret-token")).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "token file mode is {mode:o}");

        store.remove().unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0, "token file mode is {mode:o}");
    }

    #[test]
    fn test_set_keeps_other_keys_and_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        store.set(&SecretString::from("abc")).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["theme"], "dark");

        fs::write(&path, "not json").unwrap();
        store.set(&SecretString::from("def")).unwrap();
        assert_eq!(exposed(store.get().unwrap()).as_deref(), Some("def"));
    }

    #[test]
    fn test_set_propagates_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as a file
        let path = dir.path().join("session.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(
            store.set(&SecretString::from("abc")),
            Err(TokenStoreError::Io(_))
        ));
        assert!(path.join("keep").exists());
    }

    #[test]
    fn test_remove_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"token": "abc", "theme": "dark"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        store.remove().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("token").is_none());
        assert_eq!(raw["theme"], "dark");
    }

    #[test]
    fn test_remove_missing_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));
        store.remove().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(store.get(), Err(TokenStoreError::Corrupt(_))));

        store.remove().unwrap();
        assert!(store.get().unwrap().is_none());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::with_token("t-1");
        assert_eq!(exposed(store.get().unwrap()).as_deref(), Some("t-1"));

        store.set(&SecretString::from("t-2")).unwrap();
        assert_eq!(exposed(store.get().unwrap()).as_deref(), Some("t-2"));

        store.remove().unwrap();
        assert!(store.get().unwrap().is_none());
    }
}
