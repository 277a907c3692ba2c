use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};

use crate::dirs::ensure_dir_exists;
use crate::filelock::{read_file_lock, remove_file_lock, write_file_lock};

/// A single durable slot holding the raw bearer token.
///
/// The token is opaque to the client; implementations store it unchanged, with
/// no expiry tracking and no encryption.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Token slot backed by a plain text file, shared by every process using the
/// same data directory. Concurrent writers resolve as last write wins.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Result<Option<String>> {
        let data = match read_file_lock(&self.path)
            .with_context(|| format!("read token file '{}'", self.path.display()))?
        {
            Some(data) => data,
            None => return Ok(None),
        };
        let token = String::from_utf8(data).context("decode token file as utf-8")?;
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }
        Ok(Some(token.to_string()))
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            ensure_dir_exists(dir)
                .with_context(|| format!("ensure token directory '{}'", dir.display()))?;
        }
        write_file_lock(&self.path, token.as_bytes())
            .with_context(|| format!("write token file '{}'", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        remove_file_lock(&self.path)
            .with_context(|| format!("remove token file '{}'", self.path.display()))
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_file_store() {
        let path = PathBuf::from("_test_quillctl_token");
        let _ = fs::remove_file(&path);

        let store = FileTokenStore::new(&path);
        assert!(store.get().unwrap().is_none());

        store.set("abc").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("abc"));

        // A second handle on the same slot sees the write
        let other = FileTokenStore::new(&path);
        assert_eq!(other.get().unwrap().as_deref(), Some("abc"));

        other.set("def").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("def"));

        store.clear().unwrap();
        assert!(other.get().unwrap().is_none());
        assert!(!path.exists());

        // Clearing an empty slot is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_blank_is_absent() {
        let path = PathBuf::from("_test_quillctl_token_blank");
        fs::write(&path, "  \n").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(store.get().unwrap().is_none());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::with_token("abc");
        assert_eq!(store.get().unwrap().as_deref(), Some("abc"));
        store.clear().unwrap();
        assert!(store.get().unwrap().is_none());
    }
}
