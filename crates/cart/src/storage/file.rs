//! File-backed key-value store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use super::{KeyValueStore, StorageError};

/// Key-value store keeping one file per key under a directory.
///
/// File names are the URL-safe base64 encoding of the key, since keys such as
/// `@RocketShoes:cart` contain characters some filesystems reject. Values are
/// written to a sibling temp file and renamed into place, so readers see
/// either the old blob or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.json", URL_SAFE_NO_PAD.encode(key.as_bytes())))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        tracing::trace!(path = %path.display(), bytes = value.len(), "Wrote storage entry");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    /// Store rooted at a not-yet-created directory inside `tmp`.
    fn temp_store(tmp: &TempDir) -> FileStore {
        FileStore::new(tmp.path().join("cart"))
    }

    #[test]
    fn test_get_before_any_write() {
        let tmp = TempDir::new().unwrap();
        let store = temp_store(&tmp);
        assert_eq!(store.get("@RocketShoes:cart").unwrap(), None);
        assert!(!store.dir().exists());
    }

    #[test]
    fn test_set_creates_dir_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let store = temp_store(&tmp);

        store.set("@RocketShoes:cart", "[]").unwrap();
        store.set("@RocketShoes:cart", "[{\"id\":1}]").unwrap();

        assert_eq!(
            store.get("@RocketShoes:cart").unwrap().as_deref(),
            Some("[{\"id\":1}]")
        );
        assert!(!store.path_for("@RocketShoes:cart").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_name_is_filesystem_safe() {
        let store = FileStore::new("/data");
        let name = store
            .path_for("@RocketShoes:cart")
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(name.ends_with(".json"));
        assert!(!name.contains(':'));
        assert!(!name.contains('@'));
        assert!(!name.contains('/'));
    }

    #[test]
    fn test_keys_do_not_collide() {
        let tmp = TempDir::new().unwrap();
        let store = temp_store(&tmp);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("2"));
    }
}
