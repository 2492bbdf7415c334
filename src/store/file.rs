// Filesystem-backed local store.
// Each key lives in its own file, written atomically via temp file + rename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::LocalStore;
use super::paths::key_path;

/// Key-value store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        read_text(&key_path(&self.dir, key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        write_text(&key_path(&self.dir, key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = key_path(&self.dir, key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Write text to a file atomically.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read a text file, `None` if it does not exist.
pub fn read_text(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    Ok(Some(contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("store"));

        store.set("theme", "dark").unwrap();

        assert_eq!(store.get("theme").unwrap(), Some("dark".to_string()));
        assert!(temp_dir.path().join("store/theme.json").exists());
        assert!(!temp_dir.path().join("store/theme.tmp").exists());
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("github-last-update", "1").unwrap();
        store.set("github-last-update", "2").unwrap();

        assert_eq!(
            store.get("github-last-update").unwrap(),
            Some("2".to_string())
        );
    }

    #[test]
    fn test_missing_key_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(store.get("missing").unwrap().is_none());
        // Removing an absent key is not an error
        store.remove("missing").unwrap();

        store.set("dashboard-url", "https://example.com").unwrap();
        store.remove("dashboard-url").unwrap();
        assert!(store.get("dashboard-url").unwrap().is_none());
    }
}
