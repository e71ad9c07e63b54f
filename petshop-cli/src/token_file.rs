use std::fs;
use std::io;
use std::path::PathBuf;

use petshop_core::session::{StoreError, TokenStore, parse_token};

/// Токен в файле рядом с рабочим каталогом CLI.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_token(&raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read token file");
                None
            }
        }
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        fs::write(&self.path, token)
            .map_err(|err| StoreError::Write(format!("{}: {err}", self.path.display())))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Write(format!("{}: {err}", self.path.display()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_means_no_token() {
        let dir = TempDir::new().expect("temp dir");
        let store = FileTokenStore::new(dir.path().join("token"));
        assert!(store.load().is_none());
        assert!(store.clear().is_ok());
    }

    #[test]
    fn token_is_trimmed_and_blank_is_absent() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("token");
        let store = FileTokenStore::new(&path);

        fs::write(&path, "  abc.def.ghi \n").expect("write token");
        assert_eq!(store.load().as_deref(), Some("abc.def.ghi"));

        fs::write(&path, "   ").expect("write blank");
        assert!(store.load().is_none());
    }

    #[test]
    fn save_then_clear_removes_file() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("token");
        let store = FileTokenStore::new(&path);

        store.save("secret").expect("save token");
        assert_eq!(store.load().as_deref(), Some("secret"));

        store.clear().expect("clear token");
        assert!(!path.exists());
    }
}
