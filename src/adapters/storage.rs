use crate::domain::ports::ArtifactStore;
use crate::utils::error::GatewayError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads the model artifact from a fixed filesystem path.
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    path: PathBuf,
}

impl LocalArtifactStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactStore for LocalArtifactStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<Vec<u8>, GatewayError> {
        tracing::debug!("Reading model artifact from {}", self.path.display());
        fs::read(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => GatewayError::ArtifactNotFoundError {
                path: self.location(),
            },
            _ => GatewayError::ArtifactCorruptError {
                path: self.location(),
                reason: e.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("final_model.json");
        fs::write(&path, b"{}").unwrap();

        let store = LocalArtifactStore::new(&path);
        assert_eq!(store.read().unwrap(), b"{}");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(dir.path().join("absent.json"));

        match store.read() {
            Err(GatewayError::ArtifactNotFoundError { path }) => {
                assert!(path.ends_with("absent.json"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_directory_is_not_a_readable_artifact() {
        let dir = TempDir::new().unwrap();
        let store = LocalArtifactStore::new(dir.path());

        assert!(matches!(
            store.read(),
            Err(GatewayError::ArtifactCorruptError { .. })
        ));
    }
}
