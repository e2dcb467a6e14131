// Manifest Source Port
// Loads the Procfile used to resolve command names

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The manifest exists but could not be read
#[derive(Error, Debug)]
#[error("Unable to read Procfile {path}: {message}")]
pub struct ManifestReadError {
    pub path: PathBuf,
    pub message: String,
}

pub trait ManifestSource: Send + Sync {
    /// Read the manifest at `path`
    ///
    /// # Returns
    /// None when no file exists at `path`
    fn load(&self, path: &Path) -> Result<Option<String>, ManifestReadError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;

    /// Manifest with fixed content (or none, or unreadable)
    pub enum StaticManifest {
        Missing,
        Content(String),
        Unreadable(String),
    }

    impl StaticManifest {
        pub fn content(content: impl Into<String>) -> Self {
            StaticManifest::Content(content.into())
        }
    }

    impl ManifestSource for StaticManifest {
        fn load(&self, path: &Path) -> Result<Option<String>, ManifestReadError> {
            match self {
                StaticManifest::Missing => Ok(None),
                StaticManifest::Content(content) => Ok(Some(content.clone())),
                StaticManifest::Unreadable(message) => Err(ManifestReadError {
                    path: path.to_path_buf(),
                    message: message.clone(),
                }),
            }
        }
    }
}
