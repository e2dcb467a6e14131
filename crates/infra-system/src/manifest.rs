// Filesystem Procfile source
use ssm_env_core::port::{ManifestReadError, ManifestSource};
use std::io::ErrorKind;
use std::path::Path;

/// Reads the Procfile from disk; a missing file is not an error
#[derive(Debug, Default, Clone, Copy)]
pub struct FsManifestSource;

impl ManifestSource for FsManifestSource {
    fn load(&self, path: &Path) -> Result<Option<String>, ManifestReadError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ManifestReadError {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }
}
