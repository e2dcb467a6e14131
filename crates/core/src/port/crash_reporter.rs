// Crash Reporter Port
// Locating core dumps and shipping them to a remote collector

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Crash reporting errors (logged, never change the run's exit status)
#[derive(Error, Debug)]
pub enum CrashReportError {
    #[error("Found 0 dumps at {0}")]
    NotFound(PathBuf),

    #[error("An error occurred while searching for the dump: {0}")]
    Search(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Unexpected response code: {status}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crash reporter trait
///
/// Implementations:
/// - DumpReporter: `find`-based locator + streaming multipart uploader
#[async_trait]
pub trait CrashReporter: Send + Sync {
    /// Find the first dump file under `root`
    ///
    /// # Errors
    /// - CrashReportError::NotFound if nothing matches
    /// - CrashReportError::Search if the search itself fails
    async fn locate(&self, root: &Path) -> Result<PathBuf, CrashReportError>;

    /// Upload `path` as the single multipart field `field_name`
    ///
    /// # Returns
    /// The collector's response body
    ///
    /// # Errors
    /// - CrashReportError::UnexpectedStatus for any status other than 202 Accepted
    /// - CrashReportError::Upload / Io if the request or the file read fails
    async fn upload(
        &self,
        field_name: &str,
        path: &Path,
        url: &str,
    ) -> Result<String, CrashReportError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Reporter with a fixed dump location and recorded uploads
    pub struct MockCrashReporter {
        dump: Option<PathBuf>,
        upload_status: u16,
        uploads: Mutex<Vec<(String, PathBuf, String)>>,
    }

    impl MockCrashReporter {
        pub fn with_dump(dump: impl Into<PathBuf>) -> Self {
            Self {
                dump: Some(dump.into()),
                upload_status: 202,
                uploads: Mutex::new(Vec::new()),
            }
        }

        pub fn without_dump() -> Self {
            Self {
                dump: None,
                upload_status: 202,
                uploads: Mutex::new(Vec::new()),
            }
        }

        /// Respond to uploads with `status`
        pub fn with_status(mut self, status: u16) -> Self {
            self.upload_status = status;
            self
        }

        pub fn uploads(&self) -> Vec<(String, PathBuf, String)> {
            self.uploads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CrashReporter for MockCrashReporter {
        async fn locate(&self, root: &Path) -> Result<PathBuf, CrashReportError> {
            self.dump
                .clone()
                .ok_or_else(|| CrashReportError::NotFound(root.to_path_buf()))
        }

        async fn upload(
            &self,
            field_name: &str,
            path: &Path,
            url: &str,
        ) -> Result<String, CrashReportError> {
            self.uploads.lock().unwrap().push((
                field_name.to_string(),
                path.to_path_buf(),
                url.to_string(),
            ));

            if self.upload_status != 202 {
                return Err(CrashReportError::UnexpectedStatus {
                    status: self.upload_status,
                    body: "rejected".to_string(),
                });
            }
            Ok("ok".to_string())
        }
    }
}
