// Crash reporting adapter - `find` locator + multipart uploader

mod locate;
mod upload;

pub use locate::locate_dump;
pub use upload::{MultipartUploader, CHUNK_SIZE, PIPE_CAPACITY};

use async_trait::async_trait;
use ssm_env_core::port::{CrashReportError, CrashReporter};
use std::path::{Path, PathBuf};

/// CrashReporter backed by the local filesystem and an HTTP collector
#[derive(Debug, Clone, Default)]
pub struct DumpReporter {
    uploader: MultipartUploader,
}

impl DumpReporter {
    pub fn new(uploader: MultipartUploader) -> Self {
        Self { uploader }
    }
}

#[async_trait]
impl CrashReporter for DumpReporter {
    async fn locate(&self, root: &Path) -> Result<PathBuf, CrashReportError> {
        locate_dump(root).await
    }

    async fn upload(
        &self,
        field_name: &str,
        path: &Path,
        url: &str,
    ) -> Result<String, CrashReportError> {
        self.uploader.send_file(field_name, path, url).await
    }
}
