// Crash Report Service
// Locates and uploads the core dump of a child killed by a signal

use crate::domain::crash::DUMP_FIELD_NAME;
use crate::domain::{CrashDumpReport, DumpUploadConfig};
use crate::port::{CrashReportError, CrashReporter};
use std::sync::Arc;
use tracing::{error, info};

pub struct CrashReportService {
    reporter: Arc<dyn CrashReporter>,
    config: DumpUploadConfig,
}

impl CrashReportService {
    pub fn new(reporter: Arc<dyn CrashReporter>, config: DumpUploadConfig) -> Self {
        Self { reporter, config }
    }

    /// Locate the dump under the configured search path and upload it
    ///
    /// Failures are logged here and returned for inspection; callers must not let
    /// them change the run's exit status.
    pub async fn report(&self) -> Result<CrashDumpReport, CrashReportError> {
        let dump_path = match self.reporter.locate(&self.config.dump_search_path).await {
            Ok(path) => path,
            Err(e) => {
                error!(error = %e, "Failed to locate the core dump");
                return Err(e);
            }
        };

        info!(dump = %dump_path.display(), "Uploading core dump");

        match self
            .reporter
            .upload(DUMP_FIELD_NAME, &dump_path, &self.config.upload_url())
            .await
        {
            Ok(response) => {
                info!(dump = %dump_path.display(), "Sent the core dump to Bugsnag");
                Ok(CrashDumpReport {
                    dump_path,
                    response,
                })
            }
            Err(e) => {
                match &e {
                    CrashReportError::UnexpectedStatus { status, body } => error!(
                        status = %status,
                        body = %body,
                        "Failed to send the core dump"
                    ),
                    other => error!(error = %other, "Failed to send the core dump"),
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::crash_reporter::mocks::MockCrashReporter;
    use std::path::PathBuf;

    fn config() -> DumpUploadConfig {
        DumpUploadConfig {
            api_key: "key".to_string(),
            dump_search_path: PathBuf::from("/var/crash"),
            collector_url: "http://collector".to_string(),
        }
    }

    #[tokio::test]
    async fn test_report_uploads_located_dump() {
        let reporter = Arc::new(MockCrashReporter::with_dump("/var/crash/core.1234"));
        let service = CrashReportService::new(reporter.clone(), config());

        let report = service.report().await.unwrap();

        assert_eq!(report.dump_path, PathBuf::from("/var/crash/core.1234"));
        assert_eq!(
            reporter.uploads(),
            vec![(
                "upload_file_minidump".to_string(),
                PathBuf::from("/var/crash/core.1234"),
                "http://collector/minidump?api_key=key".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_report_without_dump() {
        let reporter = Arc::new(MockCrashReporter::without_dump());
        let service = CrashReportService::new(reporter.clone(), config());

        let result = service.report().await;

        assert!(matches!(result, Err(CrashReportError::NotFound(_))));
        assert!(reporter.uploads().is_empty());
    }

    #[tokio::test]
    async fn test_report_rejected_upload() {
        let reporter = Arc::new(MockCrashReporter::with_dump("/tmp/core.1").with_status(500));
        let service = CrashReportService::new(reporter, config());

        let result = service.report().await;

        assert!(matches!(
            result,
            Err(CrashReportError::UnexpectedStatus { status: 500, .. })
        ));
    }
}
