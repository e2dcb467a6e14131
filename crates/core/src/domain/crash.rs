// Crash Dump Domain Model

use std::path::PathBuf;

/// Multipart field name the minidump collector expects
pub const DUMP_FIELD_NAME: &str = "upload_file_minidump";

/// File-name pattern of core dumps, as understood by `find -name`
pub const DUMP_FILE_PATTERN: &str = "core.*";

/// Settings for uploading crash dumps of signaled children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpUploadConfig {
    pub api_key: String,
    pub dump_search_path: PathBuf,
    pub collector_url: String,
}

impl DumpUploadConfig {
    /// Minidump endpoint, authenticated with the API key
    pub fn upload_url(&self) -> String {
        format!(
            "{}/minidump?api_key={}",
            self.collector_url.trim_end_matches('/'),
            self.api_key
        )
    }
}

/// Result of one crash dump upload attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashDumpReport {
    pub dump_path: PathBuf,
    /// Collector response body
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_url() {
        let config = DumpUploadConfig {
            api_key: "abc123".to_string(),
            dump_search_path: PathBuf::from("/var/crash"),
            collector_url: "https://notify.bugsnag.com/".to_string(),
        };

        assert_eq!(
            config.upload_url(),
            "https://notify.bugsnag.com/minidump?api_key=abc123"
        );
    }
}
