// Launch Request
// Raw launcher options and their validation into a LaunchConfig

use crate::domain::procfile::DEFAULT_PROCFILE;
use crate::domain::{DumpUploadConfig, NamingMode};
use crate::error::{AppError, Result};
use std::path::PathBuf;

/// Launcher options as parsed from flags and environment
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    pub prefixes: Vec<String>,
    pub long_env_name: bool,
    pub no_expand: bool,
    /// Skip the parameter store entirely and only launch the command
    pub test_mode: bool,
    pub procfile: Option<String>,
    pub upload_dump: bool,
    pub bugsnag_api_key: Option<String>,
    pub dump_search_path: Option<String>,
    pub bugsnag_url: Option<String>,
    /// Command token followed by its arguments
    pub command: Vec<String>,
}

/// Validated launcher configuration
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub prefixes: Vec<String>,
    pub naming: NamingMode,
    pub expand: bool,
    pub test_mode: bool,
    pub procfile: PathBuf,
    pub command: Vec<String>,
    pub dump_upload: Option<DumpUploadConfig>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Validate a launch request before anything touches the store or the environment
///
/// Every missing crash-reporting field is reported at once.
pub fn validate_request(req: &LaunchRequest) -> Result<LaunchConfig> {
    if req.prefixes.iter().all(|p| p.is_empty()) {
        return Err(AppError::Validation("prefix is required".to_string()));
    }

    let dump_upload = if req.upload_dump {
        let mut missing = Vec::new();
        let api_key = present(&req.bugsnag_api_key);
        let search_path = present(&req.dump_search_path);
        let url = present(&req.bugsnag_url);

        if api_key.is_none() {
            missing.push("an API key is required for Bugsnag reporting");
        }
        if search_path.is_none() {
            missing.push("we need dumpSearchPath to know where the dump is");
        }
        if url.is_none() {
            missing.push("we need bugsnagUrl to know where to send the dump");
        }

        match (api_key, search_path, url) {
            (Some(api_key), Some(search_path), Some(url)) => Some(DumpUploadConfig {
                api_key: api_key.to_string(),
                dump_search_path: PathBuf::from(search_path),
                collector_url: url.to_string(),
            }),
            _ => return Err(AppError::Validation(missing.join("\n"))),
        }
    } else {
        None
    };

    if req.command.is_empty() {
        return Err(AppError::Validation("command not specified".to_string()));
    }

    Ok(LaunchConfig {
        prefixes: req
            .prefixes
            .iter()
            .filter(|p| !p.is_empty())
            .cloned()
            .collect(),
        naming: if req.long_env_name {
            NamingMode::Long
        } else {
            NamingMode::Short
        },
        expand: !req.no_expand,
        test_mode: req.test_mode,
        procfile: PathBuf::from(present(&req.procfile).unwrap_or(DEFAULT_PROCFILE)),
        command: req.command.clone(),
        dump_upload,
    })
}
