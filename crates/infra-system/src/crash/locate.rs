// Core dump locator
use ssm_env_core::domain::crash::DUMP_FILE_PATTERN;
use ssm_env_core::port::CrashReportError;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// First `core.*` file under `root`, as reported by `find`
///
/// # Errors
/// - CrashReportError::Search if `find` cannot run or exits non-zero
/// - CrashReportError::NotFound if `find` reports nothing
pub async fn locate_dump(root: &Path) -> Result<PathBuf, CrashReportError> {
    let output = Command::new("find")
        .arg(root)
        .arg("-name")
        .arg(DUMP_FILE_PATTERN)
        .output()
        .await
        .map_err(|e| CrashReportError::Search(e.to_string()))?;

    if !output.status.success() {
        return Err(CrashReportError::Search(format!(
            "{};\noutput: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim_end()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    match stdout.lines().next().filter(|line| !line.is_empty()) {
        Some(first) => Ok(PathBuf::from(first)),
        None => Err(CrashReportError::NotFound(root.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_locate_nested_dump() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("app").join("crash");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("core.1234"), b"dump").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

        let found = locate_dump(dir.path()).await.unwrap();

        assert_eq!(found, nested.join("core.1234"));
    }

    #[tokio::test]
    async fn test_locate_empty_tree() {
        let dir = tempfile::tempdir().unwrap();

        let result = locate_dump(dir.path()).await;

        assert!(matches!(result, Err(CrashReportError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_locate_missing_root() {
        let dir = tempfile::tempdir().unwrap();

        let result = locate_dump(&dir.path().join("absent")).await;

        assert!(matches!(result, Err(CrashReportError::Search(_))));
    }
}
