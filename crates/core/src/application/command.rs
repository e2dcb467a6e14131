// Command Resolver
// Maps the command token to the real executable, optionally through a Procfile

use crate::domain::procfile;
use crate::domain::ProcessSpec;
use crate::error::{AppError, Result};
use crate::port::ManifestSource;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Pick the process to run for `command` (token + args)
///
/// A matching manifest entry wins; otherwise the command line is used literally.
/// Returns None only for an empty command line.
pub fn resolve_command(command: &[String], manifest: Option<&str>) -> Option<ProcessSpec> {
    let (name, args) = command.split_first()?;

    if let Some(content) = manifest {
        let entries = procfile::parse(content);
        if let Some(spec) = procfile::find(&entries, name).and_then(|entry| entry.to_spec()) {
            return Some(spec);
        }
    }

    Some(ProcessSpec::new(name.clone(), args.to_vec()))
}

/// Command resolution backed by a manifest source
pub struct CommandResolver {
    manifests: Arc<dyn ManifestSource>,
}

impl CommandResolver {
    pub fn new(manifests: Arc<dyn ManifestSource>) -> Self {
        Self { manifests }
    }

    /// Resolve `command` against the Procfile at `procfile`
    ///
    /// # Errors
    /// - AppError::ManifestRead if the Procfile exists but cannot be read
    /// - AppError::Validation if `command` is empty
    pub fn resolve(&self, procfile: &Path, command: &[String]) -> Result<ProcessSpec> {
        let manifest = self.manifests.load(procfile)?;
        if manifest.is_none() {
            debug!(procfile = %procfile.display(), "No Procfile found, running command literally");
        }

        resolve_command(command, manifest.as_deref())
            .ok_or_else(|| AppError::Validation("command not specified".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::manifest::mocks::StaticManifest;

    fn cmd(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_manifest_entry_matches() {
        let spec = resolve_command(&cmd(&["web"]), Some("web: node server.js\n")).unwrap();

        assert_eq!(spec.executable, "node");
        assert_eq!(spec.args, vec!["server.js"]);
    }

    #[test]
    fn test_manifest_entry_ignores_extra_args() {
        let spec =
            resolve_command(&cmd(&["web", "--extra"]), Some("web: node server.js")).unwrap();

        assert_eq!(spec, ProcessSpec::new("node", cmd(&["server.js"])));
    }

    #[test]
    fn test_unmatched_token_falls_back_to_literal() {
        let spec =
            resolve_command(&cmd(&["rake", "db:migrate"]), Some("web: node server.js")).unwrap();

        assert_eq!(spec, ProcessSpec::new("rake", cmd(&["db:migrate"])));
    }

    #[test]
    fn test_no_manifest_is_literal() {
        let spec = resolve_command(&cmd(&["echo", "hi"]), None).unwrap();

        assert_eq!(spec, ProcessSpec::new("echo", cmd(&["hi"])));
    }

    #[test]
    fn test_empty_command() {
        assert!(resolve_command(&[], None).is_none());
    }

    #[test]
    fn test_resolver_unreadable_manifest_is_fatal() {
        let resolver = CommandResolver::new(Arc::new(StaticManifest::Unreadable(
            "permission denied".to_string(),
        )));

        let result = resolver.resolve(Path::new("Procfile"), &cmd(&["web"]));

        assert!(matches!(result, Err(AppError::ManifestRead(_))));
    }

    #[test]
    fn test_resolver_missing_manifest() {
        let resolver = CommandResolver::new(Arc::new(StaticManifest::Missing));

        let spec = resolver
            .resolve(Path::new("Procfile"), &cmd(&["web"]))
            .unwrap();

        assert_eq!(spec, ProcessSpec::new("web", vec![]));
    }
}
