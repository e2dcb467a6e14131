// ssm-env Infrastructure - System Adapters
// Implements: EnvStore, ManifestSource, ProcessLauncher, CrashReporter

pub mod crash;
pub mod env;
pub mod manifest;
#[cfg(unix)]
pub mod process_launcher;

pub use crash::{locate_dump, DumpReporter, MultipartUploader};
pub use env::ProcessEnv;
pub use manifest::FsManifestSource;
#[cfg(unix)]
pub use process_launcher::TokioProcessLauncher;
