// Port Layer - Interfaces for external dependencies

pub mod crash_reporter;
pub mod env_store;
pub mod manifest;
pub mod parameter_store;
pub mod process;

// Re-exports
pub use crash_reporter::{CrashReportError, CrashReporter};
pub use env_store::{EnvError, EnvStore};
pub use manifest::{ManifestReadError, ManifestSource};
pub use parameter_store::{ParameterPage, ParameterStore, ParameterStoreFactory, StoreError};
pub use process::{ProcessEvent, ProcessLauncher, RunningProcess, SupervisorError};
