// Domain Layer - Pure business logic and entities

pub mod crash;
pub mod error;
pub mod parameter;
pub mod process;
pub mod procfile;

// Re-exports
pub use crash::{CrashDumpReport, DumpUploadConfig};
pub use error::DomainError;
pub use parameter::{EnvironmentVariable, NamingMode, Parameter};
pub use process::{ExitOutcome, ProcessSpec, ProcessState, SupervisedProcess, TerminationSignal};
pub use procfile::ProcfileEntry;
