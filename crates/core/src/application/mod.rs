// Application Layer - Use Cases

pub mod command;
pub mod crash_report;
pub mod expander;
pub mod launch;
pub mod resolver;
pub mod supervisor;

// Re-exports
pub use command::{resolve_command, CommandResolver};
pub use crash_report::CrashReportService;
pub use expander::{expand, expand_environment};
pub use launch::{validate_request, LaunchConfig, LaunchRequest, LaunchService};
pub use resolver::ParameterResolver;
pub use supervisor::Supervisor;
