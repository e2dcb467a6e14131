// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    RemoteFetch(#[from] crate::port::StoreError),

    #[error("Error setting env params: {0}")]
    Env(#[from] crate::port::EnvError),

    #[error("{0}")]
    ManifestRead(#[from] crate::port::ManifestReadError),

    #[error("{0}")]
    Supervisor(#[from] crate::port::SupervisorError),

    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),
}

impl AppError {
    /// Outcome of the child, when the run failed because the child failed
    pub fn child_outcome(&self) -> Option<crate::domain::ExitOutcome> {
        match self {
            AppError::Supervisor(crate::port::SupervisorError::ChildExit(outcome)) => {
                Some(*outcome)
            }
            _ => None,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
