// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid process state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_display() {
        let err = DomainError::InvalidStateTransition {
            from: "Created".to_string(),
            to: "Running".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Invalid process state transition: Created -> Running"
        );
    }
}
