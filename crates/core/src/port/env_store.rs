// Environment Store Port
// The process-wide environment table, injected instead of used as ambient state.
//
// Precondition: every write happens before the child process is spawned. The child
// inherits the table wholesale at spawn time and nothing writes to it afterwards.

use thiserror::Error;

/// Invalid environment writes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("Invalid environment variable name: {0:?}")]
    InvalidName(String),

    #[error("Invalid value for environment variable {0}")]
    InvalidValue(String),
}

/// Environment table trait
///
/// Implementations:
/// - ProcessEnv: the real process environment
/// - MemoryEnv: in-memory table for tests
pub trait EnvStore: Send + Sync {
    /// Current value of a variable
    fn get(&self, name: &str) -> Option<String>;

    /// Set (or overwrite) a variable
    ///
    /// # Errors
    /// - EnvError::InvalidName for empty names or names containing `=` or NUL
    /// - EnvError::InvalidValue for values containing NUL
    fn set(&self, name: &str, value: &str) -> Result<(), EnvError>;

    /// Copy of every variable currently set
    fn snapshot(&self) -> Vec<(String, String)>;
}

/// Check that an assignment is representable in a process environment
pub fn validate_assignment(name: &str, value: &str) -> Result<(), EnvError> {
    if name.is_empty() || name.contains('=') || name.contains('\0') {
        return Err(EnvError::InvalidName(name.to_string()));
    }
    if value.contains('\0') {
        return Err(EnvError::InvalidValue(name.to_string()));
    }
    Ok(())
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// In-memory environment table
    #[derive(Default)]
    pub struct MemoryEnv {
        vars: Mutex<BTreeMap<String, String>>,
    }

    impl MemoryEnv {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_vars<'a>(vars: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
            let env = Self::new();
            for (name, value) in vars {
                env.vars
                    .lock()
                    .unwrap()
                    .insert(name.to_string(), value.to_string());
            }
            env
        }
    }

    impl EnvStore for MemoryEnv {
        fn get(&self, name: &str) -> Option<String> {
            self.vars.lock().unwrap().get(name).cloned()
        }

        fn set(&self, name: &str, value: &str) -> Result<(), EnvError> {
            validate_assignment(name, value)?;
            self.vars
                .lock()
                .unwrap()
                .insert(name.to_string(), value.to_string());
            Ok(())
        }

        fn snapshot(&self) -> Vec<(String, String)> {
            self.vars
                .lock()
                .unwrap()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_assignment() {
        assert!(validate_assignment("DB_HOST", "localhost").is_ok());
        assert!(validate_assignment("EMPTY", "").is_ok());
        assert_eq!(
            validate_assignment("", "x"),
            Err(EnvError::InvalidName(String::new()))
        );
        assert!(validate_assignment("A=B", "x").is_err());
        assert!(validate_assignment("A", "x\0y").is_err());
    }
}
