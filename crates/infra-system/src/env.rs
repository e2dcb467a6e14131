// Process environment adapter
use ssm_env_core::port::env_store::validate_assignment;
use ssm_env_core::port::{EnvError, EnvStore};

/// The real process environment
///
/// Writes must finish before any child is spawned; the launcher runs on a
/// current-thread runtime so no other thread reads the table concurrently.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvStore for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set(&self, name: &str, value: &str) -> Result<(), EnvError> {
        validate_assignment(name, value)?;
        std::env::set_var(name, value);
        Ok(())
    }

    fn snapshot(&self) -> Vec<(String, String)> {
        // Non-UTF-8 entries cannot be referenced by name, skip them
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let env = ProcessEnv;
        env.set("SSM_ENV_INFRA_TEST_VAR", "value").unwrap();

        assert_eq!(env.get("SSM_ENV_INFRA_TEST_VAR"), Some("value".to_string()));
        assert!(env
            .snapshot()
            .contains(&("SSM_ENV_INFRA_TEST_VAR".to_string(), "value".to_string())));
    }

    #[test]
    fn test_rejects_invalid_name() {
        let result = ProcessEnv.set("BAD=NAME", "value");

        assert_eq!(result, Err(EnvError::InvalidName("BAD=NAME".to_string())));
    }
}
