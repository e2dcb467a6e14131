// Parameter Store Port
// Abstraction over the remote hierarchical key/value store (e.g. SSM Parameter Store)

use crate::domain::Parameter;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// One page of a paginated listing
#[derive(Debug, Clone, Default)]
pub struct ParameterPage {
    pub parameters: Vec<Parameter>,
    /// Continuation token, None when the listing is exhausted
    pub next_token: Option<String>,
}

/// Remote fetch errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Error loading parameters under {path}: {message}")]
    Fetch { path: String, message: String },

    #[error("Malformed parameter under {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Unable to configure parameter store client: {0}")]
    Configuration(String),
}

/// Parameter store trait
///
/// Implementations:
/// - SsmParameterStore: AWS Systems Manager Parameter Store
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// List one page of parameters recursively under `path`, decrypting secure values
    ///
    /// # Arguments
    /// * `path` - Key prefix to list under
    /// * `next_token` - Continuation token from the previous page, None for the first page
    ///
    /// # Errors
    /// - StoreError::Fetch if the store is unreachable or rejects the request
    /// - StoreError::Malformed if an entry is missing its name or value
    async fn list_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> Result<ParameterPage, StoreError>;
}

/// Builds a store client on demand, so runs that never touch the store skip client setup
#[async_trait]
pub trait ParameterStoreFactory: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn ParameterStore>, StoreError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock store serving pre-built pages per path
    #[derive(Default)]
    pub struct MockParameterStore {
        pages: Mutex<HashMap<String, Vec<Vec<Parameter>>>>,
        failures: Mutex<HashMap<String, String>>,
        calls: Mutex<Vec<(String, Option<String>)>>,
    }

    impl MockParameterStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve `pages` for `path`, chained with generated continuation tokens
        pub fn with_pages(self, path: impl Into<String>, pages: Vec<Vec<Parameter>>) -> Self {
            self.pages.lock().unwrap().insert(path.into(), pages);
            self
        }

        /// Fail every listing under `path`
        pub fn with_failure(self, path: impl Into<String>, message: impl Into<String>) -> Self {
            self.failures
                .lock()
                .unwrap()
                .insert(path.into(), message.into());
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls(&self) -> Vec<(String, Option<String>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn page_token(index: usize) -> String {
        format!("page-{}", index)
    }

    #[async_trait]
    impl ParameterStore for MockParameterStore {
        async fn list_by_path(
            &self,
            path: &str,
            next_token: Option<String>,
        ) -> Result<ParameterPage, StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push((path.to_string(), next_token.clone()));

            if let Some(message) = self.failures.lock().unwrap().get(path) {
                return Err(StoreError::Fetch {
                    path: path.to_string(),
                    message: message.clone(),
                });
            }

            let index = match next_token {
                None => 0,
                Some(token) => token
                    .strip_prefix("page-")
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(|| StoreError::Fetch {
                        path: path.to_string(),
                        message: format!("invalid next token: {}", token),
                    })?,
            };

            let pages = self.pages.lock().unwrap();
            let Some(path_pages) = pages.get(path) else {
                return Ok(ParameterPage::default());
            };

            let parameters = path_pages.get(index).cloned().unwrap_or_default();
            let next_token = (index + 1 < path_pages.len()).then(|| page_token(index + 1));

            Ok(ParameterPage {
                parameters,
                next_token,
            })
        }
    }

    /// Factory handing out a shared mock store
    pub struct MockStoreFactory {
        store: Arc<MockParameterStore>,
        connects: Mutex<usize>,
    }

    impl MockStoreFactory {
        pub fn new(store: Arc<MockParameterStore>) -> Self {
            Self {
                store,
                connects: Mutex::new(0),
            }
        }

        pub fn connect_count(&self) -> usize {
            *self.connects.lock().unwrap()
        }
    }

    #[async_trait]
    impl ParameterStoreFactory for MockStoreFactory {
        async fn connect(&self) -> Result<Arc<dyn ParameterStore>, StoreError> {
            *self.connects.lock().unwrap() += 1;
            Ok(self.store.clone())
        }
    }
}
