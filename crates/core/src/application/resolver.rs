// Parameter Resolver
// Lists every parameter under each prefix and writes them into the environment store

use crate::domain::{EnvironmentVariable, NamingMode, Parameter};
use crate::error::Result;
use crate::port::{EnvStore, ParameterStore};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves remote parameters into environment variables
pub struct ParameterResolver {
    store: Arc<dyn ParameterStore>,
    env: Arc<dyn EnvStore>,
    naming: NamingMode,
}

impl ParameterResolver {
    pub fn new(store: Arc<dyn ParameterStore>, env: Arc<dyn EnvStore>, naming: NamingMode) -> Self {
        Self { store, env, naming }
    }

    /// Resolve all prefixes in order
    ///
    /// Each prefix's variables are written to the environment store as soon as that
    /// prefix is fetched, so a later prefix overwrites an earlier one on name collision.
    /// The first failure aborts; variables already written stay written.
    ///
    /// # Returns
    /// Every variable written, in write order
    pub async fn resolve(&self, prefixes: &[String]) -> Result<Vec<EnvironmentVariable>> {
        let mut resolved = Vec::new();

        for prefix in prefixes {
            let parameters = self.fetch_all(prefix).await?;
            info!(
                prefix = %prefix,
                count = parameters.len(),
                "Loaded parameters"
            );

            for param in &parameters {
                let var = EnvironmentVariable::from_parameter(param, prefix, self.naming);
                self.env.set(&var.name, &var.value)?;
                debug!(name = %var.name, key = %param.name, "Set environment variable");
                resolved.push(var);
            }
        }

        Ok(resolved)
    }

    /// Follow continuation tokens until the store reports none remaining
    pub async fn fetch_all(&self, prefix: &str) -> Result<Vec<Parameter>> {
        let mut parameters = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self.store.list_by_path(prefix, next_token.take()).await?;
            parameters.extend(page.parameters);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Ok(parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::port::env_store::mocks::MemoryEnv;
    use crate::port::parameter_store::mocks::MockParameterStore;

    fn resolver(
        store: MockParameterStore,
        naming: NamingMode,
    ) -> (ParameterResolver, Arc<MockParameterStore>, Arc<MemoryEnv>) {
        let store = Arc::new(store);
        let env = Arc::new(MemoryEnv::new());
        (
            ParameterResolver::new(store.clone(), env.clone(), naming),
            store,
            env,
        )
    }

    #[tokio::test]
    async fn test_pagination_concatenates_pages() {
        let store = MockParameterStore::new().with_pages(
            "/app",
            vec![
                vec![Parameter::new("/app/A", "1")],
                vec![Parameter::new("/app/B", "2")],
                vec![Parameter::new("/app/C", "3")],
            ],
        );
        let (resolver, store, _env) = resolver(store, NamingMode::Short);

        let params = resolver.fetch_all("/app").await.unwrap();

        assert_eq!(params.len(), 3);
        assert_eq!(store.call_count(), 3);
        let tokens: Vec<Option<String>> = store.calls().into_iter().map(|(_, t)| t).collect();
        assert_eq!(
            tokens,
            vec![None, Some("page-1".to_string()), Some("page-2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_resolve_writes_environment() {
        let store = MockParameterStore::new().with_pages(
            "/app/prod",
            vec![vec![
                Parameter::new("/app/prod/DB_HOST", "db.internal"),
                Parameter::new("/app/prod/cache/URL", "redis://cache"),
            ]],
        );
        let (resolver, _store, env) = resolver(store, NamingMode::Long);

        let vars = resolver.resolve(&["/app/prod".to_string()]).await.unwrap();

        assert_eq!(vars.len(), 2);
        assert_eq!(env.get("DB_HOST").as_deref(), Some("db.internal"));
        assert_eq!(env.get("CACHE_URL").as_deref(), Some("redis://cache"));
    }

    #[tokio::test]
    async fn test_later_prefix_wins() {
        let store = MockParameterStore::new()
            .with_pages("/shared", vec![vec![Parameter::new("/shared/TOKEN", "old")]])
            .with_pages("/service", vec![vec![Parameter::new("/service/TOKEN", "new")]]);
        let (resolver, _store, env) = resolver(store, NamingMode::Short);

        resolver
            .resolve(&["/shared".to_string(), "/service".to_string()])
            .await
            .unwrap();

        assert_eq!(env.get("TOKEN").as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_without_rollback() {
        let store = MockParameterStore::new()
            .with_pages("/ok", vec![vec![Parameter::new("/ok/FIRST", "1")]])
            .with_failure("/broken", "AccessDenied")
            .with_pages("/never", vec![vec![Parameter::new("/never/LAST", "3")]]);
        let (resolver, store, env) = resolver(store, NamingMode::Short);

        let result = resolver
            .resolve(&[
                "/ok".to_string(),
                "/broken".to_string(),
                "/never".to_string(),
            ])
            .await;

        assert!(matches!(result, Err(AppError::RemoteFetch(_))));
        assert_eq!(env.get("FIRST").as_deref(), Some("1"));
        assert_eq!(env.get("LAST"), None);
        assert_eq!(store.call_count(), 2);
    }

    #[tokio::test]
    async fn test_invalid_variable_name_is_env_error() {
        let store = MockParameterStore::new()
            .with_pages("/app", vec![vec![Parameter::new("/app/BAD=NAME", "x")]]);
        let (resolver, _store, _env) = resolver(store, NamingMode::Short);

        let result = resolver.resolve(&["/app".to_string()]).await;

        assert!(matches!(result, Err(AppError::Env(_))));
    }
}
