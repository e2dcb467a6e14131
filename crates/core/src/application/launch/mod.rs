// Launch Service - Resolve parameters into the environment, then run the command

pub mod request;


pub use request::{validate_request, LaunchConfig, LaunchRequest};

use crate::application::command::CommandResolver;
use crate::application::crash_report::CrashReportService;
use crate::application::expander::expand_environment;
use crate::application::resolver::ParameterResolver;
use crate::application::supervisor::Supervisor;
use crate::domain::ExitOutcome;
use crate::error::Result;
use crate::port::{CrashReporter, EnvStore, ManifestSource, ParameterStoreFactory, ProcessLauncher};
use std::sync::Arc;
use tracing::{debug, info};

/// End-to-end launcher use case
pub struct LaunchService {
    store_factory: Arc<dyn ParameterStoreFactory>,
    env: Arc<dyn EnvStore>,
    manifests: Arc<dyn ManifestSource>,
    launcher: Arc<dyn ProcessLauncher>,
    crash_reporter: Arc<dyn CrashReporter>,
}

impl LaunchService {
    pub fn new(
        store_factory: Arc<dyn ParameterStoreFactory>,
        env: Arc<dyn EnvStore>,
        manifests: Arc<dyn ManifestSource>,
        launcher: Arc<dyn ProcessLauncher>,
        crash_reporter: Arc<dyn CrashReporter>,
    ) -> Self {
        Self {
            store_factory,
            env,
            manifests,
            launcher,
            crash_reporter,
        }
    }

    /// Validate, populate the environment, resolve the command and supervise it
    ///
    /// Every environment write happens before the child is spawned.
    pub async fn run(&self, req: LaunchRequest) -> Result<ExitOutcome> {
        let config = validate_request(&req)?;

        if config.test_mode {
            info!("Test mode, skipping parameter store");
        } else {
            let store = self.store_factory.connect().await?;
            let resolver = ParameterResolver::new(store, self.env.clone(), config.naming);
            resolver.resolve(&config.prefixes).await?;

            if config.expand {
                let expanded = expand_environment(self.env.as_ref())?;
                debug!(count = expanded, "Expanded environment references");
            }
        }

        let spec = CommandResolver::new(self.manifests.clone())
            .resolve(&config.procfile, &config.command)?;

        let mut supervisor = Supervisor::new(self.launcher.clone());
        if let Some(dump_upload) = config.dump_upload {
            supervisor = supervisor.with_crash_reports(CrashReportService::new(
                self.crash_reporter.clone(),
                dump_upload,
            ));
        }

        Ok(supervisor.run(spec).await?)
    }
}
