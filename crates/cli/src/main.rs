//! ssm-env - Run a command with AWS SSM parameters in its environment

mod args;
mod exit_codes;
mod logging;

use args::Cli;
use clap::Parser;
use ssm_env_core::application::LaunchService;
use ssm_env_infra_aws::SsmStoreFactory;
use ssm_env_infra_system::{DumpReporter, FsManifestSource, ProcessEnv, TokioProcessLauncher};
use std::sync::Arc;
use tracing::{debug, error};

// Single-threaded runtime: the environment is written while nothing else runs
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(exit_codes::VALIDATE_ARGS_ERROR);
        }
    };

    if let Err(e) = logging::init(cli.debug, cli.silent) {
        eprintln!("Failed to initialize logging: {:#}", e);
        std::process::exit(exit_codes::APP_RUN_ERROR);
    }

    debug!(version = ssm_env_core::VERSION, "ssm-env starting");

    let code = run(cli).await;
    std::process::exit(code);
}

async fn run(cli: Cli) -> i32 {
    let service = LaunchService::new(
        Arc::new(SsmStoreFactory::new()),
        Arc::new(ProcessEnv),
        Arc::new(FsManifestSource),
        Arc::new(TokioProcessLauncher::new()),
        Arc::new(DumpReporter::default()),
    );

    match service.run(cli.into_request()).await {
        Ok(outcome) => exit_codes::for_outcome(outcome),
        Err(e) => {
            // Printed even with --silent, which only discards the log
            if let Some(message) = exit_codes::error_message(&e) {
                error!("{}", e);
                eprintln!("{}", message);
            }
            exit_codes::for_error(&e)
        }
    }
}
