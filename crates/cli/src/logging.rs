// Logging setup (tracing-subscriber, stdout)

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Selects `json` or text output
pub const LOG_FORMAT_ENV: &str = "SSM_ENV_LOG_FORMAT";

const CRATE_TARGETS: [&str; 4] = [
    "ssm_env",
    "ssm_env_core",
    "ssm_env_infra_aws",
    "ssm_env_infra_system",
];

/// `warn` for dependencies, `level` for our own crates
fn default_directives(level: &str) -> String {
    std::iter::once("warn".to_string())
        .chain(CRATE_TARGETS.iter().map(|t| format!("{}={}", t, level)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber; `silent` leaves logging disabled
pub fn init(debug: bool, silent: bool) -> Result<()> {
    if silent {
        return Ok(());
    }

    let level = if debug { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(level)))?;

    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());

    match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stdout))
            .try_init()?,
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stdout))
            .try_init()?,
    }

    Ok(())
}
