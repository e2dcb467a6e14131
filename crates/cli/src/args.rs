// Command-line arguments, each mirrored by an environment variable

use clap::builder::FalseyValueParser;
use clap::Parser;
use ssm_env_core::application::LaunchRequest;

#[derive(Parser, Debug)]
#[command(name = "ssm-env")]
#[command(about = "Run a command with SSM parameters exposed as environment variables", long_about = None)]
#[command(override_usage = "ssm-env [global options] -p prefix command [command arguments]")]
#[command(version)]
pub struct Cli {
    /// Key prefix to load parameters from (repeatable; comma-separated in the environment)
    #[arg(short = 'p', long = "prefix", env = "PARAMS_PREFIX", value_delimiter = ',')]
    pub prefix: Vec<String>,

    /// Enable debug logging
    #[arg(long, env = "PARAMS_DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,

    /// Discard all log output
    #[arg(long, env = "PARAMS_SILENT", value_parser = FalseyValueParser::new())]
    pub silent: bool,

    /// Name variables after their full path below the prefix
    #[arg(long = "long-env-name", env = "LONG_ENV_NAME", value_parser = FalseyValueParser::new())]
    pub long_env_name: bool,

    /// Procfile used to resolve the command name
    #[arg(long, env = "PROCFILE")]
    pub procfile: Option<String>,

    /// Skip the parameter store and only run the command
    #[arg(long = "test", env = "SSM_ENV_TEST", value_parser = FalseyValueParser::new())]
    pub test: bool,

    /// Do not expand $VAR references in the environment
    #[arg(long = "no-expand", env = "NO_EXPAND", value_parser = FalseyValueParser::new())]
    pub no_expand: bool,

    /// Upload the core dump to Bugsnag when the command crashes
    #[arg(long = "uploadDump", env = "UPLOAD_DUMP", value_parser = FalseyValueParser::new())]
    pub upload_dump: bool,

    /// Bugsnag API key
    #[arg(long = "bugsnagApiKey", env = "BUGSNAG_API_KEY", hide_env_values = true)]
    pub bugsnag_api_key: Option<String>,

    /// Directory searched for `core.*` dumps
    #[arg(long = "dumpSearchPath", env = "DUMP_SEARCH_PATH")]
    pub dump_search_path: Option<String>,

    /// Bugsnag minidump collector base URL
    #[arg(long = "bugsnagUrl", env = "BUGSNAG_URL")]
    pub bugsnag_url: Option<String>,

    /// Command (or Procfile entry) to run, followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    pub fn into_request(self) -> LaunchRequest {
        LaunchRequest {
            prefixes: self.prefix,
            long_env_name: self.long_env_name,
            no_expand: self.no_expand,
            test_mode: self.test,
            procfile: self.procfile.map(|p| shellexpand::tilde(&p).into_owned()),
            upload_dump: self.upload_dump,
            bugsnag_api_key: self.bugsnag_api_key,
            dump_search_path: self
                .dump_search_path
                .map(|p| shellexpand::tilde(&p).into_owned()),
            bugsnag_url: self.bugsnag_url,
            command: self.command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_prefixes_and_command() {
        let cli = Cli::try_parse_from([
            "ssm-env", "-p", "/app/prod", "--prefix", "/app/shared", "node", "server.js",
        ])
        .unwrap();

        assert_eq!(cli.prefix, vec!["/app/prod", "/app/shared"]);
        assert_eq!(cli.command, vec!["node", "server.js"]);
    }

    #[test]
    fn test_command_args_may_start_with_dash() {
        let cli =
            Cli::try_parse_from(["ssm-env", "-p", "/app", "ls", "-la", "--color"]).unwrap();

        assert_eq!(cli.command, vec!["ls", "-la", "--color"]);
    }

    #[test]
    fn test_flags_before_command() {
        let cli = Cli::try_parse_from([
            "ssm-env",
            "--long-env-name",
            "--no-expand",
            "--uploadDump",
            "--bugsnagApiKey",
            "key",
            "-p",
            "/app",
            "web",
        ])
        .unwrap();

        assert!(cli.long_env_name);
        assert!(cli.no_expand);
        assert!(cli.upload_dump);
        assert_eq!(cli.bugsnag_api_key.as_deref(), Some("key"));
        assert_eq!(cli.command, vec!["web"]);
    }

    #[test]
    fn test_into_request_expands_tilde() {
        let cli = Cli::try_parse_from([
            "ssm-env",
            "-p",
            "/app",
            "--procfile",
            "~/Procfile",
            "--test",
            "web",
        ])
        .unwrap();

        let req = cli.into_request();

        assert!(req.test_mode);
        assert!(!req.procfile.unwrap().starts_with('~'));
    }
}
