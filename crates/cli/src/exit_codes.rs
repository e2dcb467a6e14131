// Process exit codes

use ssm_env_core::domain::ExitOutcome;
use ssm_env_core::port::SupervisorError;
use ssm_env_core::AppError;

pub const SUCCESS: i32 = 0;
pub const APP_RUN_ERROR: i32 = -1;
pub const RUN_COMMAND_ERROR: i32 = -2;
pub const VALIDATE_ARGS_ERROR: i32 = -3;
pub const GET_PARAMETERS_ERROR: i32 = -4;

/// Exit code for a finished child: its own code, or 128 + signal
pub fn for_outcome(outcome: ExitOutcome) -> i32 {
    if outcome.is_success() {
        SUCCESS
    } else {
        outcome.exit_code()
    }
}

/// Exit code for a failed run
pub fn for_error(err: &AppError) -> i32 {
    match err {
        AppError::Validation(_) => VALIDATE_ARGS_ERROR,
        AppError::RemoteFetch(_) | AppError::Env(_) => GET_PARAMETERS_ERROR,
        AppError::ManifestRead(_) => RUN_COMMAND_ERROR,
        AppError::Supervisor(SupervisorError::ChildExit(outcome)) => for_outcome(*outcome),
        AppError::Supervisor(_) => RUN_COMMAND_ERROR,
        AppError::Domain(_) => APP_RUN_ERROR,
    }
}

/// Message printed to stderr when a run fails
///
/// None for child failures, which the supervisor already reported.
pub fn error_message(err: &AppError) -> Option<String> {
    match err.child_outcome() {
        Some(_) => None,
        None => Some(format!("ERROR: {}", err)),
    }
}
