// Process Supervisor
// Starts the child, relays termination signals until it exits, reports crashes

use crate::application::crash_report::CrashReportService;
use crate::domain::{ExitOutcome, ProcessSpec, SupervisedProcess};
use crate::port::{ProcessEvent, ProcessLauncher, RunningProcess, SupervisorError};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Supervisor for a single child process
pub struct Supervisor {
    launcher: Arc<dyn ProcessLauncher>,
    crash_reports: Option<CrashReportService>,
}

impl Supervisor {
    pub fn new(launcher: Arc<dyn ProcessLauncher>) -> Self {
        Self {
            launcher,
            crash_reports: None,
        }
    }

    /// Upload crash dumps of children killed by a non-interrupt signal
    pub fn with_crash_reports(mut self, crash_reports: CrashReportService) -> Self {
        self.crash_reports = Some(crash_reports);
        self
    }

    /// Run `spec` to completion
    ///
    /// Precondition: the environment the child inherits is final. Nothing may write
    /// to the environment store once this is called.
    ///
    /// # Returns
    /// `ExitOutcome::Exited(0)` when the child succeeds
    ///
    /// # Errors
    /// - SupervisorError::ProcessStart if the child cannot be started
    /// - SupervisorError::SignalForward if a relayed signal cannot be delivered
    /// - SupervisorError::ChildExit for a non-zero exit or a signal termination
    pub async fn run(&self, spec: ProcessSpec) -> Result<ExitOutcome, SupervisorError> {
        let mut process = SupervisedProcess::new(spec);
        process.start()?;

        let mut child = match self.launcher.launch(&process.spec) {
            Ok(child) => child,
            Err(e) => {
                process.fail_startup()?;
                error!(error = %e, "Failed to start child process");
                return Err(e);
            }
        };

        process.mark_running(child.pid())?;
        info!(command = %process.spec, pid = ?process.pid, "Child process started");

        let outcome = self.supervise(child.as_mut()).await?;
        process.finish(outcome)?;

        if outcome.is_success() {
            info!(pid = ?process.pid, "Child process exited successfully");
            return Ok(outcome);
        }

        if outcome.is_crash() {
            if let Some(crash_reports) = &self.crash_reports {
                // The report outcome is logged by the service and never replaces the exit error
                let _ = crash_reports.report().await;
            }
        }

        let err = SupervisorError::ChildExit(outcome);
        error!(error = %err, state = %process.state, "Command failed");
        Err(err)
    }

    /// Relay signals until the child's completion resolves
    async fn supervise(
        &self,
        child: &mut dyn RunningProcess,
    ) -> Result<ExitOutcome, SupervisorError> {
        loop {
            match child.next_event().await {
                Some(ProcessEvent::Signal(signal)) => {
                    if let Err(e) = child.forward_signal(signal) {
                        error!(error = %e, signal = %signal, "Error sending signal");
                        return Err(e);
                    }
                    debug!(signal = %signal, "Forwarded signal to child process");
                }
                Some(ProcessEvent::Exited(outcome)) => return Ok(outcome),
                Some(ProcessEvent::WaitFailed(message)) => {
                    return Err(SupervisorError::Wait(message))
                }
                None => return Err(SupervisorError::EventStreamClosed),
            }
        }
    }
}
