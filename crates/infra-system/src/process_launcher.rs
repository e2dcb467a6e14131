// Child process launcher
// Spawns with inherited stdio and merges OS signals and the child's exit into one stream
use async_trait::async_trait;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use ssm_env_core::domain::{ExitOutcome, ProcessSpec, TerminationSignal};
use ssm_env_core::port::{ProcessEvent, ProcessLauncher, RunningProcess, SupervisorError};

/// Launcher backed by `tokio::process`
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioProcessLauncher;

impl TokioProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for TokioProcessLauncher {
    fn launch(&self, spec: &ProcessSpec) -> Result<Box<dyn RunningProcess>, SupervisorError> {
        let start_error = |message: String| SupervisorError::ProcessStart {
            executable: spec.executable.clone(),
            message,
        };

        let (tx, rx) = mpsc::unbounded_channel();

        // Listeners go in before the spawn so no signal is missed
        let mut listeners = Vec::with_capacity(TerminationSignal::ALL.len());
        for term in TerminationSignal::ALL {
            let mut stream = match signal(SignalKind::from_raw(term.number())) {
                Ok(stream) => stream,
                Err(e) => {
                    abort_all(&listeners);
                    return Err(start_error(format!("cannot listen for {}: {}", term, e)));
                }
            };
            let tx = tx.clone();
            listeners.push(tokio::spawn(async move {
                while stream.recv().await.is_some() {
                    if tx.send(ProcessEvent::Signal(term)).is_err() {
                        break;
                    }
                }
            }));
        }

        let mut child = match Command::new(&spec.executable)
            .args(&spec.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                abort_all(&listeners);
                return Err(start_error(e.to_string()));
            }
        };

        let pid = child.id();
        debug!(pid = ?pid, command = %spec, "Spawned child process");

        let waiter = tokio::spawn(async move {
            let event = match child.wait().await {
                Ok(status) => ProcessEvent::Exited(outcome_from_status(status)),
                Err(e) => ProcessEvent::WaitFailed(e.to_string()),
            };
            let _ = tx.send(event);
        });

        Ok(Box::new(TokioProcess {
            pid,
            events: rx,
            listeners,
            waiter,
        }))
    }
}

/// A running child plus its signal listeners
struct TokioProcess {
    pid: Option<u32>,
    events: mpsc::UnboundedReceiver<ProcessEvent>,
    listeners: Vec<JoinHandle<()>>,
    waiter: JoinHandle<()>,
}

#[async_trait]
impl RunningProcess for TokioProcess {
    fn pid(&self) -> Option<u32> {
        self.pid
    }

    async fn next_event(&mut self) -> Option<ProcessEvent> {
        self.events.recv().await
    }

    fn forward_signal(&self, term: TerminationSignal) -> Result<(), SupervisorError> {
        let forward_error = |message: String| SupervisorError::SignalForward {
            signal: term,
            message,
        };

        let pid = self
            .pid
            .ok_or_else(|| forward_error("child process id unknown".to_string()))?;
        let pid = i32::try_from(pid).map_err(|e| forward_error(e.to_string()))?;
        let sig = Signal::try_from(term.number()).map_err(|e| forward_error(e.to_string()))?;

        kill(Pid::from_raw(pid), sig).map_err(|e| forward_error(e.to_string()))
    }
}

impl Drop for TokioProcess {
    fn drop(&mut self) {
        abort_all(&self.listeners);
        self.waiter.abort();
    }
}

fn abort_all(handles: &[JoinHandle<()>]) {
    for handle in handles {
        handle.abort();
    }
}

/// Exit code when the child exited, otherwise the terminating signal
fn outcome_from_status(status: ExitStatus) -> ExitOutcome {
    match (status.code(), status.signal()) {
        (Some(code), _) => ExitOutcome::Exited(code),
        (None, Some(sig)) => ExitOutcome::Signaled(sig),
        (None, None) => ExitOutcome::Exited(-1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_exit_code() {
        assert_eq!(
            outcome_from_status(ExitStatus::from_raw(3 << 8)),
            ExitOutcome::Exited(3)
        );
    }

    #[test]
    fn test_outcome_from_signal() {
        assert_eq!(
            outcome_from_status(ExitStatus::from_raw(15)),
            ExitOutcome::Signaled(15)
        );
    }

    #[tokio::test]
    async fn test_launch_and_exit() {
        let mut child = TokioProcessLauncher::new()
            .launch(&ProcessSpec::new("sh", vec!["-c".to_string(), "exit 4".to_string()]))
            .unwrap();

        assert!(child.pid().is_some());
        assert_eq!(
            child.next_event().await,
            Some(ProcessEvent::Exited(ExitOutcome::Exited(4)))
        );
    }

    #[tokio::test]
    async fn test_launch_missing_executable() {
        let result =
            TokioProcessLauncher::new().launch(&ProcessSpec::new("/nonexistent/ssm-env-bin", vec![]));

        assert!(matches!(result, Err(SupervisorError::ProcessStart { .. })));
    }

    #[tokio::test]
    async fn test_forward_signal_to_child() {
        let mut child = TokioProcessLauncher::new()
            .launch(&ProcessSpec::new("sleep", vec!["5".to_string()]))
            .unwrap();
        // Let the child reach exec so it has default signal dispositions
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        child.forward_signal(TerminationSignal::Terminate).unwrap();

        assert_eq!(
            child.next_event().await,
            Some(ProcessEvent::Exited(ExitOutcome::Signaled(15)))
        );
    }
}
