// Process Port
// Launching the child process and the merged stream of events observed while it runs

use crate::domain::{DomainError, ExitOutcome, ProcessSpec, TerminationSignal};
use async_trait::async_trait;
use thiserror::Error;

/// Events the supervisor reacts to, merged from the signal listeners and the waiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessEvent {
    /// The launcher itself received a termination signal
    Signal(TerminationSignal),
    /// The child finished
    Exited(ExitOutcome),
    /// Waiting on the child failed
    WaitFailed(String),
}

/// Supervision errors
#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Failed to start {executable}: {message}")]
    ProcessStart { executable: String, message: String },

    #[error("Error sending {signal} to child process: {message}")]
    SignalForward {
        signal: TerminationSignal,
        message: String,
    },

    #[error("Command failed: {0}")]
    ChildExit(ExitOutcome),

    #[error("Error waiting for child process: {0}")]
    Wait(String),

    #[error("Process event stream closed before the child exited")]
    EventStreamClosed,

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// A started child process
#[async_trait]
pub trait RunningProcess: Send {
    /// OS process id, if still known
    fn pid(&self) -> Option<u32>;

    /// Next signal or completion event, whichever resolves first
    ///
    /// Returns None once every event source has shut down.
    async fn next_event(&mut self) -> Option<ProcessEvent>;

    /// Deliver `signal` to the child unchanged
    ///
    /// # Errors
    /// - SupervisorError::SignalForward if the child is gone or cannot be signaled
    fn forward_signal(&self, signal: TerminationSignal) -> Result<(), SupervisorError>;
}

/// Process launcher trait
///
/// Implementations:
/// - TokioProcessLauncher: spawns with inherited stdio and relays OS signals
pub trait ProcessLauncher: Send + Sync {
    /// Start `spec` without waiting for it to finish
    ///
    /// # Errors
    /// - SupervisorError::ProcessStart if the executable is missing or cannot run
    fn launch(&self, spec: &ProcessSpec) -> Result<Box<dyn RunningProcess>, SupervisorError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Child process replaying a fixed list of events
    pub struct ScriptedProcess {
        events: VecDeque<ProcessEvent>,
        forwarded: Arc<Mutex<Vec<TerminationSignal>>>,
        forward_error: Option<String>,
    }

    impl ScriptedProcess {
        pub fn new(events: Vec<ProcessEvent>) -> Self {
            Self {
                events: events.into(),
                forwarded: Arc::new(Mutex::new(Vec::new())),
                forward_error: None,
            }
        }

        /// Make every forward attempt fail with `message`
        pub fn failing_forward(mut self, message: impl Into<String>) -> Self {
            self.forward_error = Some(message.into());
            self
        }

        /// Handle to the signals forwarded so far
        pub fn forwarded(&self) -> Arc<Mutex<Vec<TerminationSignal>>> {
            self.forwarded.clone()
        }
    }

    #[async_trait]
    impl RunningProcess for ScriptedProcess {
        fn pid(&self) -> Option<u32> {
            Some(4242)
        }

        async fn next_event(&mut self) -> Option<ProcessEvent> {
            self.events.pop_front()
        }

        fn forward_signal(&self, signal: TerminationSignal) -> Result<(), SupervisorError> {
            if let Some(message) = &self.forward_error {
                return Err(SupervisorError::SignalForward {
                    signal,
                    message: message.clone(),
                });
            }
            self.forwarded.lock().unwrap().push(signal);
            Ok(())
        }
    }

    /// Launcher handing out one scripted process
    pub struct MockLauncher {
        process: Mutex<Option<ScriptedProcess>>,
        start_error: Option<String>,
        launched: Mutex<Vec<ProcessSpec>>,
    }

    impl MockLauncher {
        pub fn new(process: ScriptedProcess) -> Self {
            Self {
                process: Mutex::new(Some(process)),
                start_error: None,
                launched: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                process: Mutex::new(None),
                start_error: Some(message.into()),
                launched: Mutex::new(Vec::new()),
            }
        }

        pub fn launched(&self) -> Vec<ProcessSpec> {
            self.launched.lock().unwrap().clone()
        }
    }

    impl ProcessLauncher for MockLauncher {
        fn launch(&self, spec: &ProcessSpec) -> Result<Box<dyn RunningProcess>, SupervisorError> {
            self.launched.lock().unwrap().push(spec.clone());

            if let Some(message) = &self.start_error {
                return Err(SupervisorError::ProcessStart {
                    executable: spec.executable.clone(),
                    message: message.clone(),
                });
            }

            let process = self
                .process
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| SupervisorError::ProcessStart {
                    executable: spec.executable.clone(),
                    message: "mock launcher already used".to_string(),
                })?;
            Ok(Box::new(process))
        }
    }
}
