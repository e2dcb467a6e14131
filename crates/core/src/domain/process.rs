// Process Domain Model
// ProcessSpec, relayed signals, exit outcomes and the supervised process lifecycle

use super::error::{DomainError, Result};

/// Executable and arguments resolved once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub executable: String,
    pub args: Vec<String>,
}

impl ProcessSpec {
    pub fn new(executable: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            args,
        }
    }
}

impl std::fmt::Display for ProcessSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.executable)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Termination-class signals relayed from the launcher to its child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationSignal {
    Hangup,
    Interrupt,
    Quit,
    Abort,
    Terminate,
}

impl TerminationSignal {
    /// Every signal the supervisor listens for
    pub const ALL: [TerminationSignal; 5] = [
        TerminationSignal::Hangup,
        TerminationSignal::Interrupt,
        TerminationSignal::Quit,
        TerminationSignal::Abort,
        TerminationSignal::Terminate,
    ];

    /// POSIX signal number
    pub fn number(self) -> i32 {
        match self {
            TerminationSignal::Hangup => 1,
            TerminationSignal::Interrupt => 2,
            TerminationSignal::Quit => 3,
            TerminationSignal::Abort => 6,
            TerminationSignal::Terminate => 15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TerminationSignal::Hangup => "SIGHUP",
            TerminationSignal::Interrupt => "SIGINT",
            TerminationSignal::Quit => "SIGQUIT",
            TerminationSignal::Abort => "SIGABRT",
            TerminationSignal::Terminate => "SIGTERM",
        }
    }
}

impl std::fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a raw signal number, for the ones that are portable across unixes
pub fn signal_name(signal: i32) -> Option<&'static str> {
    let name = match signal {
        1 => "SIGHUP",
        2 => "SIGINT",
        3 => "SIGQUIT",
        4 => "SIGILL",
        5 => "SIGTRAP",
        6 => "SIGABRT",
        8 => "SIGFPE",
        9 => "SIGKILL",
        11 => "SIGSEGV",
        13 => "SIGPIPE",
        14 => "SIGALRM",
        15 => "SIGTERM",
        _ => return None,
    };
    Some(name)
}

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exited normally with a status code
    Exited(i32),
    /// Killed by a signal (raw signal number)
    Signaled(i32),
}

impl ExitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExitOutcome::Exited(0))
    }

    pub fn signal(&self) -> Option<i32> {
        match self {
            ExitOutcome::Signaled(signal) => Some(*signal),
            ExitOutcome::Exited(_) => None,
        }
    }

    /// Killed by anything other than an interrupt: a crash dump may exist
    pub fn is_crash(&self) -> bool {
        matches!(self, ExitOutcome::Signaled(signal) if *signal != TerminationSignal::Interrupt.number())
    }

    /// Exit status the launcher reports for this outcome (shell convention for signals)
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitOutcome::Exited(code) => *code,
            ExitOutcome::Signaled(signal) => 128 + signal,
        }
    }
}

impl std::fmt::Display for ExitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitOutcome::Exited(code) => write!(f, "exit status {}", code),
            ExitOutcome::Signaled(signal) => match signal_name(*signal) {
                Some(name) => write!(f, "terminated by signal {} ({})", signal, name),
                None => write!(f, "terminated by signal {}", signal),
            },
        }
    }
}

/// Supervised process lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Created,
    Starting,
    Running,
    Completed(i32),
    Signaled(i32),
    StartupFailed,
}

impl ProcessState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProcessState::Completed(_) | ProcessState::Signaled(_) | ProcessState::StartupFailed
        )
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessState::Created => write!(f, "CREATED"),
            ProcessState::Starting => write!(f, "STARTING"),
            ProcessState::Running => write!(f, "RUNNING"),
            ProcessState::Completed(code) => write!(f, "COMPLETED({})", code),
            ProcessState::Signaled(signal) => write!(f, "SIGNALED({})", signal),
            ProcessState::StartupFailed => write!(f, "STARTUP_FAILED"),
        }
    }
}

/// The child process as tracked by the supervisor for one run
#[derive(Debug, Clone)]
pub struct SupervisedProcess {
    pub spec: ProcessSpec,
    pub state: ProcessState,
    pub pid: Option<u32>,
}

impl SupervisedProcess {
    pub fn new(spec: ProcessSpec) -> Self {
        Self {
            spec,
            state: ProcessState::Created,
            pid: None,
        }
    }

    /// CREATED -> STARTING
    pub fn start(&mut self) -> Result<()> {
        self.transition(ProcessState::Created, ProcessState::Starting)
    }

    /// STARTING -> RUNNING
    pub fn mark_running(&mut self, pid: Option<u32>) -> Result<()> {
        self.transition(ProcessState::Starting, ProcessState::Running)?;
        self.pid = pid;
        Ok(())
    }

    /// STARTING -> STARTUP_FAILED
    pub fn fail_startup(&mut self) -> Result<()> {
        self.transition(ProcessState::Starting, ProcessState::StartupFailed)
    }

    /// RUNNING -> COMPLETED | SIGNALED
    pub fn finish(&mut self, outcome: ExitOutcome) -> Result<()> {
        let next = match outcome {
            ExitOutcome::Exited(code) => ProcessState::Completed(code),
            ExitOutcome::Signaled(signal) => ProcessState::Signaled(signal),
        };
        self.transition(ProcessState::Running, next)
    }

    fn transition(&mut self, expected: ProcessState, next: ProcessState) -> Result<()> {
        if self.state != expected {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        self.state = next;
        Ok(())
    }
}
