//! Signal Forwarding Integration Test
//!
//! Kept in its own test binary: it raises SIGTERM on the test process itself.

use std::sync::Arc;
use std::time::Duration;

use nix::sys::signal::{raise, Signal};
use ssm_env_core::application::Supervisor;
use ssm_env_core::domain::{ExitOutcome, ProcessSpec};
use ssm_env_core::port::SupervisorError;
use ssm_env_infra_system::TokioProcessLauncher;

#[tokio::test]
async fn test_sigterm_is_relayed_to_child() {
    let supervisor = Supervisor::new(Arc::new(TokioProcessLauncher::new()));

    // Listeners are installed at launch, well before this fires
    tokio::spawn(async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        raise(Signal::SIGTERM).unwrap();
    });

    let result = supervisor
        .run(ProcessSpec::new("sleep", vec!["5".to_string()]))
        .await;

    match result {
        Err(SupervisorError::ChildExit(outcome)) => {
            assert_eq!(outcome, ExitOutcome::Signaled(15));
            assert!(outcome.to_string().contains("SIGTERM"));
        }
        other => panic!("expected ChildExit, got {:?}", other),
    }
}
