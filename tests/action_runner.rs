// tests/action_runner.rs

use std::time::Duration;

use pollen::engine::{dispatcher, ActionCommands, ActionRunner, SignalOutcome};
use pollen::errors::PollenError;
use pollen::types::{CommandOutcome, Stage};
use pollen_test_utils::fake_runner::FakeCommandRunner;
use pollen_test_utils::{init_tracing, wait_until};

fn commands() -> ActionCommands {
    ActionCommands {
        build: "make".to_string(),
        restart: "restart-app".to_string(),
        timeout: Duration::from_secs(20),
    }
}

#[tokio::test]
async fn successful_build_is_followed_by_restart() {
    init_tracing();
    let fake = FakeCommandRunner::new();
    let runner = ActionRunner::new(fake.clone(), commands());

    let report = runner.run_cycle().await;

    assert_eq!(fake.calls(), vec!["make", "restart-app"]);
    assert_eq!(report.build.stage, Stage::Build);
    assert_eq!(report.build.outcome, CommandOutcome::Success);
    assert_eq!(report.build.output, b"ran: make\n".to_vec());
    let restart = report.restart.as_ref().expect("restart should run");
    assert_eq!(restart.stage, Stage::Restart);
    assert!(report.failure().is_none());
}

#[tokio::test]
async fn failed_build_skips_restart() {
    let fake = FakeCommandRunner::new().script("make", &[CommandOutcome::NonZeroExit(2)]);
    let runner = ActionRunner::new(fake.clone(), commands());

    let report = runner.run_cycle().await;

    assert_eq!(fake.calls(), vec!["make"]);
    assert!(report.restart.is_none());
    assert!(matches!(
        report.failure(),
        Some(PollenError::BuildFailure(CommandOutcome::NonZeroExit(2)))
    ));
}

#[tokio::test(start_paused = true)]
async fn timed_out_build_skips_restart() {
    let fake = FakeCommandRunner::new().with_delay(Duration::from_secs(60));
    let runner = ActionRunner::new(fake.clone(), commands());

    let report = runner.run_cycle().await;

    assert_eq!(fake.count("restart-app"), 0);
    assert_eq!(report.build.outcome, CommandOutcome::TimedOut);
    assert!(matches!(
        report.failure(),
        Some(PollenError::BuildFailure(CommandOutcome::TimedOut))
    ));
}

#[tokio::test]
async fn restart_failure_is_reported_without_retry() {
    let fake =
        FakeCommandRunner::new().script("restart-app", &[CommandOutcome::NonZeroExit(1)]);
    let runner = ActionRunner::new(fake.clone(), commands());

    let report = runner.run_cycle().await;

    assert_eq!(fake.calls(), vec!["make", "restart-app"]);
    assert!(matches!(
        report.failure(),
        Some(PollenError::RestartFailure(CommandOutcome::NonZeroExit(1)))
    ));
}

#[tokio::test(start_paused = true)]
async fn triggers_during_a_cycle_coalesce_into_one_follow_up() {
    init_tracing();
    let fake = FakeCommandRunner::new().with_delay(Duration::from_millis(500));
    let (tx, rx) = dispatcher();
    let handle = tokio::spawn(ActionRunner::new(fake.clone(), commands()).run(rx));

    assert_eq!(tx.signal(), SignalOutcome::Queued);
    assert!(wait_until(Duration::from_secs(5), || fake.count("make") == 1).await);

    // Build is in flight; both of these land while it runs.
    assert_eq!(tx.signal(), SignalOutcome::Queued);
    assert_eq!(tx.signal(), SignalOutcome::Coalesced);

    assert!(wait_until(Duration::from_secs(10), || fake.calls().len() == 4).await);
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(
        fake.calls(),
        vec!["make", "restart-app", "make", "restart-app"]
    );
    assert_eq!(fake.max_concurrency(), 1);

    drop(tx);
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn runner_never_overlaps_cycles() {
    let fake = FakeCommandRunner::new().with_delay(Duration::from_millis(100));
    let (tx, rx) = dispatcher();
    let handle = tokio::spawn(ActionRunner::new(fake.clone(), commands()).run(rx));

    for _ in 0..20 {
        tx.signal();
        tokio::time::sleep(Duration::from_millis(30)).await;
    }
    drop(tx);
    handle.await.unwrap();

    assert_eq!(fake.max_concurrency(), 1);
    assert_eq!(fake.count("make"), fake.count("restart-app"));
    // 20 signals over ~600ms of 200ms cycles cannot all have run.
    assert!(fake.count("make") < 20);
}
