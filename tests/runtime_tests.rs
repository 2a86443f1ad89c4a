// tests/runtime_tests.rs

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use wafflebot::device::{CompletionTimer, TokioTimer};
use wafflebot::engine::{run_tick, Runtime, RuntimeEvent, RuntimeOptions, TickReport};
use wafflebot::job::Completion;
use wafflebot_test_utils::builders::{ConfigFileBuilder, TestCell};
use wafflebot_test_utils::fakes::RecordingDriver;
use wafflebot_test_utils::{init_tracing, with_timeout};

#[test]
fn tick_creates_jobs_then_dispatches_once_per_job() {
    init_tracing();
    let mut cell = TestCell::standard();
    cell.add_orders(4);

    let report = run_tick(&mut cell.coordinator);
    assert_eq!(
        report,
        TickReport {
            created: vec![1, 2],
            dispatched: 2,
            finished: Vec::new(),
        }
    );
    assert_eq!(cell.coordinator.pending_orders(), 1);
}

#[test]
fn tick_without_work_does_nothing() {
    let mut cell = TestCell::standard();
    assert_eq!(run_tick(&mut cell.coordinator), TickReport::default());
}

#[tokio::test]
async fn tokio_timer_completes_after_the_delay() {
    let timer = TokioTimer::try_current().expect("inside a Tokio runtime");
    let completion = Completion::new();

    timer.defer(Duration::from_millis(10), completion.signal());
    assert!(!completion.is_finished());

    with_timeout(async {
        while !completion.is_finished() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
}

#[test]
fn tokio_timer_needs_a_runtime() {
    assert!(TokioTimer::try_current().is_none());
}

#[tokio::test]
async fn runtime_serves_all_orders_and_exits_when_idle() {
    init_tracing();
    let cfg = ConfigFileBuilder::standard_cell().with_cook_secs(0.0).build();
    let driver = RecordingDriver::new();
    let timer = Arc::new(TokioTimer::try_current().expect("inside a Tokio runtime"));
    let coordinator = wafflebot::build_coordinator(&cfg, driver.clone(), timer);

    let (tx, rx) = mpsc::channel(16);
    for _ in 0..3 {
        tx.send(RuntimeEvent::OrderPlaced).await.unwrap();
    }

    tokio::spawn(async move {
        loop {
            if tx.send(RuntimeEvent::Tick).await.is_err() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    });

    let runtime = Runtime::new(
        coordinator,
        rx,
        RuntimeOptions {
            exit_when_idle: true,
        },
    );
    let coordinator = with_timeout(runtime.run()).await.unwrap();

    assert_eq!(coordinator.pending_orders(), 0);
    assert!(coordinator.running_jobs().is_empty());
    assert_eq!(coordinator.finished_jobs().len(), 2);
    assert!(coordinator.registry().snapshot().iter().all(|s| s.free));
    assert!(!driver.actions().is_empty());
}

#[tokio::test]
async fn runtime_applies_order_events_and_stops_on_shutdown() {
    let mut cell = TestCell::standard();
    cell.add_orders(1);

    let (tx, rx) = mpsc::channel(16);
    tx.send(RuntimeEvent::OrderPlaced).await.unwrap();
    tx.send(RuntimeEvent::OrderPlaced).await.unwrap();
    // More than pending: ignored.
    tx.send(RuntimeEvent::OrdersWithdrawn(5)).await.unwrap();
    tx.send(RuntimeEvent::OrdersWithdrawn(1)).await.unwrap();
    tx.send(RuntimeEvent::ShutdownRequested).await.unwrap();
    // Never read.
    tx.send(RuntimeEvent::Tick).await.unwrap();

    let runtime = Runtime::new(cell.coordinator, rx, RuntimeOptions::default());
    let coordinator = with_timeout(runtime.run()).await.unwrap();

    assert_eq!(coordinator.pending_orders(), 2);
    assert!(coordinator.running_jobs().is_empty());
    assert!(cell.driver.actions().is_empty());
}

#[tokio::test]
async fn runtime_stops_when_all_senders_are_gone() {
    let cell = TestCell::standard();
    let (tx, rx) = mpsc::channel(4);
    tx.send(RuntimeEvent::OrderPlaced).await.unwrap();
    drop(tx);

    let runtime = Runtime::new(cell.coordinator, rx, RuntimeOptions::default());
    let coordinator = with_timeout(runtime.run()).await.unwrap();
    assert_eq!(coordinator.pending_orders(), 1);
}
