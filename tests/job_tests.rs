// tests/job_tests.rs

mod common;

use std::time::Duration;

use common::Bench;
use wafflebot::device::{DeviceAction, DeviceFault, ToolStand};
use wafflebot::job::{
    dual_waffle, single_waffle, Job, JobFactory, Task, TaskAction, TaskStatus, Timing,
};
use wafflebot::types::{JobKind, Tool};
use wafflebot_test_utils::init_tracing;

fn cook_task(bench: &Bench) -> Task {
    Task::new(
        "cook",
        1.0,
        None,
        TaskAction::Cook {
            duration: Duration::from_secs(30),
        },
        bench.iron.clone(),
    )
}

fn open_lid_task(bench: &Bench) -> Task {
    Task::new(
        "open lid",
        2.0,
        Some(Tool::Gripper),
        TaskAction::OpenLid,
        bench.iron.clone(),
    )
}

#[test]
fn tool_change_need_follows_the_required_tool() {
    let bench = Bench::new(1);
    let scoop = Task::new(
        "pour",
        3.0,
        Some(Tool::Scoop),
        TaskAction::Pour { slot: 0 },
        bench.iron.clone(),
    );

    assert!(scoop.is_tool_change_needed(Some(Tool::Gripper)));
    assert!(scoop.is_tool_change_needed(None));
    assert!(!scoop.is_tool_change_needed(Some(Tool::Scoop)));

    let cook = cook_task(&bench);
    assert!(!cook.is_tool_change_needed(None));
    assert!(!cook.is_tool_change_needed(Some(Tool::Fork)));
}

#[test]
fn synchronous_task_finishes_when_run_returns() {
    init_tracing();
    let bench = Bench::new(1);
    let mut task = open_lid_task(&bench);
    assert_eq!(task.status(), TaskStatus::Pending);

    task.run(&bench.ctx).unwrap();

    assert!(task.is_finished());
    assert_eq!(task.status(), TaskStatus::Finished);
    assert!(bench.iron.is_lid_open());
    assert_eq!(
        bench.driver.actions(),
        vec![DeviceAction::OpenLid {
            iron: "iron".to_string()
        }]
    );

    // Running a finished task again does nothing.
    task.run(&bench.ctx).unwrap();
    assert_eq!(bench.driver.actions().len(), 1);
}

#[test]
fn task_changes_tool_before_acting() {
    let bench = Bench::new(1);
    let mut pour = Task::new(
        "pour",
        3.0,
        Some(Tool::Scoop),
        TaskAction::Pour { slot: 0 },
        bench.iron.clone(),
    );

    pour.run(&bench.ctx).unwrap();

    assert_eq!(
        bench.driver.actions(),
        vec![
            DeviceAction::ChangeTool { tool: Tool::Scoop },
            DeviceAction::Pour {
                iron: "iron".to_string(),
                slot: 0,
                bowl: "bowl".to_string(),
            },
        ]
    );
    assert_eq!(bench.stand.equipped_tool(), Some(Tool::Scoop));
    assert_eq!(bench.iron.domain_state().filled_slots, 1);
}

#[test]
fn cook_completes_only_when_the_timer_fires() {
    let bench = Bench::new(1);
    let mut cook = cook_task(&bench);

    cook.run(&bench.ctx).unwrap();

    assert!(!cook.is_finished());
    assert_eq!(cook.status(), TaskStatus::Running);
    assert_eq!(bench.timer.pending_delays(), vec![Duration::from_secs(30)]);
    assert_eq!(bench.iron.domain_state().cook_cycles, 1);

    assert_eq!(bench.timer.fire_all(), 1);
    assert!(cook.is_finished());
}

#[test]
fn missing_fixture_is_a_fault() {
    let bench = Bench::new(1);
    let bowl = bench
        .ctx
        .registry
        .checkout(wafflebot::types::EquipmentKind::Bowl, 1)
        .unwrap();

    let mut pour = Task::new("pour", 3.0, None, TaskAction::Pour { slot: 0 }, bench.iron.clone());
    let fault = pour.run(&bench.ctx).unwrap_err();

    assert_eq!(fault.task, "pour");
    assert_eq!(
        fault.fault,
        DeviceFault::FixtureUnavailable(wafflebot::types::EquipmentKind::Bowl)
    );
    assert_eq!(pour.status(), TaskStatus::Faulted);

    bench.ctx.registry.check_in(&bowl);
    pour.run(&bench.ctx).unwrap();
    assert!(pour.is_finished());
    assert!(pour.last_fault().is_none());
}

#[test]
fn job_is_ready_until_a_task_is_in_flight() {
    let bench = Bench::new(1);
    let mut job = Job::new(
        7,
        JobKind::Single,
        bench.iron.clone(),
        vec![cook_task(&bench), open_lid_task(&bench)],
    );

    assert!(job.is_ready());
    assert!(!job.is_finished());
    assert_eq!(job.current_priority(), Some(1.0));
    assert_eq!(job.next_task_name(), Some("cook"));

    job.advance(&bench.ctx).unwrap();
    assert!(!job.is_ready());
    assert_eq!(job.current_task_name(), Some("cook"));
    assert_eq!(job.tasks_left(), 1);
    assert_eq!(job.current_priority(), Some(2.0));

    bench.timer.fire_all();
    assert!(job.is_ready());

    job.advance(&bench.ctx).unwrap();
    assert!(job.is_finished());
    assert_eq!(job.current_priority(), None);
}

#[test]
fn job_with_background_last_task_finishes_when_it_completes() {
    let bench = Bench::new(1);
    let mut job = Job::new(1, JobKind::Single, bench.iron.clone(), vec![cook_task(&bench)]);

    job.advance(&bench.ctx).unwrap();
    assert_eq!(job.tasks_left(), 0);
    assert!(!job.is_finished());

    bench.timer.fire_all();
    assert!(job.is_finished());
}

#[test]
#[should_panic(expected = "still in flight")]
fn advancing_a_busy_job_panics() {
    let bench = Bench::new(1);
    let mut job = Job::new(
        3,
        JobKind::Single,
        bench.iron.clone(),
        vec![cook_task(&bench), open_lid_task(&bench)],
    );

    job.advance(&bench.ctx).unwrap();
    let _ = job.advance(&bench.ctx);
}

#[test]
#[should_panic(expected = "empty task queue")]
fn advancing_an_empty_job_panics() {
    let bench = Bench::new(1);
    let mut job = Job::new(4, JobKind::Single, bench.iron.clone(), Vec::new());
    let _ = job.advance(&bench.ctx);
}

#[test]
fn faulted_task_stays_current_until_retried() {
    init_tracing();
    let bench = Bench::new(1);
    let mut job = Job::new(5, JobKind::Single, bench.iron.clone(), vec![open_lid_task(&bench)]);

    assert!(job.retry_current(&bench.ctx).is_none());

    bench.driver.fail_next(DeviceFault::Disconnected);
    let fault = job.advance(&bench.ctx).unwrap_err();
    assert_eq!(fault.fault, DeviceFault::Disconnected);

    assert!(!job.is_ready());
    assert!(!job.is_finished());
    assert_eq!(job.current_task().unwrap().status(), TaskStatus::Faulted);

    let retried = job.retry_current(&bench.ctx).unwrap();
    assert!(retried.is_ok());
    assert!(job.is_finished());

    // Nothing left to retry.
    assert!(job.retry_current(&bench.ctx).is_none());
}

#[test]
fn needs_tool_change_looks_at_the_next_task() {
    let bench = Bench::new(1);
    let job = Job::new(
        6,
        JobKind::Single,
        bench.iron.clone(),
        vec![open_lid_task(&bench), cook_task(&bench)],
    );

    assert!(!job.needs_tool_change(Some(Tool::Gripper)));
    assert!(job.needs_tool_change(Some(Tool::Fork)));

    let empty = Job::new(8, JobKind::Single, bench.iron.clone(), Vec::new());
    assert!(!empty.needs_tool_change(None));
}

#[test]
fn factory_builds_registered_kinds_only() {
    let bench = Bench::new(2);

    let empty = JobFactory::new(Timing::default());
    assert!(empty.create_job(JobKind::Single, 1, bench.iron.clone()).is_none());
    // The caller still owns the iron.
    assert_eq!(bench.ctx.registry.is_free(&bench.iron), Some(false));

    let factory = JobFactory::with_default_recipes(Timing::default());
    let job = factory.create_job(JobKind::Dual, 2, bench.iron.clone()).unwrap();
    assert_eq!(job.id(), 2);
    assert_eq!(job.kind(), JobKind::Dual);
    assert_eq!(job.equipment(), &bench.iron);
    assert_eq!(job.tasks_left(), 8);
}

#[test]
fn recipes_share_the_iron_and_apply_timing() {
    let bench = Bench::new(2);
    let timing = Timing {
        cook: Duration::from_secs(90),
    };

    let single = single_waffle(&bench.iron, &timing);
    let names: Vec<_> = single.iter().map(Task::name).collect();
    assert_eq!(
        names,
        vec![
            "open lid",
            "pour batter (slot 0)",
            "close lid",
            "cook",
            "open lid",
            "serve waffle (slot 0)"
        ]
    );
    assert!(single.iter().any(|t| t.action()
        == TaskAction::Cook {
            duration: Duration::from_secs(90)
        }));

    let dual = dual_waffle(&bench.iron, &timing);
    let pours = dual
        .iter()
        .filter(|t| matches!(t.action(), TaskAction::Pour { .. }))
        .count();
    let serves = dual
        .iter()
        .filter(|t| matches!(t.action(), TaskAction::Serve { .. }))
        .count();
    assert_eq!((pours, serves), (2, 2));

    // Re-opening a cooked iron outranks the tool-change threshold.
    let reopen = &single[4];
    assert_eq!(reopen.name(), "open lid");
    assert!(reopen.priority() > 4.0);
    assert!(single[5].priority() > reopen.priority());
}

#[test]
fn single_job_runs_end_to_end_on_one_iron() {
    let bench = Bench::new(1);
    let factory = JobFactory::with_default_recipes(Timing::default());
    let mut job = factory
        .create_job(JobKind::Single, 1, bench.iron.clone())
        .unwrap();

    while !job.is_finished() {
        if job.is_ready() {
            job.advance(&bench.ctx).unwrap();
        } else {
            assert_eq!(bench.timer.fire_all(), 1);
        }
    }

    let state = bench.iron.domain_state();
    assert_eq!(state.filled_slots, 0);
    assert_eq!(state.cook_cycles, 1);
    assert!(state.lid_open);
    assert_eq!(bench.driver.tool_changes(), 3);
    assert_eq!(bench.stand.equipped_tool(), Some(Tool::Fork));
}
