// src/lib.rs

pub mod cli;
pub mod config;
pub mod device;
pub mod engine;
pub mod errors;
pub mod job;
pub mod logging;
pub mod registry;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::device::{CompletionTimer, DeviceDriver, SimulatedDriver, TokioTimer};
use crate::engine::{JobCoordinator, Runtime, RuntimeEvent, RuntimeOptions};
use crate::job::{JobFactory, TaskContext};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - registry / factory / coordinator
/// - the device driver and completion timer
/// - the tick loop and runtime
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = &args.config;
    let cfg = load_and_validate(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let driver: Arc<dyn DeviceDriver> = Arc::new(SimulatedDriver::new());
    let timer: Arc<dyn CompletionTimer> =
        Arc::new(TokioTimer::try_current().context("no Tokio runtime for completion timers")?);
    let mut coordinator = build_coordinator(&cfg, driver, timer);

    let seeded = cfg.startup_orders(args.orders);
    for _ in 0..seeded {
        coordinator.add_order();
    }
    info!(orders = seeded, "seeded start-up orders");

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Tick cadence.
    {
        let tx = rt_tx.clone();
        let period = cfg.tick_interval();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                if tx.send(RuntimeEvent::Tick).await.is_err() {
                    debug!("runtime gone; ticker stopping");
                    return;
                }
            }
        });
    }

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }
    drop(rt_tx);

    let options = RuntimeOptions {
        exit_when_idle: args.once,
    };

    let runtime = Runtime::new(coordinator, rt_rx, options);
    let coordinator = runtime.run().await?;

    info!(
        served = coordinator.finished_jobs().len(),
        "wafflebot finished"
    );
    Ok(())
}

/// Assemble a coordinator for a validated config.
///
/// The registry is built from the config's inventory and injected into both
/// the task context and the coordinator.
pub fn build_coordinator(
    cfg: &ConfigFile,
    driver: Arc<dyn DeviceDriver>,
    timer: Arc<dyn CompletionTimer>,
) -> JobCoordinator {
    let registry = Arc::new(cfg.build_registry());
    let ctx = TaskContext {
        driver,
        registry,
        timer,
    };
    let factory = JobFactory::with_default_recipes(cfg.timing());
    JobCoordinator::new(ctx, factory, cfg.scheduler.tool_change_threshold)
}

/// Simple dry-run output: print scheduler settings and inventory.
fn print_dry_run(cfg: &ConfigFile) {
    println!("wafflebot dry-run");
    println!(
        "  scheduler.tool_change_threshold = {}",
        cfg.scheduler.tool_change_threshold
    );
    println!("  scheduler.tick_interval_ms = {}", cfg.scheduler.tick_interval_ms);
    println!("  scheduler.initial_orders = {}", cfg.scheduler.initial_orders);
    println!("  timing.cook_secs = {}", cfg.timing.cook_secs);
    if let Some(tool) = cfg.tool_stand.equipped {
        println!("  tool_stand.equipped = {tool}");
    }
    println!();

    let registry = cfg.build_registry();
    let inventory = registry.snapshot();
    println!("equipment ({}):", inventory.len());
    for item in inventory {
        println!("  - {} ({})", item.name, item.id);
        if item.capacity > 1 {
            println!("      capacity: {}", item.capacity);
        }
    }

    debug!("dry-run complete (no execution)");
}
