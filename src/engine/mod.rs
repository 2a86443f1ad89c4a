// src/engine/mod.rs

//! Orchestration engine for wafflebot.
//!
//! This module ties together:
//! - order accounting ([`orders`])
//! - the selection rule for "what runs next" ([`selection`])
//! - the job coordinator, the synchronous scheduling core ([`coordinator`])
//! - the async runtime that steps the coordinator in response to events
//!   ([`runtime`])

/// Events flowing into the runtime from the front end, the ticker and
/// signal handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// A customer placed one order.
    OrderPlaced,
    /// Withdraw this many pending orders (all or nothing).
    OrdersWithdrawn(u32),
    /// Driver cadence: create jobs and dispatch.
    Tick,
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Runtime options for the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, stop once no orders are pending and no job is running
    /// (used for `--once`).
    pub exit_when_idle: bool,
}

pub mod coordinator;
pub mod orders;
pub mod runtime;
pub mod selection;

pub use coordinator::{DispatchOutcome, JobCoordinator};
pub use orders::OrderBook;
pub use runtime::{run_tick, Runtime, TickReport};
pub use selection::{highest_priority, Schedulable};
