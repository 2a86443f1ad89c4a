// src/job/mod.rs

//! Task / job model and the job factory.
//!
//! - [`task`] holds a single step of robot work and how it executes.
//! - [`completion`] is the flag a task shares with whoever finishes it,
//!   possibly from a background timer.
//! - [`job`] is the ordered task queue bound to one iron.
//! - [`factory`] maps a job kind to its fixed task sequence.

pub mod completion;
pub mod factory;
#[allow(clippy::module_inception)]
pub mod job;
pub mod task;

pub use completion::{Completion, CompletionSignal};
pub use factory::{dual_waffle, single_waffle, JobFactory, Recipe, Timing};
pub use job::{Job, JobId};
pub use task::{Task, TaskAction, TaskContext, TaskFault, TaskStatus};
