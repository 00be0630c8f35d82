//! Interchangeable concurrency strategies to run a batch of independent tasks.

mod future_composition;
pub use self::future_composition::*;

mod priority_pool;
pub use self::priority_pool::*;

mod work_stealing;
pub use self::work_stealing::*;

#[cfg(test)]
#[path = "../../tests/unit/scheduling/scheduler_test.rs"]
mod scheduler_test;

use crate::utils::{CourierError, CourierResult, GenericResult, Parallelism, Timer};
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A task action.
pub type TaskFn<'a, T> = Box<dyn FnOnce() -> CourierResult<T> + Send + 'a>;

/// An independent unit of work.
pub struct Task<'a, T> {
    /// Task id used for reporting, e.g. carrier id.
    pub id: String,
    /// Task priority: tasks with higher priority are started first when strategy supports it.
    pub priority: usize,
    /// A task action.
    pub action: TaskFn<'a, T>,
}

impl<'a, T> Task<'a, T> {
    /// Creates a new task.
    pub fn new(id: &str, priority: usize, action: impl FnOnce() -> CourierResult<T> + Send + 'a) -> Self {
        Self { id: id.to_string(), priority, action: Box::new(action) }
    }
}

/// A result of a single task with its timing information.
pub struct TaskResult<T> {
    /// Task id.
    pub id: String,
    /// Task priority.
    pub priority: usize,
    /// Task result. Panics are converted into task failures.
    pub result: CourierResult<T>,
    /// A sequence number of task start within the batch.
    pub start_order: usize,
    /// Seconds since batch start when task was started.
    pub started_secs: f64,
    /// Seconds since batch start when task was completed.
    pub completed_secs: f64,
}

/// A result of a batch run.
pub struct BatchOutcome<T> {
    /// Results of all tasks in submission order.
    pub results: Vec<TaskResult<T>>,
    /// An error surfaced to the caller once all tasks are attempted. Only strategies which
    /// compose tasks into a single future report it.
    pub surfaced: Option<CourierError>,
}

/// Runs a batch of independent tasks and blocks until all of them are completed.
pub trait Scheduler<T: Send> {
    /// Runs all tasks. A failure of one task never prevents other tasks from running.
    fn run_batch<'a>(&self, tasks: Vec<Task<'a, T>>) -> BatchOutcome<T>;
}

/// Specifies a concurrency strategy.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchedulerKind {
    /// A shared work-stealing pool.
    #[default]
    WorkStealing,
    /// A fixed-size pool which starts tasks in descending priority order.
    PriorityPool,
    /// A fixed-size pool which composes all tasks and surfaces the first failure.
    FutureComposition,
}

/// Creates a scheduler of given kind using configured amount of workers.
pub fn create_scheduler<T: Send + 'static>(
    kind: SchedulerKind,
    parallelism: &Parallelism,
) -> GenericResult<Box<dyn Scheduler<T> + Send + Sync>> {
    let workers = parallelism.max_workers();

    Ok(match kind {
        SchedulerKind::WorkStealing => Box::new(WorkStealingScheduler::new(workers)?),
        SchedulerKind::PriorityPool => Box::new(PriorityPoolScheduler::new(workers)),
        SchedulerKind::FutureComposition => Box::new(FutureCompositionScheduler::new(workers)),
    })
}

/// Keeps batch wide bookkeeping shared by workers.
pub(crate) struct BatchClock {
    timer: Timer,
    started: AtomicUsize,
}

impl BatchClock {
    pub fn start() -> Self {
        Self { timer: Timer::start(), started: AtomicUsize::new(0) }
    }

    /// Runs the task capturing its timing and converting panics into failures.
    pub fn run<T>(&self, task: Task<'_, T>) -> TaskResult<T> {
        let Task { id, priority, action } = task;

        let start_order = self.started.fetch_add(1, Ordering::SeqCst);
        let started_secs = self.timer.elapsed_secs_as_float();

        let result = catch_unwind(AssertUnwindSafe(action)).unwrap_or_else(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|msg| msg.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());

            Err(CourierError::task(id.as_str(), format!("task panicked: {message}")))
        });

        TaskResult { id, priority, result, start_order, started_secs, completed_secs: self.timer.elapsed_secs_as_float() }
    }
}
