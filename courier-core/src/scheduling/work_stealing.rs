use super::*;
use crate::utils::{ThreadPool, parallel_into_collect};

/// Submits all tasks to a shared work-stealing pool. Tasks are executed in arbitrary order.
pub struct WorkStealingScheduler {
    pool: ThreadPool,
}

impl WorkStealingScheduler {
    /// Creates a new instance of `WorkStealingScheduler` with given amount of threads.
    pub fn new(num_threads: usize) -> GenericResult<Self> {
        Ok(Self { pool: ThreadPool::new(num_threads)? })
    }
}

impl<T: Send> Scheduler<T> for WorkStealingScheduler {
    fn run_batch<'a>(&self, tasks: Vec<Task<'a, T>>) -> BatchOutcome<T> {
        let clock = BatchClock::start();
        let results = self.pool.execute(|| parallel_into_collect(tasks, |task| clock.run(task)));

        BatchOutcome { results, surfaced: None }
    }
}
