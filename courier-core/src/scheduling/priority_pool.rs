use super::*;
use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::{Mutex, PoisonError};

/// A fixed-size pool with a priority work queue: pending tasks are started in descending
/// priority order, ties are resolved by submission order.
pub struct PriorityPoolScheduler {
    num_threads: usize,
}

impl PriorityPoolScheduler {
    /// Creates a new instance of `PriorityPoolScheduler` with given amount of threads.
    pub fn new(num_threads: usize) -> Self {
        Self { num_threads: num_threads.max(1) }
    }
}

struct QueuedTask<'a, T> {
    index: usize,
    task: Task<'a, T>,
}

impl<T> PartialEq for QueuedTask<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == CmpOrdering::Equal
    }
}

impl<T> Eq for QueuedTask<'_, T> {}

impl<T> PartialOrd for QueuedTask<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for QueuedTask<'_, T> {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        self.task.priority.cmp(&other.task.priority).then_with(|| other.index.cmp(&self.index))
    }
}

impl<T: Send> Scheduler<T> for PriorityPoolScheduler {
    fn run_batch<'a>(&self, tasks: Vec<Task<'a, T>>) -> BatchOutcome<T> {
        let total = tasks.len();
        let queue = Mutex::new(
            tasks.into_iter().enumerate().map(|(index, task)| QueuedTask { index, task }).collect::<BinaryHeap<_>>(),
        );
        let results = Mutex::new(Vec::with_capacity(total));
        let clock = BatchClock::start();

        std::thread::scope(|scope| {
            (0..self.num_threads.min(total)).for_each(|_| {
                let (queue, results, clock) = (&queue, &results, &clock);

                // tasks never panic while holding locks, so a poisoned guard still has consistent data
                scope.spawn(move || {
                    loop {
                        let next = queue.lock().unwrap_or_else(PoisonError::into_inner).pop();
                        let Some(QueuedTask { index, task }) = next else { break };

                        let result = clock.run(task);
                        results.lock().unwrap_or_else(PoisonError::into_inner).push((index, result));
                    }
                });
            });
        });

        let mut results = results.into_inner().unwrap_or_else(PoisonError::into_inner);
        results.sort_by_key(|(index, _)| *index);

        BatchOutcome { results: results.into_iter().map(|(_, result)| result).collect(), surfaced: None }
    }
}
