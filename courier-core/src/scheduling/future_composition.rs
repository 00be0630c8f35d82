use super::*;
use futures::channel::oneshot;
use futures::executor::block_on;
use futures::future::join_all;
use std::sync::{Mutex, PoisonError};

/// A fixed-size pool where each task is represented by a future completed by a worker thread.
/// The batch blocks on the conjunction of all futures and, once all tasks are attempted, the first
/// failure in submission order is surfaced to the caller.
pub struct FutureCompositionScheduler {
    num_threads: usize,
}

impl FutureCompositionScheduler {
    /// Creates a new instance of `FutureCompositionScheduler` with given amount of threads.
    pub fn new(num_threads: usize) -> Self {
        Self { num_threads: num_threads.max(1) }
    }
}

impl<T: Send> Scheduler<T> for FutureCompositionScheduler {
    fn run_batch<'a>(&self, tasks: Vec<Task<'a, T>>) -> BatchOutcome<T> {
        let total = tasks.len();
        let headers = tasks.iter().map(|task| (task.id.clone(), task.priority)).collect::<Vec<_>>();

        let (pending, receivers): (Vec<_>, Vec<_>) = tasks
            .into_iter()
            .map(|task| {
                let (sender, receiver) = oneshot::channel::<TaskResult<T>>();
                ((task, sender), receiver)
            })
            .unzip();

        let queue = Mutex::new(pending.into_iter());
        let clock = BatchClock::start();

        let completed = std::thread::scope(|scope| {
            (0..self.num_threads.min(total)).for_each(|_| {
                let (queue, clock) = (&queue, &clock);

                scope.spawn(move || {
                    loop {
                        let next = queue.lock().unwrap_or_else(PoisonError::into_inner).next();
                        let Some((task, sender)) = next else { break };

                        // receiver lives until the whole batch is joined
                        let _ = sender.send(clock.run(task));
                    }
                });
            });

            block_on(join_all(receivers))
        });

        let results = completed
            .into_iter()
            .zip(headers)
            .map(|(completed, (id, priority))| {
                completed.unwrap_or_else(|_| TaskResult {
                    result: Err(CourierError::task(id.as_str(), "task was cancelled")),
                    id,
                    priority,
                    start_order: total,
                    started_secs: 0.,
                    completed_secs: clock.timer.elapsed_secs_as_float(),
                })
            })
            .collect::<Vec<_>>();

        let surfaced = results.iter().find_map(|result| result.result.as_ref().err().cloned());

        BatchOutcome { results, surfaced }
    }
}
