#[cfg(test)]
#[path = "../../tests/unit/utils/environment_test.rs"]
mod environment_test;

use crate::utils::{DefaultRandom, Random, get_cpus};
use std::sync::Arc;

/// A logger type which is called with various information.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Specifies how many workers can be used to run independent tasks.
#[derive(Clone, Debug)]
pub struct Parallelism {
    available_cpus: usize,
    max_workers: usize,
}

impl Parallelism {
    /// Creates a new instance of `Parallelism` limited by the given amount of workers.
    /// Zero means "use all available cpus".
    pub fn new(max_workers: usize) -> Self {
        let available_cpus = get_cpus();
        let max_workers = if max_workers == 0 { available_cpus } else { max_workers };

        Self { available_cpus, max_workers }
    }

    /// Returns amount of available logical cpus.
    pub fn available_cpus(&self) -> usize {
        self.available_cpus
    }

    /// Returns max amount of workers to be used.
    pub fn max_workers(&self) -> usize {
        self.max_workers.max(1)
    }
}

impl Default for Parallelism {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Keeps track of environment specific information which influences algorithm behavior.
#[derive(Clone)]
pub struct Environment {
    /// A wrapper on random generator.
    pub random: Arc<dyn Random + Send + Sync>,

    /// Keeps data about parallelism settings.
    pub parallelism: Parallelism,

    /// An information logger.
    pub logger: InfoLogger,
}

impl Environment {
    /// Creates an instance of `Environment` using given random source and parallelism settings.
    pub fn new(random: Arc<dyn Random + Send + Sync>, parallelism: Parallelism) -> Self {
        Self { random, parallelism, logger: Arc::new(|msg| println!("{msg}")) }
    }

    /// Creates an instance of `Environment` with the same settings but another logger.
    pub fn with_logger(self, logger: InfoLogger) -> Self {
        Self { logger, ..self }
    }

    /// Creates an instance of `Environment` with a repeatable random generator.
    pub fn new_repeatable(seed: u64, parallelism: Parallelism) -> Self {
        Self::new(Arc::new(DefaultRandom::new_repeatable(seed)), parallelism)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new(Arc::new(DefaultRandom::default()), Parallelism::default())
    }
}
