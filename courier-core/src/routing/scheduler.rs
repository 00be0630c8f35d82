#[cfg(test)]
#[path = "../../tests/unit/routing/scheduler_test.rs"]
mod scheduler_test;

use super::*;
use crate::costs::{ActivityCost, PenaltyActivityCost, TransportCost, TransportCostOracle};
use crate::feasibility::{FeasibilitySettings, create_default_feasibility_engine};
use crate::models::problem::{Carrier, Vehicle};
use crate::models::solution::Plan;
use crate::scheduling::{Scheduler, Task, TaskResult, create_scheduler};
use crate::solver::Solver;
use crate::utils::{CourierError, CourierResult, Environment, GenericResult, Parallelism, Timer};
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A routed plan of a single carrier together with solver runtime.
pub struct RoutedCarrier {
    /// A routed plan.
    pub plan: Plan,
    /// Time spent on routing in seconds.
    pub runtime_secs: f64,
}

/// A summary of a routing batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Amount of successfully routed carriers.
    pub succeeded: usize,
    /// Carriers which failed with their errors.
    pub failed: Vec<(String, CourierError)>,
    /// Completion timestamps (seconds since batch start) per carrier in scheduling order.
    pub completions: Vec<(String, f64)>,
}

/// Routes carriers in parallel: each carrier is an independent task which builds a routing
/// problem, runs solver with adaptive effort bounds and materializes the best solution into the
/// carrier's selected plan.
pub struct RoutingScheduler {
    config: RoutingConfig,
    environment: Arc<Environment>,
    solver: Arc<dyn Solver + Send + Sync>,
    oracle: Arc<TransportCostOracle>,
    activity: Arc<dyn ActivityCost + Send + Sync>,
    scheduler: Box<dyn Scheduler<RoutedCarrier> + Send + Sync>,
}

impl RoutingScheduler {
    /// Creates a new instance of `RoutingScheduler` using the strategy specified in config.
    pub fn new(
        config: RoutingConfig,
        environment: Arc<Environment>,
        solver: Arc<dyn Solver + Send + Sync>,
        oracle: Arc<TransportCostOracle>,
    ) -> GenericResult<Self> {
        let parallelism = Parallelism::new(config.workers);
        let scheduler = create_scheduler(config.scheduler, &parallelism)?;

        Ok(Self { config, environment, solver, oracle, activity: Arc::new(PenaltyActivityCost::default()), scheduler })
    }

    /// Returns routing config.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Routes all given carriers.
    pub fn route_all(&self, carriers: &mut [Carrier]) -> CourierResult<BatchReport> {
        self.route_selected(carriers.iter_mut().collect())
    }

    /// Routes selected carriers: largest problems are scheduled first. A failure of a single carrier
    /// is logged and reported without affecting other ones. Under strategies which surface a
    /// failure, successful results are still applied and the first failure is returned.
    pub fn route_selected(&self, mut carriers: Vec<&mut Carrier>) -> CourierResult<BatchReport> {
        carriers.sort_by_key(|carrier| Reverse(carrier.job_count()));

        let total = carriers.len();
        let progress = AtomicUsize::new(0);

        let tasks = carriers
            .iter()
            .map(|carrier| {
                let carrier: &Carrier = carrier;
                let progress = &progress;
                Task::new(carrier.id.as_str(), carrier.job_count(), move || {
                    let current = progress.fetch_add(1, Ordering::Relaxed) + 1;
                    self.log(&format!("routing carrier {current} out of {total}: {}", carrier.id));

                    self.route_carrier(carrier)
                })
            })
            .collect::<Vec<_>>();

        let outcome = self.scheduler.run_batch(tasks);

        let completions = outcome.results.iter().map(|result| (result.id.clone(), result.completed_secs)).collect();
        let mut results = outcome.results.into_iter().fold(
            FxHashMap::<String, VecDeque<TaskResult<RoutedCarrier>>>::default(),
            |mut results, result| {
                results.entry(result.id.clone()).or_default().push_back(result);
                results
            },
        );

        let report = carriers.iter_mut().fold(BatchReport { completions, ..BatchReport::default() }, |mut report, carrier| {
            let result = results
                .get_mut(carrier.id.as_str())
                .and_then(VecDeque::pop_front)
                .map(|result| result.result)
                .unwrap_or_else(|| Err(CourierError::task(carrier.id.as_str(), "routing result is missing")));

            match result {
                Ok(RoutedCarrier { plan, runtime_secs }) => {
                    carrier.attributes.algo_run_time_secs = Some(runtime_secs);
                    carrier.set_selected_plan(plan);
                    report.succeeded += 1;
                }
                Err(err) => {
                    self.log(&format!("routing of carrier '{}' failed: {err}", carrier.id));
                    report.failed.push((carrier.id.clone(), err));
                }
            }

            report
        });

        self.log(&format!(
            "routing batch finished: {} succeeded, {} failed, cost cache holds {} entries",
            report.succeeded,
            report.failed.len(),
            self.oracle.cache_len()
        ));

        match outcome.surfaced {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }

    fn route_carrier(&self, carrier: &Carrier) -> CourierResult<RoutedCarrier> {
        let timer = Timer::start();
        let as_task_failure = |err: CourierError| match err {
            err @ CourierError::TaskFailure { .. } => err,
            err => CourierError::task(carrier.id.as_str(), err.to_string()),
        };

        let settings =
            create_algorithm_settings(carrier.job_count(), carrier.attributes.algo_run_time_secs, self.config.runtime_threshold);

        let transport: Arc<dyn TransportCost + Send + Sync> = self.oracle.clone();
        let vehicles = carrier.vehicles.iter().map(|vehicle| self.adjust_vehicle(vehicle)).collect();

        let problem = self.solver.build_problem(carrier.jobs.clone(), vehicles, transport.clone(), self.activity.clone());
        let engine = create_default_feasibility_engine(
            transport,
            &FeasibilitySettings {
                max_route_duration: self.config.max_route_duration,
                max_driver_time: self.config.max_driver_time,
            },
        );
        let algorithm = self.solver.configure(Arc::new(problem), Arc::new(engine), settings);

        let solutions = self.solver.search(&algorithm).map_err(as_task_failure)?;
        let best = self
            .solver
            .best_of(solutions)
            .ok_or_else(|| CourierError::task(carrier.id.as_str(), "solver returned no solutions"))?;

        let plan = self.solver.materialize_routes(carrier, &best, self.oracle.as_ref()).map_err(as_task_failure)?;
        let runtime_secs = timer.elapsed_secs_as_float();

        self.log(&format!(
            "routing for carrier '{}' finished in {runtime_secs:.3}s: {} jobs ({} services), {} tours, {} unassigned",
            carrier.id,
            carrier.job_count(),
            carrier.service_count(),
            plan.tours.len(),
            plan.unassigned.len()
        ));

        Ok(RoutedCarrier { plan, runtime_secs })
    }

    fn adjust_vehicle(&self, vehicle: &Arc<Vehicle>) -> Arc<Vehicle> {
        if self.config.returns_to_depot || vehicle.end.is_none() {
            vehicle.clone()
        } else {
            Arc::new(Vehicle { end: None, ..vehicle.as_ref().clone() })
        }
    }

    fn log(&self, message: &str) {
        (self.environment.logger)(message)
    }
}
