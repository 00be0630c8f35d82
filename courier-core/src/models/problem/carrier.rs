#[cfg(test)]
#[path = "../../../tests/unit/models/problem/carrier_test.rs"]
mod carrier_test;

use crate::models::problem::{Job, Vehicle};
use crate::models::solution::Plan;
use courier_kit::utils::compare_floats;
use std::cmp::Ordering;
use std::sync::Arc;

/// Default amount of plans kept in carrier's memory.
pub const DEFAULT_MAX_PLANS: usize = 5;

/// Keeps runtime metadata of a carrier between replanning cycles.
#[derive(Clone, Debug, Default)]
pub struct CarrierAttributes {
    /// Duration of the latest solver run in seconds.
    pub algo_run_time_secs: Option<f64>,
    /// Whether carrier has already got its first replanning.
    pub had_first_replanning: bool,
    /// Id of a depot the carrier operates from.
    pub depot_id: Option<String>,
}

/// A logistics operator with a vehicle fleet and a set of jobs to fulfill.
#[derive(Clone, Debug)]
pub struct Carrier {
    /// An unique carrier id.
    pub id: String,
    /// A carrier fleet.
    pub vehicles: Vec<Arc<Vehicle>>,
    /// Jobs to be served.
    pub jobs: Vec<Arc<Job>>,
    /// Runtime metadata.
    pub attributes: CarrierAttributes,
    plans: Vec<Plan>,
    selected: Option<usize>,
    max_plans: usize,
}

impl Carrier {
    /// Creates a new carrier without plans.
    pub fn new(id: &str, vehicles: Vec<Arc<Vehicle>>, jobs: Vec<Arc<Job>>) -> Self {
        Self {
            id: id.to_string(),
            vehicles,
            jobs,
            attributes: CarrierAttributes::default(),
            plans: vec![],
            selected: None,
            max_plans: DEFAULT_MAX_PLANS,
        }
    }

    /// Sets the maximum amount of plans kept in memory, at least one.
    pub fn with_max_plans(mut self, max_plans: usize) -> Self {
        self.max_plans = max_plans.max(1);
        self.evict_plans();
        self
    }

    /// Returns total amount of jobs: services and shipments.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Returns amount of service jobs.
    pub fn service_count(&self) -> usize {
        self.jobs.iter().filter(|job| job.is_service()).count()
    }

    /// Returns all candidate plans.
    pub fn plans(&self) -> &[Plan] {
        self.plans.as_slice()
    }

    /// Returns selected plan if any.
    pub fn selected_plan(&self) -> Option<&Plan> {
        self.selected.and_then(|idx| self.plans.get(idx))
    }

    /// Adds a plan and marks it as selected. When plan memory is full, the worst plan other than
    /// the selected one is removed.
    pub fn set_selected_plan(&mut self, plan: Plan) {
        self.plans.push(plan);
        self.selected = Some(self.plans.len() - 1);
        self.evict_plans();
    }

    fn evict_plans(&mut self) {
        while self.plans.len() > self.max_plans {
            let worst = self
                .plans
                .iter()
                .enumerate()
                .filter(|(idx, _)| Some(*idx) != self.selected)
                .max_by(|(a_idx, a), (b_idx, b)| {
                    a.unassigned
                        .len()
                        .cmp(&b.unassigned.len())
                        .then_with(|| compare_floats(a.cost, b.cost))
                        // older plan is evicted first on ties
                        .then_with(|| b_idx.cmp(a_idx))
                })
                .map(|(idx, _)| idx);

            let Some(worst) = worst else { break };

            self.plans.remove(worst);
            self.selected = self.selected.map(|idx| match idx.cmp(&worst) {
                Ordering::Greater => idx - 1,
                _ => idx,
            });
        }
    }
}
