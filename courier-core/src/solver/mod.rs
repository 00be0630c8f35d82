//! A contract of the route search engine and a simple reference implementation.
//!
//! The routing layer treats a route search engine as a black box: it builds a problem, configures
//! an algorithm with feasibility plug-ins and effort bounds, runs the search and picks the best
//! solution. Feasibility plug-ins are passed through a [`FeasibilityEngine`], so any engine which
//! drives the state updater contract can be substituted.

mod insertion;
pub use self::insertion::*;

mod materialize;
pub use self::materialize::*;

use crate::costs::{ActivityCost, TransportCost, TransportCostOracle, TravelTime};
use crate::feasibility::{FeasibilityEngine, RouteContext};
use crate::models::common::*;
use crate::models::problem::{Carrier, Job, Vehicle};
use crate::models::solution::Plan;
use crate::utils::{CourierResult, compare_floats};
use std::cmp::Ordering;
use std::sync::Arc;

/// A routing problem of a single carrier.
#[derive(Clone)]
pub struct RoutingProblem {
    /// Jobs to be assigned.
    pub jobs: Vec<Arc<Job>>,
    /// Vehicles available. Each vehicle can be used at most once.
    pub vehicles: Vec<Arc<Vehicle>>,
    /// Transport cost function.
    pub transport: Arc<dyn TransportCost + Send + Sync>,
    /// Activity cost function.
    pub activity: Arc<dyn ActivityCost + Send + Sync>,
}

/// Specifies search effort and neighborhood sizes.
#[derive(Clone, Debug, PartialEq)]
pub struct AlgorithmSettings {
    /// Max amount of search iterations.
    pub max_iterations: usize,
    /// Amount of consecutive iterations without improvement which stops the search.
    pub no_improvement_termination: usize,
    /// Amount of jobs removed around a random job within one iteration.
    pub radial_share: usize,
    /// Amount of random jobs removed within one iteration.
    pub random_share: usize,
}

/// A configured algorithm ready to be run.
#[derive(Clone)]
pub struct Algorithm {
    /// A problem to solve.
    pub problem: Arc<RoutingProblem>,
    /// Feasibility plug-ins: state updaters and hard constraints.
    pub engine: Arc<FeasibilityEngine>,
    /// Effort bounds.
    pub settings: AlgorithmSettings,
}

/// A solution found by solver.
#[derive(Clone)]
pub struct Solution {
    /// Routes of used vehicles.
    pub routes: Vec<RouteContext>,
    /// Jobs which cannot be assigned.
    pub unassigned: Vec<Arc<Job>>,
    /// Total cost.
    pub cost: Cost,
}

/// A route search engine consumed by the routing layer.
pub trait Solver {
    /// Builds a routing problem.
    fn build_problem(
        &self,
        jobs: Vec<Arc<Job>>,
        vehicles: Vec<Arc<Vehicle>>,
        transport: Arc<dyn TransportCost + Send + Sync>,
        activity: Arc<dyn ActivityCost + Send + Sync>,
    ) -> RoutingProblem {
        RoutingProblem { jobs, vehicles, transport, activity }
    }

    /// Configures an algorithm with feasibility plug-ins and effort bounds.
    fn configure(
        &self,
        problem: Arc<RoutingProblem>,
        engine: Arc<FeasibilityEngine>,
        settings: AlgorithmSettings,
    ) -> Algorithm {
        Algorithm { problem, engine, settings }
    }

    /// Runs the search and returns found solutions.
    fn search(&self, algorithm: &Algorithm) -> CourierResult<Vec<Solution>>;

    /// Selects the best solution: with the least amount of unassigned jobs, then with the least cost.
    fn best_of(&self, solutions: Vec<Solution>) -> Option<Solution> {
        solutions.into_iter().min_by(compare_solutions)
    }

    /// Converts solution into a routed plan with exact link level legs.
    fn materialize_routes(
        &self,
        carrier: &Carrier,
        solution: &Solution,
        oracle: &TransportCostOracle,
    ) -> CourierResult<Plan> {
        materialize_routes(carrier, solution, oracle)
    }
}

/// Compares solutions: less unassigned jobs first, then less cost.
pub fn compare_solutions(a: &Solution, b: &Solution) -> Ordering {
    a.unassigned.len().cmp(&b.unassigned.len()).then_with(|| compare_floats(a.cost, b.cost))
}

/// Calculates route cost: fixed vehicle cost, transport costs of all legs and activity costs.
/// Empty routes cost nothing.
pub fn get_route_cost(
    route_ctx: &RouteContext,
    transport: &(dyn TransportCost + Send + Sync),
    activity: &(dyn ActivityCost + Send + Sync),
) -> Cost {
    let route = &route_ctx.route;
    if route.tour.is_empty() {
        return 0.;
    }

    let vehicle = route.vehicle.as_ref();

    route.tour.all_activities().windows(2).fold(vehicle.vehicle_type.costs.fixed, |acc, pair| {
        let (prev, next) = (&pair[0], &pair[1]);
        let departure = prev.schedule.departure;

        let travel = transport.cost(vehicle, prev.place.location, next.place.location, TravelTime::Departure(departure));
        let operation = if next.job.is_some() { activity.cost(vehicle, next, next.schedule.arrival) } else { 0. };

        acc + travel + operation
    })
}
