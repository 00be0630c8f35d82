//! Incremental route state updaters and hard constraints which are evaluated during candidate
//! insertion search.
//!
//! The search engine drives the plug-ins through an explicit contract:
//!
//! - a [`StateUpdater`] is asked to `begin` a route visit, then it `visit`s every job activity in
//!   its declared [`VisitOrder`], and `finish`es by writing memoized values into [`RouteState`];
//! - a [`HardActivityConstraint`] is a pure function of route context and insertion context which
//!   answers with a [`ConstraintStatus`]; it must use memoized states only, so each evaluation is
//!   constant time.

mod backward_pass;
pub use self::backward_pass::*;

mod capacity;
pub use self::capacity::*;

mod max_duration;
pub use self::max_duration::*;

mod open_route;
pub use self::open_route::*;

mod real_start;
pub use self::real_start::*;

mod schedule;
pub use self::schedule::*;

mod state;
pub use self::state::*;

mod time_windows;
pub use self::time_windows::*;

#[cfg(test)]
#[path = "../../tests/unit/feasibility/engine_test.rs"]
mod engine_test;

use crate::costs::{ActivityCost, TransportCost};
use crate::models::common::*;
use crate::models::problem::Job;
use crate::models::solution::{Activity, Route};
use std::sync::Arc;

/// Specifies result of hard activity constraint check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConstraintStatus {
    /// Insertion is feasible.
    Fulfilled,
    /// Insertion at this position is not feasible.
    NotFulfilled,
    /// Insertion at this position and at any later position is not feasible.
    NotFulfilledBreak,
}

/// Specifies insertion context for activity.
pub struct ActivityContext<'a> {
    /// Activity insertion index.
    pub index: usize,
    /// Previous activity.
    pub prev: &'a Activity,
    /// Target activity.
    pub target: &'a Activity,
    /// Next activity.
    pub next: &'a Activity,
    /// Departure time from previous activity.
    pub prev_departure: Timestamp,
}

/// A hard constraint evaluated for each candidate activity insertion.
pub trait HardActivityConstraint {
    /// Evaluates insertion of target activity between previous and next ones.
    fn evaluate(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> ConstraintStatus;
}

/// A hard constraint evaluated once per job and route before any activity level checks.
pub trait HardRouteConstraint {
    /// Returns true if job can be inserted into the route.
    fn evaluate(&self, route_ctx: &RouteContext, job: &Job) -> bool;
}

/// Specifies the order in which job activities are visited.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VisitOrder {
    /// From the first job activity to the last one.
    Forward,
    /// From the last job activity to the first one.
    Backward,
}

/// A single traversal of a route started by [`StateUpdater::begin`].
pub trait RouteVisit {
    /// Visits job activity with its index in the tour.
    fn visit(&mut self, index: usize, activity: &Activity);

    /// Finishes traversal and stores computed states.
    fn finish(self: Box<Self>, state: &mut RouteState);
}

/// Updates memoized route states after the route was changed.
pub trait StateUpdater {
    /// Returns visit order of job activities.
    fn visit_order(&self) -> VisitOrder;

    /// Begins a route traversal.
    fn begin<'a>(&'a self, route: &'a Route) -> Box<dyn RouteVisit + 'a>;
}

/// Keeps all feasibility plug-ins together and drives them.
#[derive(Clone, Default)]
pub struct FeasibilityEngine {
    updaters: Vec<Arc<dyn StateUpdater + Send + Sync>>,
    activity_constraints: Vec<Arc<dyn HardActivityConstraint + Send + Sync>>,
    route_constraints: Vec<Arc<dyn HardRouteConstraint + Send + Sync>>,
}

impl FeasibilityEngine {
    /// Adds a state updater. Updaters are run in the order they are added.
    pub fn with_updater(mut self, updater: Arc<dyn StateUpdater + Send + Sync>) -> Self {
        self.updaters.push(updater);
        self
    }

    /// Adds an activity constraint.
    pub fn with_activity_constraint(mut self, constraint: Arc<dyn HardActivityConstraint + Send + Sync>) -> Self {
        self.activity_constraints.push(constraint);
        self
    }

    /// Adds a route constraint.
    pub fn with_route_constraint(mut self, constraint: Arc<dyn HardRouteConstraint + Send + Sync>) -> Self {
        self.route_constraints.push(constraint);
        self
    }

    /// Recomputes schedule and all memoized states of the route.
    pub fn accept_route_state(
        &self,
        route_ctx: &mut RouteContext,
        transport: &(dyn TransportCost + Send + Sync),
        activity: &(dyn ActivityCost + Send + Sync),
    ) {
        update_route_schedule(&mut route_ctx.route, transport, activity);

        let RouteContext { route, state } = route_ctx;
        state.clear();

        self.updaters.iter().for_each(|updater| {
            let mut visit = updater.begin(route);
            let activities = route.tour.job_activities().iter().enumerate().map(|(idx, activity)| (idx + 1, activity));

            match updater.visit_order() {
                VisitOrder::Forward => activities.for_each(|(idx, activity)| visit.visit(idx, activity)),
                VisitOrder::Backward => activities.rev().for_each(|(idx, activity)| visit.visit(idx, activity)),
            }

            visit.finish(state);
        });
    }

    /// Evaluates all route constraints.
    pub fn evaluate_route(&self, route_ctx: &RouteContext, job: &Job) -> bool {
        self.route_constraints.iter().all(|constraint| constraint.evaluate(route_ctx, job))
    }

    /// Evaluates activity constraints and returns the first violation.
    pub fn evaluate_activity(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> ConstraintStatus {
        self.activity_constraints
            .iter()
            .map(|constraint| constraint.evaluate(route_ctx, activity_ctx))
            .find(|status| *status != ConstraintStatus::Fulfilled)
            .unwrap_or(ConstraintStatus::Fulfilled)
    }
}

/// Settings of the default feasibility engine.
#[derive(Clone, Debug)]
pub struct FeasibilitySettings {
    /// Max route duration in seconds.
    pub max_route_duration: Duration,
    /// Max operation time of a driver in seconds.
    pub max_driver_time: Duration,
}

impl Default for FeasibilitySettings {
    fn default() -> Self {
        Self { max_route_duration: 8. * 3600., max_driver_time: 600. * 60. }
    }
}

/// Creates a feasibility engine with default plug-ins: route real start memorizer, backward
/// feasibility pass, open route consistency check, capacity, time windows with driver time
/// and max route duration constraints.
pub fn create_default_feasibility_engine(
    transport: Arc<dyn TransportCost + Send + Sync>,
    settings: &FeasibilitySettings,
) -> FeasibilityEngine {
    FeasibilityEngine::default()
        .with_updater(Arc::new(RouteRealStartTimeMemorizer::new(transport.clone())))
        .with_updater(Arc::new(BackwardFeasibilityPass::new(transport.clone(), settings.max_driver_time)))
        .with_updater(Arc::new(OpenRouteConsistencyCheck::default()))
        .with_route_constraint(Arc::new(CapacityConstraint::default()))
        .with_activity_constraint(Arc::new(TimeWindowDriverTimeConstraint::new(transport.clone())))
        .with_activity_constraint(Arc::new(MaxRouteDurationConstraint::new(transport, settings.max_route_duration)))
}
