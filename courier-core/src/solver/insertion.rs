#[cfg(test)]
#[path = "../../tests/unit/solver/insertion_test.rs"]
mod insertion_test;

use super::*;
use crate::feasibility::{ActivityContext, ConstraintStatus, reschedule_departure};
use crate::models::problem::JobKind;
use crate::models::solution::{Activity, ActivityKind, Place, Route};
use crate::utils::{CourierError, Environment, compare_floats};
use rand::prelude::SliceRandom;

/// A reference solver which builds routes with a sequential cheapest feasible insertion and then
/// improves them by a simple ruin and recreate loop: at each iteration either a cluster of jobs
/// around a random job (radial) or a set of random jobs is removed and inserted back in random
/// order. The search stops after given amount of iterations or after given amount of iterations
/// without improvement. At the end, departure times of all routes are postponed as much as
/// possible without delaying the first stop.
pub struct CheapestInsertionSolver {
    environment: Arc<Environment>,
}

/// An insertion of a job: activities with their tour indices applied in order.
struct InsertionResult {
    route_idx: usize,
    cost: Cost,
    activities: Vec<(usize, Activity)>,
}

impl CheapestInsertionSolver {
    /// Creates a new instance of `CheapestInsertionSolver`.
    pub fn new(environment: Arc<Environment>) -> Self {
        Self { environment }
    }

    fn create_initial(&self, algorithm: &Algorithm) -> Solution {
        let problem = algorithm.problem.as_ref();
        let mut routes = create_empty_routes(algorithm, problem.vehicles.as_slice());
        let unassigned = recreate(algorithm, &mut routes, problem.jobs.clone());

        create_solution(algorithm, routes, unassigned)
    }

    fn ruin_and_recreate(&self, algorithm: &Algorithm, solution: &Solution) -> Solution {
        let problem = algorithm.problem.as_ref();
        let random = self.environment.random.as_ref();

        let mut routes = solution.routes.clone();
        let unused = problem
            .vehicles
            .iter()
            .filter(|vehicle| !routes.iter().any(|route_ctx| Arc::ptr_eq(&route_ctx.route.vehicle, vehicle)))
            .cloned()
            .collect::<Vec<_>>();
        routes.extend(create_empty_routes(algorithm, unused.as_slice()));

        let assigned = routes.iter().flat_map(|route_ctx| route_ctx.route.tour.jobs()).collect::<Vec<_>>();
        let removed = if random.is_head_not_tails() {
            self.select_radial(algorithm, assigned)
        } else {
            self.select_random(algorithm, assigned)
        };

        for job in removed.iter() {
            for route_ctx in routes.iter_mut() {
                if route_ctx.route.tour.remove_job(job) {
                    algorithm.engine.accept_route_state(route_ctx, problem.transport.as_ref(), problem.activity.as_ref());
                    break;
                }
            }
        }

        let mut jobs = removed.into_iter().chain(solution.unassigned.iter().cloned()).collect::<Vec<_>>();
        jobs.shuffle(&mut random.get_rng());

        let unassigned = recreate(algorithm, &mut routes, jobs);

        create_solution(algorithm, routes, unassigned)
    }

    fn select_radial(&self, algorithm: &Algorithm, assigned: Vec<Arc<Job>>) -> Vec<Arc<Job>> {
        let problem = algorithm.problem.as_ref();
        let (Some(vehicle), false) = (problem.vehicles.first(), assigned.is_empty()) else { return vec![] };

        let seed_idx = self.environment.random.uniform_int(0, assigned.len() as i32 - 1) as usize;
        let seed_location = first_location(&assigned[seed_idx]);

        let mut neighbours = assigned
            .into_iter()
            .map(|job| {
                let distance = problem.transport.distance(
                    vehicle,
                    seed_location,
                    first_location(&job),
                    TravelTime::Departure(vehicle.time.start),
                );
                (job, distance)
            })
            .collect::<Vec<_>>();
        neighbours.sort_by(|(_, a), (_, b)| compare_floats(*a, *b));

        neighbours.into_iter().take(algorithm.settings.radial_share.max(1)).map(|(job, _)| job).collect()
    }

    fn select_random(&self, algorithm: &Algorithm, mut assigned: Vec<Arc<Job>>) -> Vec<Arc<Job>> {
        assigned.shuffle(&mut self.environment.random.get_rng());
        assigned.truncate(algorithm.settings.random_share.max(1));

        assigned
    }
}

impl Solver for CheapestInsertionSolver {
    fn search(&self, algorithm: &Algorithm) -> CourierResult<Vec<Solution>> {
        let problem = algorithm.problem.as_ref();
        if problem.vehicles.is_empty() && !problem.jobs.is_empty() {
            return Err(CourierError::missing("vehicles"));
        }

        let mut best = self.create_initial(algorithm);
        let mut no_improvement = 0;

        for _ in 0..algorithm.settings.max_iterations {
            if no_improvement >= algorithm.settings.no_improvement_termination {
                break;
            }

            let candidate = self.ruin_and_recreate(algorithm, &best);
            if compare_solutions(&candidate, &best) == Ordering::Less {
                best = candidate;
                no_improvement = 0;
            } else {
                no_improvement += 1;
            }
        }

        let Solution { mut routes, unassigned, .. } = best;
        routes.iter_mut().for_each(|route_ctx| {
            reschedule_departure(&mut route_ctx.route, problem.transport.as_ref(), problem.activity.as_ref());
            algorithm.engine.accept_route_state(route_ctx, problem.transport.as_ref(), problem.activity.as_ref());
        });

        Ok(vec![create_solution(algorithm, routes, unassigned)])
    }
}

fn create_empty_routes(algorithm: &Algorithm, vehicles: &[Arc<Vehicle>]) -> Vec<RouteContext> {
    let problem = algorithm.problem.as_ref();

    vehicles
        .iter()
        .map(|vehicle| {
            let mut route_ctx = RouteContext::new(Route::new(vehicle.clone()));
            algorithm.engine.accept_route_state(&mut route_ctx, problem.transport.as_ref(), problem.activity.as_ref());
            route_ctx
        })
        .collect()
}

fn create_solution(algorithm: &Algorithm, routes: Vec<RouteContext>, unassigned: Vec<Arc<Job>>) -> Solution {
    let problem = algorithm.problem.as_ref();
    let routes = routes.into_iter().filter(|route_ctx| !route_ctx.route.tour.is_empty()).collect::<Vec<_>>();
    let cost = routes
        .iter()
        .map(|route_ctx| get_route_cost(route_ctx, problem.transport.as_ref(), problem.activity.as_ref()))
        .sum();

    Solution { routes, unassigned, cost }
}

/// Inserts jobs one by one at their cheapest feasible position. Returns jobs which cannot be inserted.
fn recreate(algorithm: &Algorithm, routes: &mut [RouteContext], jobs: Vec<Arc<Job>>) -> Vec<Arc<Job>> {
    let problem = algorithm.problem.as_ref();

    jobs.into_iter()
        .filter_map(|job| {
            let best = routes
                .iter()
                .enumerate()
                .filter_map(|(route_idx, route_ctx)| evaluate_job(algorithm, route_idx, route_ctx, &job))
                .min_by(|a, b| compare_floats(a.cost, b.cost));

            match best {
                Some(InsertionResult { route_idx, activities, .. }) => {
                    let route_ctx = &mut routes[route_idx];
                    activities.into_iter().for_each(|(index, activity)| route_ctx.route.tour.insert_at(activity, index));
                    algorithm.engine.accept_route_state(route_ctx, problem.transport.as_ref(), problem.activity.as_ref());
                    None
                }
                None => Some(job),
            }
        })
        .collect()
}

fn evaluate_job(
    algorithm: &Algorithm,
    route_idx: usize,
    route_ctx: &RouteContext,
    job: &Arc<Job>,
) -> Option<InsertionResult> {
    if !algorithm.engine.evaluate_route(route_ctx, job) {
        return None;
    }

    match &job.kind {
        JobKind::Service { place } => {
            let target = Activity::new_job(ActivityKind::Service, Place::from(place), job.clone());
            let (index, cost) = find_best_position(algorithm, route_ctx, &target, 1)?;

            Some(InsertionResult { route_idx, cost, activities: vec![(index, target)] })
        }
        JobKind::Shipment { pickup, delivery } => {
            let problem = algorithm.problem.as_ref();
            let pickup = Activity::new_job(ActivityKind::Pickup, Place::from(pickup), job.clone());
            let delivery = Activity::new_job(ActivityKind::Delivery, Place::from(delivery), job.clone());
            let tour = &route_ctx.route.tour;

            let mut best: Option<InsertionResult> = None;
            for pickup_idx in 1..tour.total() {
                let Some(activity_ctx) = create_activity_context(route_ctx, &pickup, pickup_idx) else { continue };

                match algorithm.engine.evaluate_activity(route_ctx, &activity_ctx) {
                    ConstraintStatus::NotFulfilledBreak => break,
                    ConstraintStatus::NotFulfilled => continue,
                    ConstraintStatus::Fulfilled => {}
                }

                let pickup_cost = get_insertion_cost(algorithm, route_ctx, &activity_ctx);

                let mut temp_ctx = route_ctx.clone();
                temp_ctx.route.tour.insert_at(pickup.clone(), pickup_idx);
                algorithm.engine.accept_route_state(&mut temp_ctx, problem.transport.as_ref(), problem.activity.as_ref());

                let Some((delivery_idx, delivery_cost)) =
                    find_best_position(algorithm, &temp_ctx, &delivery, pickup_idx + 1)
                else {
                    continue;
                };

                let cost = pickup_cost + delivery_cost;
                if best.as_ref().is_none_or(|best| cost < best.cost) {
                    best = Some(InsertionResult {
                        route_idx,
                        cost,
                        activities: vec![(pickup_idx, pickup.clone()), (delivery_idx, delivery.clone())],
                    });
                }
            }

            best
        }
    }
}

fn find_best_position(
    algorithm: &Algorithm,
    route_ctx: &RouteContext,
    target: &Activity,
    start_index: usize,
) -> Option<(usize, Cost)> {
    let mut best: Option<(usize, Cost)> = None;

    for index in start_index..route_ctx.route.tour.total() {
        let Some(activity_ctx) = create_activity_context(route_ctx, target, index) else { continue };

        match algorithm.engine.evaluate_activity(route_ctx, &activity_ctx) {
            ConstraintStatus::NotFulfilledBreak => break,
            ConstraintStatus::NotFulfilled => continue,
            ConstraintStatus::Fulfilled => {
                let cost = get_insertion_cost(algorithm, route_ctx, &activity_ctx);
                if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                    best = Some((index, cost));
                }
            }
        }
    }

    best
}

fn create_activity_context<'a>(
    route_ctx: &'a RouteContext,
    target: &'a Activity,
    index: usize,
) -> Option<ActivityContext<'a>> {
    let tour = &route_ctx.route.tour;
    let (prev, next) = (tour.get(index.checked_sub(1)?)?, tour.get(index)?);

    Some(ActivityContext { index, prev, target, next, prev_departure: prev.schedule.departure })
}

fn get_insertion_cost(algorithm: &Algorithm, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> Cost {
    let problem = algorithm.problem.as_ref();
    let route = &route_ctx.route;
    let vehicle = route.vehicle.as_ref();
    let ActivityContext { prev, target, next, prev_departure, .. } = *activity_ctx;

    let departure = TravelTime::Departure(prev_departure);
    let arrival =
        prev_departure + problem.transport.duration(vehicle, prev.place.location, target.place.location, departure);
    let target_end = target.end_time(arrival);

    let to_target = problem.transport.cost(vehicle, prev.place.location, target.place.location, departure)
        + problem.activity.cost(vehicle, target, arrival);

    let (to_next, old) = if next.is_end() && !vehicle.returns_to_depot() {
        (0., 0.)
    } else {
        (
            problem.transport.cost(vehicle, target.place.location, next.place.location, TravelTime::Departure(target_end)),
            problem.transport.cost(vehicle, prev.place.location, next.place.location, departure),
        )
    };

    let fixed = if route.tour.is_empty() { vehicle.vehicle_type.costs.fixed } else { 0. };

    to_target + to_next - old + fixed
}

fn first_location(job: &Job) -> Location {
    match &job.kind {
        JobKind::Service { place } => place.location,
        JobKind::Shipment { pickup, .. } => pickup.location,
    }
}
