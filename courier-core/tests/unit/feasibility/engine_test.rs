use super::*;
use crate::helpers::models::*;
use std::sync::Mutex;

struct ForwardKey;

struct BackwardKey;

struct RecordingUpdater {
    order: VisitOrder,
}

struct RecordingVisit {
    order: VisitOrder,
    indices: Vec<usize>,
}

impl StateUpdater for RecordingUpdater {
    fn visit_order(&self) -> VisitOrder {
        self.order
    }

    fn begin<'a>(&'a self, _: &'a Route) -> Box<dyn RouteVisit + 'a> {
        Box::new(RecordingVisit { order: self.order, indices: vec![] })
    }
}

impl RouteVisit for RecordingVisit {
    fn visit(&mut self, index: usize, _: &Activity) {
        self.indices.push(index);
    }

    fn finish(self: Box<Self>, state: &mut RouteState) {
        match self.order {
            VisitOrder::Forward => state.set_tour_state::<ForwardKey, _>(self.indices),
            VisitOrder::Backward => state.set_tour_state::<BackwardKey, _>(self.indices),
        }
    }
}

struct FixedActivityConstraint {
    status: ConstraintStatus,
    calls: Mutex<usize>,
}

impl FixedActivityConstraint {
    fn new(status: ConstraintStatus) -> Arc<Self> {
        Arc::new(Self { status, calls: Mutex::new(0) })
    }
}

impl HardActivityConstraint for FixedActivityConstraint {
    fn evaluate(&self, _: &RouteContext, _: &ActivityContext) -> ConstraintStatus {
        *self.calls.lock().unwrap() += 1;
        self.status
    }
}

fn create_route_with_three_jobs(engine: &FeasibilityEngine) -> RouteContext {
    let jobs = vec![test_service("s1", 10), test_service("s2", 20), test_service("s3", 30)];
    create_route_ctx(engine, test_vehicle("v1", 0, Some(0), (0., 1000.)), jobs.as_slice())
}

#[test]
fn can_visit_activities_in_declared_order() {
    let engine = FeasibilityEngine::default()
        .with_updater(Arc::new(RecordingUpdater { order: VisitOrder::Forward }))
        .with_updater(Arc::new(RecordingUpdater { order: VisitOrder::Backward }));

    let route_ctx = create_route_with_three_jobs(&engine);

    assert_eq!(route_ctx.state.get_tour_state::<ForwardKey, Vec<usize>>(), Some(&vec![1, 2, 3]));
    assert_eq!(route_ctx.state.get_tour_state::<BackwardKey, Vec<usize>>(), Some(&vec![3, 2, 1]));
}

#[test]
fn can_recompute_states_after_route_change() {
    let engine = FeasibilityEngine::default().with_updater(Arc::new(RecordingUpdater { order: VisitOrder::Forward }));
    let mut route_ctx = create_route_with_three_jobs(&engine);
    route_ctx.state.set_tour_state::<BackwardKey, _>(vec![42_usize]);

    let job = route_ctx.route.tour.jobs()[1].clone();
    route_ctx.route.tour.remove_job(&job);
    accept_route(&engine, &mut route_ctx);

    assert_eq!(route_ctx.state.get_tour_state::<ForwardKey, Vec<usize>>(), Some(&vec![1, 2]));
    assert!(route_ctx.state.get_tour_state::<BackwardKey, Vec<usize>>().is_none());
    assert_eq!(route_ctx.route.tour.end().schedule.arrival, 60.);
}

parameterized_test! {can_return_first_violation, (statuses, expected, expected_calls), {
    let statuses: Vec<ConstraintStatus> = statuses;
    let expected_calls: Vec<usize> = expected_calls;
    let constraints = statuses.into_iter().map(FixedActivityConstraint::new).collect::<Vec<_>>();
    let engine = constraints
        .iter()
        .fold(FeasibilityEngine::default(), |engine, constraint| engine.with_activity_constraint(constraint.clone()));
    let route_ctx = create_route_with_three_jobs(&engine);
    let target = service_activity(&test_service("target", 5));

    let status = engine.evaluate_activity(&route_ctx, &create_activity_ctx(&route_ctx, &target, 1));

    assert_eq!(status, expected);
    assert_eq!(constraints.iter().map(|constraint| *constraint.calls.lock().unwrap()).collect::<Vec<_>>(), expected_calls);
}}

can_return_first_violation! {
    case01_all_fulfilled: (vec![ConstraintStatus::Fulfilled, ConstraintStatus::Fulfilled], ConstraintStatus::Fulfilled, vec![1, 1]),
    case02_break_first: (vec![ConstraintStatus::NotFulfilledBreak, ConstraintStatus::NotFulfilled], ConstraintStatus::NotFulfilledBreak, vec![1, 0]),
    case03_second: (vec![ConstraintStatus::Fulfilled, ConstraintStatus::NotFulfilled], ConstraintStatus::NotFulfilled, vec![1, 1]),
    case04_no_constraints: (vec![], ConstraintStatus::Fulfilled, vec![]),
}

parameterized_test! {can_evaluate_capacity, (capacity, expected), {
    let engine = create_test_engine(f64::MAX, f64::MAX);
    let jobs = vec![test_service("s1", 10), test_service("s2", 20)];
    let route_ctx = create_route_ctx(&engine, test_vehicle_with_capacity("v1", 0, Some(0), (0., 1000.), capacity), jobs.as_slice());

    assert_eq!(engine.evaluate_route(&route_ctx, test_service("s3", 30).as_ref()), expected);
}}

can_evaluate_capacity! {
    case01_below: (4, true),
    case02_exact: (3, true),
    case03_above: (2, false),
}

#[test]
fn can_populate_default_states() {
    let engine = create_test_engine(8. * 3600., 600. * 60.);

    let route_ctx = create_route_with_three_jobs(&engine);

    let state = &route_ctx.state;
    assert_eq!(state.get_tour_state::<RouteRealStartTimeKey, f64>().copied(), Some(0.));
    assert_eq!(state.get_tour_state::<NewDepartureKey, f64>().copied(), Some(0.));
    assert_eq!(state.get_tour_state::<LatestArrivalAtDepotKey, f64>().copied(), Some(1000.));
    assert_eq!(state.get_activity_state::<LatestStartKey, f64>(3).copied(), Some(970.));
    assert_eq!(state.get_activity_state::<FutureWaitingKey, f64>(1).copied(), Some(0.));
}

#[test]
fn can_accept_open_route() {
    let engine = create_test_engine(8. * 3600., 600. * 60.);
    let jobs = vec![test_service("s1", 10), test_service("s2", 40)];

    let route_ctx = create_route_ctx(&engine, test_vehicle("v1", 0, None, (0., 1000.)), jobs.as_slice());

    assert_eq!(route_ctx.route.tour.end().place.location, 40);
    assert_eq!(route_ctx.route.tour.end().schedule.arrival, 40.);
}

#[test]
fn can_use_default_feasibility_settings() {
    let settings = FeasibilitySettings::default();

    assert_eq!(settings.max_route_duration, 28800.);
    assert_eq!(settings.max_driver_time, 36000.);
}
