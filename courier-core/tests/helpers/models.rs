use crate::costs::{ActivityCost, TransportCost, TravelTime};
use crate::feasibility::*;
use crate::models::common::*;
use crate::models::problem::*;
use crate::models::solution::*;
use std::sync::Arc;

pub const DEFAULT_CAPACITY: i32 = 10;

/// Travels one location unit per second: duration, distance and cost are `|to - from|`.
#[derive(Default)]
pub struct TestTransportCost {}

impl TestTransportCost {
    pub fn new_shared() -> Arc<dyn TransportCost + Send + Sync> {
        Arc::new(Self::default())
    }
}

impl TransportCost for TestTransportCost {
    fn cost(&self, _: &Vehicle, from: Location, to: Location, _: TravelTime) -> Cost {
        fake_routing(from, to)
    }

    fn duration(&self, _: &Vehicle, from: Location, to: Location, _: TravelTime) -> Duration {
        fake_routing(from, to)
    }

    fn distance(&self, _: &Vehicle, from: Location, to: Location, _: TravelTime) -> Distance {
        fake_routing(from, to)
    }
}

pub fn fake_routing(from: Location, to: Location) -> f64 {
    from.abs_diff(to) as f64
}

/// Activities cost nothing.
#[derive(Default)]
pub struct TestActivityCost {}

impl TestActivityCost {
    pub fn new_shared() -> Arc<dyn ActivityCost + Send + Sync> {
        Arc::new(Self::default())
    }
}

impl ActivityCost for TestActivityCost {
    fn cost(&self, _: &Vehicle, _: &Activity, _: Timestamp) -> Cost {
        0.
    }
}

pub fn test_vehicle_type(capacity: i32) -> Arc<VehicleType> {
    Arc::new(VehicleType::new("test_type", capacity))
}

pub fn test_vehicle(id: &str, start: Location, end: Option<Location>, (from, to): (f64, f64)) -> Arc<Vehicle> {
    test_vehicle_with_capacity(id, start, end, (from, to), DEFAULT_CAPACITY)
}

pub fn test_vehicle_with_capacity(
    id: &str,
    start: Location,
    end: Option<Location>,
    (from, to): (f64, f64),
    capacity: i32,
) -> Arc<Vehicle> {
    Arc::new(Vehicle {
        id: id.to_string(),
        vehicle_type: test_vehicle_type(capacity),
        start,
        end,
        time: TimeWindow::new(from, to),
    })
}

pub fn test_place(location: Location, (start, end): (f64, f64), duration: Duration) -> JobPlace {
    JobPlace { location, duration, time: TimeWindow::new(start, end) }
}

pub fn test_service(id: &str, location: Location) -> Arc<Job> {
    test_service_with_time(id, location, (0., f64::MAX), 0.)
}

pub fn test_service_with_time(id: &str, location: Location, time: (f64, f64), duration: Duration) -> Arc<Job> {
    Arc::new(Job::service(id, test_place(location, time, duration), 1))
}

pub fn test_shipment(id: &str, pickup: Location, delivery: Location) -> Arc<Job> {
    Arc::new(Job::shipment(
        id,
        test_place(pickup, (0., f64::MAX), 0.),
        test_place(delivery, (0., f64::MAX), 0.),
        1,
    ))
}

/// Creates a target activity from a service job.
pub fn service_activity(job: &Arc<Job>) -> Activity {
    match &job.kind {
        JobKind::Service { place } => Activity::new_job(ActivityKind::Service, Place::from(place), job.clone()),
        JobKind::Shipment { .. } => unreachable!("shipment is not expected"),
    }
}

pub fn create_test_engine(max_route_duration: Duration, max_driver_time: Duration) -> FeasibilityEngine {
    create_default_feasibility_engine(
        TestTransportCost::new_shared(),
        &FeasibilitySettings { max_route_duration, max_driver_time },
    )
}

/// Creates a route context with services visited in the given order and with computed states.
pub fn create_route_ctx(engine: &FeasibilityEngine, vehicle: Arc<Vehicle>, jobs: &[Arc<Job>]) -> RouteContext {
    let mut route = Route::new(vehicle);
    jobs.iter().enumerate().for_each(|(idx, job)| route.tour.insert_at(service_activity(job), idx + 1));

    let mut route_ctx = RouteContext::new(route);
    accept_route(engine, &mut route_ctx);

    route_ctx
}

pub fn accept_route(engine: &FeasibilityEngine, route_ctx: &mut RouteContext) {
    engine.accept_route_state(route_ctx, &TestTransportCost::default(), &TestActivityCost::default());
}

/// Creates an insertion context of the target at the given tour index.
pub fn create_activity_ctx<'a>(route_ctx: &'a RouteContext, target: &'a Activity, index: usize) -> ActivityContext<'a> {
    let tour = &route_ctx.route.tour;
    let prev = tour.get(index - 1).expect("no prev activity");
    let next = tour.get(index).expect("no next activity");

    ActivityContext { index, prev, target, next, prev_departure: prev.schedule.departure }
}
