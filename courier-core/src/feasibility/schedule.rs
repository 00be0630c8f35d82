#[cfg(test)]
#[path = "../../tests/unit/feasibility/schedule_test.rs"]
mod schedule_test;

use crate::costs::{ActivityCost, TransportCost, TravelTime};
use crate::models::common::*;
use crate::models::solution::Route;

/// Updates arrival and departure times of all activities in the route using a forward pass from
/// the start departure. For open routes, end activity is moved to the location of the last job
/// activity, so the route effectively finishes there.
pub fn update_route_schedule(
    route: &mut Route,
    transport: &(dyn TransportCost + Send + Sync),
    activity: &(dyn ActivityCost + Send + Sync),
) {
    if !route.vehicle.returns_to_depot() {
        let last_location = route.tour.all_activities()[route.tour.total() - 2].place.location;
        if let Some(end) = route.tour.get_mut(route.tour.total() - 1) {
            end.place.location = last_location;
        }
    }

    let init = {
        let start = route.tour.start();
        (start.place.location, start.schedule.departure)
    };

    let vehicle = route.vehicle.clone();
    (1..route.tour.total()).fold(init, |(loc, dep), activity_idx| {
        let Some(act) = route.tour.get_mut(activity_idx) else { return (loc, dep) };

        let location = act.place.location;
        let arrival = dep + transport.duration(vehicle.as_ref(), loc, location, TravelTime::Departure(dep));
        let departure = activity.estimate_departure(vehicle.as_ref(), act, arrival);

        act.schedule = Schedule::new(arrival, departure);

        (location, departure)
    });
}

/// Postpones departure from depot of a non-empty route as much as possible without delaying
/// the first stop: `departure = max(departure, first.earliest - travel(start, first))`.
/// Schedules of all activities are recomputed afterwards.
pub fn reschedule_departure(
    route: &mut Route,
    transport: &(dyn TransportCost + Send + Sync),
    activity: &(dyn ActivityCost + Send + Sync),
) {
    if route.tour.is_empty() {
        return;
    }

    let new_departure = get_new_departure(route, transport);

    if let Some(start) = route.tour.get_mut(0) {
        start.schedule.departure = new_departure;
    }

    update_route_schedule(route, transport, activity);
}

/// Returns the latest departure from depot which keeps the first job activity start unchanged.
pub(crate) fn get_new_departure(route: &Route, transport: &(dyn TransportCost + Send + Sync)) -> Timestamp {
    let start = route.tour.start();
    let departure = start.schedule.departure;

    match route.tour.get(1).filter(|first| first.job.is_some()) {
        Some(first) => {
            let travel = transport.duration(
                route.vehicle.as_ref(),
                start.place.location,
                first.place.location,
                TravelTime::Departure(departure),
            );
            departure.max(first.place.time.start - travel)
        }
        None => departure,
    }
}
