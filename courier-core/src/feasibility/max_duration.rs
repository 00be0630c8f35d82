#[cfg(test)]
#[path = "../../tests/unit/feasibility/max_duration_test.rs"]
mod max_duration_test;

use super::*;
use crate::costs::{TransportCost, TravelTime};

/// Rejects insertions which make the route longer than the given limit.
///
/// A route duration is measured from the route real start time (see [`RouteRealStartTimeMemorizer`])
/// to the arrival at the route end. The resulting duration is estimated as the old duration plus
/// an increase caused by insertion:
/// - a shift of the real start time when the new activity becomes the first one;
/// - a delay propagated to the next activity reduced by the waiting time which the rest of the
///   route can absorb (see [`FutureWaitingKey`]), or the whole extra time spent at the new
///   activity when it becomes the last one of an open route.
///
/// Evaluation uses memoized states only and takes constant time.
pub struct MaxRouteDurationConstraint {
    transport: Arc<dyn TransportCost + Send + Sync>,
    max_route_duration: Duration,
}

impl MaxRouteDurationConstraint {
    /// Creates a new instance of `MaxRouteDurationConstraint`.
    pub fn new(transport: Arc<dyn TransportCost + Send + Sync>, max_route_duration: Duration) -> Self {
        Self { transport, max_route_duration }
    }

    fn old_duration(&self, route_ctx: &RouteContext) -> Duration {
        if route_ctx.route.tour.is_empty() {
            return 0.;
        }

        let real_start = route_ctx.state.get_tour_state::<RouteRealStartTimeKey, Timestamp>().copied();
        let end_arrival = route_ctx.route.tour.end().schedule.arrival;

        real_start.map_or(0., |real_start| end_arrival - real_start)
    }
}

impl HardActivityConstraint for MaxRouteDurationConstraint {
    fn evaluate(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> ConstraintStatus {
        let route = &route_ctx.route;
        let vehicle = route.vehicle.as_ref();
        let ActivityContext { index, prev, target, next, prev_departure } = *activity_ctx;

        let old_duration = self.old_duration(route_ctx);
        if old_duration > self.max_route_duration && !prev.is_start() {
            return ConstraintStatus::NotFulfilledBreak;
        }

        let travel = |from: Location, to: Location, time: TravelTime| self.transport.duration(vehicle, from, to, time);

        let target_arrival =
            prev_departure + travel(prev.place.location, target.place.location, TravelTime::Departure(prev_departure));
        let target_start = target.start_time(target_arrival);
        let target_end = target_start + target.place.duration;

        let mut increase = 0.;

        if prev.is_start() {
            let new_real_start = target_start
                - travel(prev.place.location, target.place.location, TravelTime::Arrival(prev_departure));

            let old_real_start = if route.tour.is_empty() {
                prev_departure
            } else {
                route_ctx.state.get_tour_state::<RouteRealStartTimeKey, Timestamp>().copied().unwrap_or(prev_departure)
            };

            increase += old_real_start - new_real_start;
        }

        if next.is_end() && !vehicle.returns_to_depot() {
            increase += target_end - prev_departure;
        } else {
            let next_arrival_new =
                target_end + travel(target.place.location, next.place.location, TravelTime::Departure(target_end));
            let next_end_new = next.end_time(next_arrival_new);

            let next_arrival_old = prev_departure
                + travel(prev.place.location, next.place.location, TravelTime::Departure(prev.schedule.departure));
            let next_end_old = next.end_time(next_arrival_old);

            let delay = (next_end_new - next_end_old).max(0.);
            let future_waiting = route_ctx.state.get_activity_state::<FutureWaitingKey, Duration>(index).copied();

            increase += (delay - future_waiting.unwrap_or(0.)).max(0.);
        }

        if old_duration + increase > self.max_route_duration {
            ConstraintStatus::NotFulfilled
        } else {
            ConstraintStatus::Fulfilled
        }
    }
}
