#[cfg(test)]
#[path = "../../tests/unit/feasibility/time_windows_test.rs"]
mod time_windows_test;

use super::*;
use crate::costs::{TransportCost, TravelTime};

/// Checks time windows of the inserted activity and its successor against practical time windows
/// produced by [`BackwardFeasibilityPass`]. As the latest arrival at depot is limited by driver time,
/// this constraint also keeps the route within the driver operation time.
pub struct TimeWindowDriverTimeConstraint {
    transport: Arc<dyn TransportCost + Send + Sync>,
}

impl TimeWindowDriverTimeConstraint {
    /// Creates a new instance of `TimeWindowDriverTimeConstraint`.
    pub fn new(transport: Arc<dyn TransportCost + Send + Sync>) -> Self {
        Self { transport }
    }
}

impl HardActivityConstraint for TimeWindowDriverTimeConstraint {
    fn evaluate(&self, route_ctx: &RouteContext, activity_ctx: &ActivityContext) -> ConstraintStatus {
        let vehicle = route_ctx.route.vehicle.as_ref();
        let ActivityContext { index, prev, target, next, prev_departure } = *activity_ctx;

        // NOTE activities after this position start even later
        if target.place.time.end < prev.place.time.start {
            return ConstraintStatus::NotFulfilledBreak;
        }

        let latest_at_depot = route_ctx
            .state
            .get_tour_state::<LatestArrivalAtDepotKey, Timestamp>()
            .copied()
            .unwrap_or(route_ctx.route.tour.end().place.time.end);

        let target_arrival = prev_departure
            + self.transport.duration(
                vehicle,
                prev.place.location,
                target.place.location,
                TravelTime::Departure(prev_departure),
            );

        if target_arrival > target.place.time.end {
            return ConstraintStatus::NotFulfilled;
        }

        let target_end = target.end_time(target_arrival);

        if next.is_end() && !vehicle.returns_to_depot() {
            return if target_end > latest_at_depot { ConstraintStatus::NotFulfilled } else { ConstraintStatus::Fulfilled };
        }

        let latest_next = if next.is_end() {
            latest_at_depot
        } else {
            route_ctx.state.get_activity_state::<LatestStartKey, Timestamp>(index).copied().unwrap_or(next.place.time.end)
        };

        let next_arrival = target_end
            + self.transport.duration(vehicle, target.place.location, next.place.location, TravelTime::Departure(target_end));

        if next_arrival > latest_next {
            ConstraintStatus::NotFulfilled
        } else {
            ConstraintStatus::Fulfilled
        }
    }
}
