#[cfg(test)]
#[path = "../../tests/unit/feasibility/backward_pass_test.rs"]
mod backward_pass_test;

use super::*;
use crate::costs::{TransportCost, TravelTime};

/// A default driver operation time limit: eight hours.
pub const MAX_DRIVE_DURATION: Duration = 8. * 3600.;

/// Computes practical time windows in a backward pass over the route.
///
/// The pass stores:
/// - an adjusted depot departure (`NewDepartureKey`) and the latest arrival at depot limited by
///   driver time (`LatestArrivalAtDepotKey`) as tour states;
/// - the latest feasible operation start of each activity (`LatestStartKey`);
/// - the accumulated waiting time from each activity to the route end (`FutureWaitingKey`).
///
/// Activity states are indexed by activity position in the tour, the end activity holds the
/// latest arrival at depot and zero future waiting.
pub struct BackwardFeasibilityPass {
    transport: Arc<dyn TransportCost + Send + Sync>,
    max_driver_time: Duration,
}

impl BackwardFeasibilityPass {
    /// Creates a new instance of `BackwardFeasibilityPass`.
    pub fn new(transport: Arc<dyn TransportCost + Send + Sync>, max_driver_time: Duration) -> Self {
        Self { transport, max_driver_time }
    }
}

impl StateUpdater for BackwardFeasibilityPass {
    fn visit_order(&self) -> VisitOrder {
        VisitOrder::Backward
    }

    fn begin<'a>(&'a self, route: &'a Route) -> Box<dyn RouteVisit + 'a> {
        let new_departure = get_new_departure(route, self.transport.as_ref());
        let latest_arrival_at_depot = route.tour.end().place.time.end.min(new_departure + self.max_driver_time);

        let total = route.tour.total();
        let mut latest_starts = vec![0.; total];
        let future_waiting = vec![0.; total];
        latest_starts[total - 1] = latest_arrival_at_depot;

        Box::new(BackwardVisit {
            transport: self.transport.as_ref(),
            route,
            new_departure,
            latest_arrival_at_depot,
            prev: (route.tour.end().place.location, latest_arrival_at_depot, 0.),
            latest_starts,
            future_waiting,
        })
    }
}

struct BackwardVisit<'a> {
    transport: &'a (dyn TransportCost + Send + Sync),
    route: &'a Route,
    new_departure: Timestamp,
    latest_arrival_at_depot: Timestamp,
    /// Location, latest start and future waiting of the previously visited activity.
    prev: (Location, Timestamp, Duration),
    latest_starts: Vec<Timestamp>,
    future_waiting: Vec<Duration>,
}

impl RouteVisit for BackwardVisit<'_> {
    fn visit(&mut self, index: usize, activity: &Activity) {
        let (prev_location, prev_latest, prev_waiting) = self.prev;

        let travel = self.transport.duration(
            self.route.vehicle.as_ref(),
            activity.place.location,
            prev_location,
            TravelTime::Arrival(prev_latest),
        );
        let latest = activity.place.time.end.min(prev_latest - travel - activity.place.duration);
        let waiting = prev_waiting + (activity.place.time.start - activity.schedule.arrival).max(0.);

        self.latest_starts[index] = latest;
        self.future_waiting[index] = waiting;
        self.prev = (activity.place.location, latest, waiting);
    }

    fn finish(self: Box<Self>, state: &mut RouteState) {
        state.set_tour_state::<NewDepartureKey, _>(self.new_departure);
        state.set_tour_state::<LatestArrivalAtDepotKey, _>(self.latest_arrival_at_depot);
        state.set_activity_states::<LatestStartKey, _>(self.latest_starts);
        state.set_activity_states::<FutureWaitingKey, _>(self.future_waiting);
    }
}
