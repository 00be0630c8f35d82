#[cfg(test)]
#[path = "../../tests/unit/feasibility/real_start_test.rs"]
mod real_start_test;

use super::*;
use crate::costs::{TransportCost, TravelTime};

/// Memorizes the route real start time: the latest depot departure which still reaches the first
/// job activity at its operation start. Empty routes get no value.
pub struct RouteRealStartTimeMemorizer {
    transport: Arc<dyn TransportCost + Send + Sync>,
}

impl RouteRealStartTimeMemorizer {
    /// Creates a new instance of `RouteRealStartTimeMemorizer`.
    pub fn new(transport: Arc<dyn TransportCost + Send + Sync>) -> Self {
        Self { transport }
    }
}

impl StateUpdater for RouteRealStartTimeMemorizer {
    fn visit_order(&self) -> VisitOrder {
        VisitOrder::Forward
    }

    fn begin<'a>(&'a self, route: &'a Route) -> Box<dyn RouteVisit + 'a> {
        Box::new(RealStartVisit { transport: self.transport.as_ref(), route, real_start: None })
    }
}

struct RealStartVisit<'a> {
    transport: &'a (dyn TransportCost + Send + Sync),
    route: &'a Route,
    real_start: Option<Timestamp>,
}

impl RouteVisit for RealStartVisit<'_> {
    fn visit(&mut self, index: usize, activity: &Activity) {
        if index != 1 {
            return;
        }

        let vehicle = self.route.vehicle.as_ref();
        let start = self.route.tour.start();
        let (from, to) = (start.place.location, activity.place.location);

        let departure = start.schedule.departure;
        let arrival = departure + self.transport.duration(vehicle, from, to, TravelTime::Departure(departure));
        let operation_start = activity.start_time(arrival);

        self.real_start =
            Some(operation_start - self.transport.duration(vehicle, from, to, TravelTime::Arrival(operation_start)));
    }

    fn finish(self: Box<Self>, state: &mut RouteState) {
        if let Some(real_start) = self.real_start {
            state.set_tour_state::<RouteRealStartTimeKey, _>(real_start);
        }
    }
}
