use super::*;

/// A diagnostic updater for routes of vehicles which do not return to depot: the route end has to
/// be located at the last job activity. A violation means a modeling bug, so it fails loudly in
/// debug builds and is ignored in release ones.
#[derive(Default)]
pub struct OpenRouteConsistencyCheck {}

impl StateUpdater for OpenRouteConsistencyCheck {
    fn visit_order(&self) -> VisitOrder {
        VisitOrder::Backward
    }

    fn begin<'a>(&'a self, route: &'a Route) -> Box<dyn RouteVisit + 'a> {
        Box::new(OpenRouteVisit { route, is_first: true })
    }
}

struct OpenRouteVisit<'a> {
    route: &'a Route,
    is_first: bool,
}

impl RouteVisit for OpenRouteVisit<'_> {
    fn visit(&mut self, _: usize, activity: &Activity) {
        if !self.is_first {
            return;
        }
        self.is_first = false;

        debug_assert!(
            self.route.vehicle.returns_to_depot() || self.route.tour.end().place.location == activity.place.location,
            "open route of vehicle '{}' ends at location {} instead of its last activity location {}",
            self.route.vehicle.id,
            self.route.tour.end().place.location,
            activity.place.location
        );
    }

    fn finish(self: Box<Self>, _: &mut RouteState) {}
}
