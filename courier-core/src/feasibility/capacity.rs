use super::*;

/// Checks that total demand of the route does not exceed vehicle capacity.
#[derive(Default)]
pub struct CapacityConstraint {}

impl HardRouteConstraint for CapacityConstraint {
    fn evaluate(&self, route_ctx: &RouteContext, job: &Job) -> bool {
        route_ctx.route.tour.total_demand() + job.demand <= route_ctx.route.vehicle.capacity()
    }
}
