#[cfg(test)]
#[path = "../../tests/unit/solver/materialize_test.rs"]
mod materialize_test;

use super::*;
use crate::models::solution::{Leg, ScheduledTour};
use crate::utils::CourierError;

/// Converts a solution into a carrier plan. Each leg between consecutive stops is recomputed by an
/// exact path search, so the plan contains link sequences which vehicles actually traverse.
pub fn materialize_routes(carrier: &Carrier, solution: &Solution, oracle: &TransportCostOracle) -> CourierResult<Plan> {
    let tours = solution
        .routes
        .iter()
        .filter(|route_ctx| !route_ctx.route.tour.is_empty())
        .map(|route_ctx| {
            let route = &route_ctx.route;
            // open routes finish at the last job
            let activities = route.tour.all_activities();
            let stops = if route.vehicle.returns_to_depot() {
                activities.to_vec()
            } else {
                activities[..activities.len() - 1].to_vec()
            };

            let legs = stops
                .windows(2)
                .map(|pair| {
                    let (from, to) = (&pair[0], &pair[1]);
                    oracle
                        .route_through(
                            from.place.location,
                            to.place.location,
                            from.schedule.departure,
                            &route.vehicle.vehicle_type,
                        )
                        .ok_or_else(|| {
                            CourierError::task(
                                carrier.id.as_str(),
                                format!(
                                    "no route between links {} and {} for vehicle '{}'",
                                    from.place.location, to.place.location, route.vehicle.id
                                ),
                            )
                        })
                })
                .collect::<CourierResult<Vec<Leg>>>()?;

            Ok(ScheduledTour { vehicle: route.vehicle.clone(), stops, legs })
        })
        .collect::<CourierResult<Vec<_>>>()?;

    let unassigned = solution.unassigned.iter().map(|job| job.id.clone()).collect();

    Ok(Plan { tours, cost: solution.cost, unassigned })
}
