#[cfg(test)]
#[path = "../../tests/unit/costs/activity_test.rs"]
mod activity_test;

use crate::models::common::*;
use crate::models::problem::Vehicle;
use crate::models::solution::Activity;

/// Provides the way to get cost information for specific activities done by specific vehicle.
pub trait ActivityCost {
    /// Returns cost to perform activity.
    fn cost(&self, vehicle: &Vehicle, activity: &Activity, arrival: Timestamp) -> Cost;

    /// Estimates departure time for activity and vehicle at given arrival time.
    fn estimate_departure(&self, _vehicle: &Vehicle, activity: &Activity, arrival: Timestamp) -> Timestamp {
        activity.end_time(arrival)
    }
}

/// Activity costs which penalize late arrivals in addition to waiting and service time.
pub struct PenaltyActivityCost {
    late_penalty: Cost,
}

impl PenaltyActivityCost {
    /// Creates a new instance of `PenaltyActivityCost` with given penalty per second of lateness.
    pub fn new(late_penalty: Cost) -> Self {
        Self { late_penalty }
    }
}

impl Default for PenaltyActivityCost {
    fn default() -> Self {
        Self::new(5.)
    }
}

impl ActivityCost for PenaltyActivityCost {
    fn cost(&self, vehicle: &Vehicle, activity: &Activity, arrival: Timestamp) -> Cost {
        let per_time = vehicle.vehicle_type.costs.per_time;

        let waiting = (activity.place.time.start - arrival).max(0.);
        let too_late = (arrival - activity.place.time.end).max(0.);
        let service = activity.place.duration;

        too_late * self.late_penalty + waiting * per_time + service * per_time
    }
}
