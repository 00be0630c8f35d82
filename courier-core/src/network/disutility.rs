#[cfg(test)]
#[path = "../../tests/unit/network/disutility_test.rs"]
mod disutility_test;

use super::Link;
use crate::models::common::*;
use crate::models::problem::VehicleType;
use std::sync::Arc;

/// A velocity used on links where vehicle's network mode is not allowed. It keeps such links
/// usable, but extremely expensive.
pub const PENALTY_VELOCITY: f64 = 0.001;

/// Returns link travel time for given vehicle type.
pub fn link_travel_time(link: &Link, vehicle_type: &VehicleType) -> Duration {
    let velocity = vehicle_type.max_velocity.min(link.freespeed);
    assert!(velocity > 0., "velocity must be bigger than zero, link: {}", link.id);

    if link.allows(vehicle_type.network_mode.as_str()) {
        link.length / velocity
    } else {
        link.length / PENALTY_VELOCITY
    }
}

/// Specifies a generalized cost of traversing a link.
pub trait TravelDisutility {
    /// Returns link travel time at given time.
    fn link_travel_time(&self, link: &Link, _time: Timestamp, vehicle_type: &VehicleType) -> Duration {
        link_travel_time(link, vehicle_type)
    }

    /// Returns disutility of traversing a link at given time.
    fn link_disutility(&self, link: &Link, time: Timestamp, vehicle_type: &VehicleType) -> Cost;
}

/// A disutility which is proportional to distance and travel time with vehicle type
/// specific coefficients.
#[derive(Default)]
pub struct VehicleTypeDisutility {}

impl TravelDisutility for VehicleTypeDisutility {
    fn link_disutility(&self, link: &Link, time: Timestamp, vehicle_type: &VehicleType) -> Cost {
        let travel_time = self.link_travel_time(link, time, vehicle_type);

        vehicle_type.costs.per_distance * link.length + vehicle_type.costs.per_time * travel_time
    }
}

/// Specifies a toll amount function: vehicle type, link, time.
pub type TollFn = Arc<dyn Fn(&VehicleType, &Link, Timestamp) -> Cost + Send + Sync>;

/// Adds a toll surcharge to another disutility.
pub struct TollDisutility {
    base: Arc<dyn TravelDisutility + Send + Sync>,
    toll: TollFn,
}

impl TollDisutility {
    /// Creates a new instance of `TollDisutility`.
    pub fn new(base: Arc<dyn TravelDisutility + Send + Sync>, toll: TollFn) -> Self {
        Self { base, toll }
    }
}

impl TravelDisutility for TollDisutility {
    fn link_travel_time(&self, link: &Link, time: Timestamp, vehicle_type: &VehicleType) -> Duration {
        self.base.link_travel_time(link, time, vehicle_type)
    }

    fn link_disutility(&self, link: &Link, time: Timestamp, vehicle_type: &VehicleType) -> Cost {
        self.base.link_disutility(link, time, vehicle_type) + (self.toll)(vehicle_type, link, time)
    }
}
