use crate::models::common::*;
use std::sync::Arc;

/// Represents operating costs of a vehicle type.
#[derive(Clone, Debug)]
pub struct VehicleCosts {
    /// A fixed cost to use a vehicle.
    pub fixed: Cost,
    /// Cost per distance unit (meter).
    pub per_distance: Cost,
    /// Cost per time unit (second).
    pub per_time: Cost,
}

impl Default for VehicleCosts {
    fn default() -> Self {
        Self { fixed: 0., per_distance: 1., per_time: 0. }
    }
}

/// Represents a vehicle type shared by many vehicles.
#[derive(Clone, Debug)]
pub struct VehicleType {
    /// An unique vehicle type id.
    pub id: VehicleTypeId,
    /// Max amount of demand units the vehicle can carry.
    pub capacity: i32,
    /// Operating costs.
    pub costs: VehicleCosts,
    /// Max velocity in meters per second.
    pub max_velocity: f64,
    /// A network mode used to check whether a link is accessible.
    pub network_mode: String,
}

impl VehicleType {
    /// Creates a new instance of `VehicleType` with default costs and unlimited velocity.
    pub fn new(id: &str, capacity: i32) -> Self {
        Self {
            id: id.into(),
            capacity,
            costs: VehicleCosts::default(),
            max_velocity: f64::MAX,
            network_mode: "car".to_string(),
        }
    }

    /// Sets costs.
    pub fn with_costs(self, costs: VehicleCosts) -> Self {
        Self { costs, ..self }
    }

    /// Sets max velocity.
    pub fn with_max_velocity(self, max_velocity: f64) -> Self {
        Self { max_velocity, ..self }
    }

    /// Sets network mode.
    pub fn with_network_mode(self, network_mode: &str) -> Self {
        Self { network_mode: network_mode.to_string(), ..self }
    }
}

/// Represents a single vehicle of carrier's fleet.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// An unique vehicle id.
    pub id: String,
    /// A vehicle type.
    pub vehicle_type: Arc<VehicleType>,
    /// A home (depot) location where vehicle starts.
    pub start: Location,
    /// An end location. `None` means that route is open and vehicle does not return to depot.
    pub end: Option<Location>,
    /// Operating time: earliest start and latest end.
    pub time: TimeWindow,
}

impl Vehicle {
    /// Returns true if vehicle has to return to depot.
    pub fn returns_to_depot(&self) -> bool {
        self.end.is_some()
    }

    /// Returns vehicle capacity.
    pub fn capacity(&self) -> i32 {
        self.vehicle_type.capacity
    }
}
