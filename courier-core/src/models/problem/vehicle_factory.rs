#[cfg(test)]
#[path = "../../../tests/unit/models/problem/vehicle_factory_test.rs"]
mod vehicle_factory_test;

use crate::models::common::*;
use crate::models::problem::{Vehicle, VehicleType};
use crate::utils::{CourierError, CourierResult, GenericResult, Random, read_json_config};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fleet related settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FleetConfig {
    /// Capacity (parcels) of a courier, express and parcel (CEP) vehicle.
    pub cep_vehicle_capacity: i32,
    /// Capacity (parcels) of a supply vehicle.
    pub supply_vehicle_capacity: i32,
    /// Max route duration in seconds.
    pub max_route_duration: Duration,
    /// Service duration per single parcel in seconds.
    pub duration_per_parcel: Duration,
    /// Upper bound of service duration at a single stop in seconds.
    pub max_duration_per_stop: Duration,
    /// Time window (seconds) when deliveries are accepted.
    pub delivery_time_window: (Timestamp, Timestamp),
    /// The latest time vehicle can finish its shift.
    pub latest_vehicle_end: Timestamp,
    /// Whether vehicles return to their depot.
    pub returns_to_depot: bool,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            cep_vehicle_capacity: 230,
            supply_vehicle_capacity: 2000,
            max_route_duration: hms(8, 0, 0),
            duration_per_parcel: 120.,
            max_duration_per_stop: 900.,
            delivery_time_window: (hms(8, 0, 0), hms(20, 0, 0)),
            latest_vehicle_end: hms(21, 0, 0),
            returns_to_depot: true,
        }
    }
}

impl FleetConfig {
    /// Reads config from json. Missing fields get default values.
    pub fn from_json<R: Read>(reader: R) -> GenericResult<Self> {
        read_json_config(reader)
    }

    /// Returns service duration at a stop with given amount of parcels.
    pub fn stop_duration(&self, parcels: usize) -> Duration {
        (parcels as f64 * self.duration_per_parcel).min(self.max_duration_per_stop)
    }
}

/// Creates CEP vehicles of different sizes with slightly randomized shift start and supply
/// vehicles which bring parcels to depots.
pub struct CarrierVehicleFactory {
    config: FleetConfig,
    large: Arc<VehicleType>,
    medium: Arc<VehicleType>,
    supply: Arc<VehicleType>,
    random: Arc<dyn Random + Send + Sync>,
    sequence: AtomicUsize,
}

impl CarrierVehicleFactory {
    /// Type id of a large vehicle.
    pub const LARGE_TYPE_ID: &'static str = "ct_cep_size_l";
    /// Type id of a medium vehicle.
    pub const MEDIUM_TYPE_ID: &'static str = "ct_cep_size_m";
    /// Type id of a supply vehicle.
    pub const SUPPLY_TYPE_ID: &'static str = "ct_supply";

    /// Creates a new instance of `CarrierVehicleFactory`.
    pub fn new(
        config: FleetConfig,
        vehicle_types: &[Arc<VehicleType>],
        random: Arc<dyn Random + Send + Sync>,
    ) -> CourierResult<Self> {
        let find_type = |id: &str| {
            vehicle_types
                .iter()
                .find(|vehicle_type| vehicle_type.id.as_ref() == id)
                .cloned()
                .ok_or_else(|| CourierError::missing(format!("vehicle type {id}")))
        };

        let supply = Arc::new(VehicleType::new(Self::SUPPLY_TYPE_ID, config.supply_vehicle_capacity));

        Ok(Self {
            large: find_type(Self::LARGE_TYPE_ID)?,
            medium: find_type(Self::MEDIUM_TYPE_ID)?,
            supply,
            config,
            random,
            sequence: AtomicUsize::new(0),
        })
    }

    /// Returns fleet config.
    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    /// Creates a vehicle of given size ("l" or "m") located at home link and starting
    /// around `start_hour`.
    pub fn create_cep_vehicle(&self, home: Location, start_hour: u32, size: &str) -> CourierResult<Vehicle> {
        let (vehicle_type, shift_minutes) = match size.to_lowercase().as_str() {
            "l" => (self.large.clone(), 5.),
            "m" => (self.medium.clone(), 15.),
            _ => return Err(CourierError::validation("vehicle size", size, "only 'l' and 'm' are supported")),
        };

        let time_shift = self.random.standard_normal() * shift_minutes;
        let start = (start_hour * 3600) as f64 + time_shift * 60.;
        let end = (start + self.config.max_route_duration + 3600.).min(self.config.latest_vehicle_end);

        Ok(Vehicle {
            id: format!("cep_size_{}_{start_hour}_{}", size.to_lowercase(), self.next_sequence()),
            vehicle_type,
            start: home,
            end: if self.config.returns_to_depot { Some(home) } else { None },
            time: TimeWindow::new(start, end),
        })
    }

    /// Creates a supply vehicle located at home link. An early vehicle works in the morning shift,
    /// a late one starts at noon.
    pub fn create_supply_vehicle(&self, carrier_id: &str, home: Location, early: bool) -> Vehicle {
        let (shift, start) = if early { ("early", hms(4, 0, 0)) } else { ("late", hms(12, 0, 0)) };

        Vehicle {
            id: format!("{carrier_id}_supply_{shift}_{}", self.next_sequence()),
            vehicle_type: self.supply.clone(),
            start: home,
            end: Some(home),
            time: TimeWindow::new(start, start + self.config.max_route_duration),
        }
    }

    fn next_sequence(&self) -> usize {
        self.sequence.fetch_add(1, Ordering::Relaxed)
    }
}
