//! Transport and activity cost functions, including a concurrent memoizing transport cost oracle.

mod activity;
pub use self::activity::*;

mod cache;
pub use self::cache::*;

mod keys;
pub use self::keys::*;

mod oracle;
pub use self::oracle::*;

use crate::models::common::*;
use crate::models::problem::Vehicle;

/// Specifies travel time type.
#[derive(Copy, Clone, Debug)]
pub enum TravelTime {
    /// Arrival time type: the value is a time of arrival at destination.
    Arrival(Timestamp),
    /// Departure time type: the value is a time of departure from origin.
    Departure(Timestamp),
}

/// Provides the way to get routing information for specific locations and vehicle.
///
/// Arrival based queries are approximated: implementations are allowed to evaluate them as
/// departure based ones using arrival time as departure time.
pub trait TransportCost {
    /// Returns time-dependent transport cost between two locations for given vehicle.
    fn cost(&self, vehicle: &Vehicle, from: Location, to: Location, travel_time: TravelTime) -> Cost;

    /// Returns time-dependent travel duration between two locations for given vehicle.
    fn duration(&self, vehicle: &Vehicle, from: Location, to: Location, travel_time: TravelTime) -> Duration;

    /// Returns time-dependent travel distance between two locations for given vehicle.
    fn distance(&self, vehicle: &Vehicle, from: Location, to: Location, travel_time: TravelTime) -> Distance;
}
