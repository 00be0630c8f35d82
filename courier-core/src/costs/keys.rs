use crate::models::common::*;
use std::sync::Arc;

/// A precise cache key: origin and destination links, time slice and vehicle type.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct TransportDataKey {
    /// Origin link.
    pub from: Location,
    /// Destination link.
    pub to: Location,
    /// Departure time slice.
    pub time_slice: i64,
    /// Vehicle type id.
    pub vehicle_type: VehicleTypeId,
}

/// A coarse cache key: origin and destination zones, time slice and vehicle type.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct ZoneKey {
    /// Origin zone.
    pub from_zone: Arc<str>,
    /// Destination zone.
    pub to_zone: Arc<str>,
    /// Departure time slice.
    pub time_slice: i64,
    /// Vehicle type id.
    pub vehicle_type: VehicleTypeId,
}

/// A key into transport data cache.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub enum CacheKey {
    /// A link level key.
    Precise(TransportDataKey),
    /// A zone level key.
    Zone(ZoneKey),
}

impl CacheKey {
    /// Returns true if key is zone level.
    pub fn is_zone(&self) -> bool {
        matches!(self, CacheKey::Zone(_))
    }
}

/// Cached transport data.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransportData {
    /// Travel cost.
    pub cost: Cost,
    /// Travel time.
    pub time: Duration,
    /// Travel distance.
    pub distance: Distance,
}

impl TransportData {
    /// Transport data for identical origin and destination.
    pub fn zero() -> Self {
        Self { cost: 0., time: 0., distance: 0. }
    }

    /// Transport data for unreachable destination.
    pub fn unreachable() -> Self {
        Self { cost: f64::MAX, time: f64::MAX, distance: f64::MAX }
    }

    /// Returns true if destination is reachable.
    pub fn is_reachable(&self) -> bool {
        self.time < f64::MAX
    }
}
