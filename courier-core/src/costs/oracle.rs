#[cfg(test)]
#[path = "../../tests/unit/costs/oracle_test.rs"]
mod oracle_test;

use super::*;
use crate::models::common::*;
use crate::models::problem::{Vehicle, VehicleCosts, VehicleType};
use crate::models::solution::Leg;
use crate::network::*;
use crate::utils::{CourierError, CourierResult, InfoLogger};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, ThreadId};

type SharedPathSearch = Arc<Mutex<Box<dyn LeastCostPathSearch + Send>>>;

/// Keeps counters of cache usage.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LookupStats {
    /// Amount of lookups which used a link level key.
    pub precise: usize,
    /// Amount of lookups which used a zone level key.
    pub zone: usize,
    /// Amount of cache misses which triggered a path search.
    pub computed: usize,
}

#[derive(Default)]
struct LookupCounters {
    precise: AtomicUsize,
    zone: AtomicUsize,
    computed: AtomicUsize,
}

/// A concurrent, memoizing transport cost function over a transportation network.
///
/// Transport data (cost, time, distance) between two links is calculated once per departure
/// time slice and vehicle type, then served from the cache. When both links are tagged with
/// different zones, a zone level key is used instead which trades precision for cache density.
///
/// The oracle can be shared between workers: each worker thread gets its own lazily created
/// path search instance. Concurrent computations of the same key are allowed: they produce the
/// same value and the first inserted one wins.
pub struct TransportCostOracle {
    network: Arc<dyn Network + Send + Sync>,
    disutility: Arc<dyn TravelDisutility + Send + Sync>,
    path_search_factory: PathSearchFactory,
    searchers: RwLock<FxHashMap<ThreadId, SharedPathSearch>>,
    cache: ShardedCache<CacheKey, TransportData>,
    time_slice_width: f64,
    default_vehicle_type: VehicleType,
    counters: LookupCounters,
    logger: Option<InfoLogger>,
}

impl TransportCostOracle {
    /// Returns transport data between two links departing at given time.
    /// Uses a default vehicle type when no vehicle type is specified.
    pub fn transport_data(
        &self,
        from: Location,
        to: Location,
        departure: Timestamp,
        vehicle_type: Option<&VehicleType>,
    ) -> TransportData {
        if from == to {
            return TransportData::zero();
        }

        let vehicle_type = vehicle_type.unwrap_or(&self.default_vehicle_type);
        let departure = self.clamp_departure(departure);

        let key = self.create_key(from, to, self.time_slice(departure), &vehicle_type.id);
        match &key {
            CacheKey::Precise(_) => self.counters.precise.fetch_add(1, Ordering::Relaxed),
            CacheKey::Zone(_) => self.counters.zone.fetch_add(1, Ordering::Relaxed),
        };

        if let Some(data) = self.cache.get(&key) {
            return data;
        }

        self.counters.computed.fetch_add(1, Ordering::Relaxed);
        let data = self.calculate(from, to, departure, vehicle_type);

        self.cache.insert_if_absent(key, data)
    }

    /// Returns travel cost.
    pub fn cost(&self, from: Location, to: Location, departure: Timestamp, vehicle_type: Option<&VehicleType>) -> Cost {
        self.transport_data(from, to, departure, vehicle_type).cost
    }

    /// Returns travel time.
    pub fn time(&self, from: Location, to: Location, departure: Timestamp, vehicle_type: Option<&VehicleType>) -> Duration {
        self.transport_data(from, to, departure, vehicle_type).time
    }

    /// Returns travel distance.
    pub fn distance(
        &self,
        from: Location,
        to: Location,
        departure: Timestamp,
        vehicle_type: Option<&VehicleType>,
    ) -> Distance {
        self.transport_data(from, to, departure, vehicle_type).distance
    }

    /// Returns travel cost for given arrival time. Approximated using arrival as departure time.
    pub fn backward_cost(
        &self,
        from: Location,
        to: Location,
        arrival: Timestamp,
        vehicle_type: Option<&VehicleType>,
    ) -> Cost {
        self.cost(from, to, arrival, vehicle_type)
    }

    /// Returns travel time for given arrival time. Approximated using arrival as departure time.
    pub fn backward_time(
        &self,
        from: Location,
        to: Location,
        arrival: Timestamp,
        vehicle_type: Option<&VehicleType>,
    ) -> Duration {
        self.time(from, to, arrival, vehicle_type)
    }

    /// Returns travel distance for given arrival time. Approximated using arrival as departure time.
    pub fn backward_distance(
        &self,
        from: Location,
        to: Location,
        arrival: Timestamp,
        vehicle_type: Option<&VehicleType>,
    ) -> Distance {
        self.distance(from, to, arrival, vehicle_type)
    }

    /// Calculates an exact route between two links without using the cache. Returned leg
    /// contains all traversed links including origin and destination ones.
    pub fn route_through(
        &self,
        from: Location,
        to: Location,
        departure: Timestamp,
        vehicle_type: &VehicleType,
    ) -> Option<Leg> {
        if from == to {
            return Some(Leg { departure, travel_time: 0., distance: 0., links: vec![from] });
        }

        let (from_link, to_link) = (self.network.link(from)?, self.network.link(to)?);
        let path = self.with_path_search(|search| search.calc_path(from_link.to, to_link.from, departure, vehicle_type))?;

        let to_link_time = self.disutility.link_travel_time(to_link, departure + path.travel_time, vehicle_type);
        let distance = from_link.length + self.path_length(&path);

        let links = std::iter::once(from).chain(path.links).chain(std::iter::once(to)).collect();

        Some(Leg { departure, travel_time: path.travel_time + to_link_time, distance, links })
    }

    /// Creates a cache key. A zone level key is used only when both links are tagged with zones
    /// and zones are different. Otherwise, a link level key is used.
    pub fn create_key(&self, from: Location, to: Location, time_slice: i64, vehicle_type: &VehicleTypeId) -> CacheKey {
        let zone_of = |location: Location| self.network.link(location).and_then(|link| link.zone.clone());
        let zones = zone_of(from).zip(zone_of(to));

        match zones {
            Some((from_zone, to_zone)) if from_zone != to_zone => {
                CacheKey::Zone(ZoneKey { from_zone, to_zone, time_slice, vehicle_type: vehicle_type.clone() })
            }
            _ => CacheKey::Precise(TransportDataKey { from, to, time_slice, vehicle_type: vehicle_type.clone() }),
        }
    }

    /// Returns time slice for given departure time.
    pub fn time_slice(&self, departure: Timestamp) -> i64 {
        (departure / self.time_slice_width).floor() as i64
    }

    /// Returns amount of cached entries.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Returns cache usage statistics.
    pub fn lookup_stats(&self) -> LookupStats {
        LookupStats {
            precise: self.counters.precise.load(Ordering::Relaxed),
            zone: self.counters.zone.load(Ordering::Relaxed),
            computed: self.counters.computed.load(Ordering::Relaxed),
        }
    }

    /// Returns amount of path search instances created so far (one per worker thread).
    pub fn path_search_count(&self) -> usize {
        self.searchers.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    /// Returns underlying network.
    pub fn network(&self) -> &(dyn Network + Send + Sync) {
        self.network.as_ref()
    }

    fn calculate(&self, from: Location, to: Location, departure: Timestamp, vehicle_type: &VehicleType) -> TransportData {
        let (Some(from_link), Some(to_link)) = (self.network.link(from), self.network.link(to)) else {
            self.log(&format!("unknown link in transport data request: {from} -> {to}"));
            return TransportData::unreachable();
        };

        let Some(path) = self.with_path_search(|search| search.calc_path(from_link.to, to_link.from, departure, vehicle_type))
        else {
            return TransportData::unreachable();
        };

        // the path ends at destination link's origin node, so the link itself is added here
        let to_link_departure = departure + path.travel_time;
        let to_link_cost = self.disutility.link_disutility(to_link, to_link_departure, vehicle_type);
        let to_link_time = self.disutility.link_travel_time(to_link, to_link_departure, vehicle_type);

        TransportData {
            cost: path.travel_cost + to_link_cost,
            time: path.travel_time + to_link_time,
            distance: from_link.length + self.path_length(&path),
        }
    }

    fn path_length(&self, path: &Path) -> Distance {
        path.links.iter().filter_map(|&link_id| self.network.link(link_id)).map(|link| link.length).sum()
    }

    fn with_path_search<R>(&self, action: impl FnOnce(&mut dyn LeastCostPathSearch) -> R) -> R {
        let thread_id = thread::current().id();

        let existing = self.searchers.read().unwrap_or_else(|poisoned| poisoned.into_inner()).get(&thread_id).cloned();
        let search = existing.unwrap_or_else(|| {
            let mut searchers = self.searchers.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            searchers
                .entry(thread_id)
                .or_insert_with(|| {
                    Arc::new(Mutex::new((self.path_search_factory)(self.network.clone(), self.disutility.clone())))
                })
                .clone()
        });

        let mut search = search.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        action(search.as_mut())
    }

    fn clamp_departure(&self, departure: Timestamp) -> Timestamp {
        if departure < 0. {
            self.log(&format!("negative departure time {departure} is clamped to zero"));
            0.
        } else {
            departure
        }
    }

    fn log(&self, message: &str) {
        if let Some(logger) = self.logger.as_ref() {
            (logger)(message)
        }
    }
}

impl TransportCost for TransportCostOracle {
    fn cost(&self, vehicle: &Vehicle, from: Location, to: Location, travel_time: TravelTime) -> Cost {
        match travel_time {
            TravelTime::Departure(time) => self.cost(from, to, time, Some(&vehicle.vehicle_type)),
            TravelTime::Arrival(time) => self.backward_cost(from, to, time, Some(&vehicle.vehicle_type)),
        }
    }

    fn duration(&self, vehicle: &Vehicle, from: Location, to: Location, travel_time: TravelTime) -> Duration {
        match travel_time {
            TravelTime::Departure(time) => self.time(from, to, time, Some(&vehicle.vehicle_type)),
            TravelTime::Arrival(time) => self.backward_time(from, to, time, Some(&vehicle.vehicle_type)),
        }
    }

    fn distance(&self, vehicle: &Vehicle, from: Location, to: Location, travel_time: TravelTime) -> Distance {
        match travel_time {
            TravelTime::Departure(time) => self.distance(from, to, time, Some(&vehicle.vehicle_type)),
            TravelTime::Arrival(time) => self.backward_distance(from, to, time, Some(&vehicle.vehicle_type)),
        }
    }
}

/// Builds an instance of [`TransportCostOracle`].
pub struct TransportCostOracleBuilder {
    network: Arc<dyn Network + Send + Sync>,
    disutility: Arc<dyn TravelDisutility + Send + Sync>,
    toll: Option<TollFn>,
    path_search_factory: PathSearchFactory,
    time_slice_width: Option<f64>,
    logger: Option<InfoLogger>,
}

impl TransportCostOracleBuilder {
    /// Creates a new builder over given network.
    pub fn new(network: Arc<dyn Network + Send + Sync>) -> Self {
        Self {
            network,
            disutility: Arc::new(VehicleTypeDisutility::default()),
            toll: None,
            path_search_factory: create_dijkstra_factory(),
            time_slice_width: None,
            logger: None,
        }
    }

    /// Sets time slice width in seconds. By default, all departure times fall into a single slice.
    pub fn with_time_slice_width(mut self, width: f64) -> Self {
        self.time_slice_width = Some(width);
        self
    }

    /// Sets a base travel disutility.
    pub fn with_disutility(mut self, disutility: Arc<dyn TravelDisutility + Send + Sync>) -> Self {
        self.disutility = disutility;
        self
    }

    /// Adds a vehicle type dependent toll on top of the base disutility.
    pub fn with_toll(mut self, toll: TollFn) -> Self {
        self.toll = Some(toll);
        self
    }

    /// Sets a factory of per worker path search instances.
    pub fn with_path_search_factory(mut self, factory: PathSearchFactory) -> Self {
        self.path_search_factory = factory;
        self
    }

    /// Sets a logger used to report diagnostics.
    pub fn with_logger(mut self, logger: InfoLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the oracle.
    pub fn build(self) -> CourierResult<TransportCostOracle> {
        let time_slice_width = self.time_slice_width.unwrap_or(i32::MAX as f64);
        if time_slice_width <= 0. || !time_slice_width.is_finite() {
            return Err(CourierError::validation("time slice width", time_slice_width, "should be positive"));
        }

        let disutility = match self.toll {
            Some(toll) => Arc::new(TollDisutility::new(self.disutility, toll)),
            None => self.disutility,
        };

        Ok(TransportCostOracle {
            network: self.network,
            disutility,
            path_search_factory: self.path_search_factory,
            searchers: RwLock::default(),
            cache: ShardedCache::default(),
            time_slice_width,
            default_vehicle_type: VehicleType::new("default", i32::MAX).with_costs(VehicleCosts {
                fixed: 0.,
                per_distance: 1.,
                per_time: 0.,
            }),
            counters: LookupCounters::default(),
            logger: self.logger,
        })
    }
}
