#[cfg(test)]
#[path = "../../tests/unit/demand/carriers_test.rs"]
mod carriers_test;

use super::*;
use crate::costs::TransportCostOracle;
use crate::models::common::{Duration, Location, TimeWindow, hms};
use crate::models::problem::{Carrier, CarrierVehicleFactory, Job, JobPlace};
use crate::network::Coord;
use crate::utils::{CourierError, CourierResult, InfoLogger, compare_floats};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Service duration of a supply stop at a depot.
pub const SUPPLY_STOP_DURATION: Duration = 1800.;

/// Size of CEP vehicles assigned to generated carriers.
const CEP_VEHICLE_SIZE: &str = "l";

/// A parcel hub of a provider where carrier vehicles are based.
#[derive(Clone, Debug)]
pub struct Depot {
    /// Depot id.
    pub id: String,
    /// A provider which operates the depot.
    pub provider: String,
    /// Depot coordinate.
    pub coord: Coord,
}

/// Turns partitioned demand groups into carriers. Every group is served by a carrier operating
/// from the nearest depot of the group's provider and each delivery point becomes a service job.
pub struct CarrierGenerator {
    factory: CarrierVehicleFactory,
    oracle: Arc<TransportCostOracle>,
    logger: InfoLogger,
}

impl CarrierGenerator {
    /// Creates a new instance of `CarrierGenerator`. Coordinates are mapped to links of the network
    /// used by the oracle.
    pub fn new(factory: CarrierVehicleFactory, oracle: Arc<TransportCostOracle>, logger: InfoLogger) -> Self {
        Self { factory, oracle, logger }
    }

    /// Creates carriers of all groups with at least one delivery. Carriers are ordered by depot id
    /// and then by group key. A fleet of each carrier is big enough to carry all its parcels.
    pub fn generate(&self, groups: &[DemandGroup], depots: &[Depot]) -> CourierResult<Vec<Carrier>> {
        let mut by_depot: BTreeMap<&str, (&Depot, Vec<&DemandGroup>)> = BTreeMap::new();
        for group in groups.iter().filter(|group| group.delivery_count() > 0) {
            let depot = nearest_depot(group, depots)?;
            by_depot.entry(depot.id.as_str()).or_insert_with(|| (depot, vec![])).1.push(group);
        }

        let mut carriers = Vec::with_capacity(groups.len());
        for (depot, mut groups) in by_depot.into_values() {
            groups.sort_by(|a, b| a.key.cmp(&b.key));
            let home = self.location_of(&depot.coord, depot.id.as_str())?;

            (self.logger)(&format!(
                "depot '{}' serves {} demand groups with {} deliveries",
                depot.id,
                groups.len(),
                groups.iter().map(|group| group.delivery_count()).sum::<usize>()
            ));

            for group in groups {
                carriers.push(self.create_carrier(depot, home, group)?);
            }
        }

        Ok(carriers)
    }

    /// Creates one supply carrier per depot which brings all parcels of the depot's carriers from
    /// the supply point. Parcels are split into stops of at most supply vehicle capacity.
    pub fn generate_supply(&self, carriers: &[Carrier], depots: &[Depot], supply: &Coord) -> CourierResult<Vec<Carrier>> {
        let supply_link = self.location_of(supply, "supply point")?;
        let capacity = self.factory.config().supply_vehicle_capacity;
        if capacity <= 0 {
            return Err(CourierError::validation("supply vehicle capacity", capacity, "should be positive"));
        }

        let mut demand: BTreeMap<&str, u64> = BTreeMap::new();
        for carrier in carriers {
            let depot_id = carrier
                .attributes
                .depot_id
                .as_deref()
                .ok_or_else(|| CourierError::missing(format!("depot of carrier {}", carrier.id)))?;
            *demand.entry(depot_id).or_default() += carrier.jobs.iter().map(|job| job.demand.max(0) as u64).sum::<u64>();
        }

        demand
            .into_iter()
            .filter(|(_, parcels)| *parcels > 0)
            .map(|(depot_id, parcels)| -> CourierResult<Carrier> {
                let depot = depots
                    .iter()
                    .find(|depot| depot.id == depot_id)
                    .ok_or_else(|| CourierError::missing(format!("depot {depot_id}")))?;
                let home = self.location_of(&depot.coord, depot.id.as_str())?;

                let capacity = capacity as u64;
                let stops = parcels.div_ceil(capacity);
                let jobs = (0..stops)
                    .map(|idx| {
                        let amount = if idx + 1 < stops { capacity } else { parcels - (stops - 1) * capacity };
                        let place =
                            JobPlace { location: home, duration: SUPPLY_STOP_DURATION, time: TimeWindow::new(0., hms(24, 0, 0)) };

                        Arc::new(Job::service(format!("{depot_id}_{idx}").as_str(), place, amount as i32))
                    })
                    .collect();

                let carrier_id = format!("supply_{depot_id}");
                let vehicles = [true, false]
                    .into_iter()
                    .map(|early| Arc::new(self.factory.create_supply_vehicle(carrier_id.as_str(), supply_link, early)))
                    .collect();

                (self.logger)(&format!("supply carrier '{carrier_id}' brings {parcels} parcels in {stops} stops"));

                let mut carrier = Carrier::new(carrier_id.as_str(), vehicles, jobs);
                carrier.attributes.depot_id = Some(depot.id.clone());

                Ok(carrier)
            })
            .collect()
    }

    fn create_carrier(&self, depot: &Depot, home: Location, group: &DemandGroup) -> CourierResult<Carrier> {
        let config = self.factory.config();
        let (start, end) = config.delivery_time_window;

        let jobs = group
            .points
            .iter()
            .filter(|point| point.parcels > 0)
            .map(|point| -> CourierResult<Arc<Job>> {
                let demand = i32::try_from(point.parcels)
                    .map_err(|_| CourierError::validation("parcel amount", point.parcels, "is too large"))?;
                let place = JobPlace {
                    location: self.location_of(&point.coord, point.id.as_str())?,
                    duration: config.stop_duration(point.parcels as usize),
                    time: TimeWindow::new(start, end),
                };

                Ok(Arc::new(Job::service(point.id.as_str(), place, demand)))
            })
            .collect::<CourierResult<Vec<_>>>()?;

        if config.cep_vehicle_capacity <= 0 {
            return Err(CourierError::validation("cep vehicle capacity", config.cep_vehicle_capacity, "should be positive"));
        }

        let fleet_size = group.parcel_count().div_ceil(config.cep_vehicle_capacity as u64).max(1);
        let start_hour = (start / 3600.).floor() as u32;
        let vehicles = (0..fleet_size)
            .map(|_| self.factory.create_cep_vehicle(home, start_hour, CEP_VEHICLE_SIZE).map(Arc::new))
            .collect::<CourierResult<Vec<_>>>()?;

        let carrier_id = format!("{}_{}", depot.id, group.key);
        (self.logger)(&format!("carrier '{carrier_id}' has {} jobs and {} vehicles", jobs.len(), vehicles.len()));

        let mut carrier = Carrier::new(carrier_id.as_str(), vehicles, jobs);
        carrier.attributes.depot_id = Some(depot.id.clone());

        Ok(carrier)
    }

    fn location_of(&self, coord: &Coord, owner: &str) -> CourierResult<Location> {
        self.oracle.network().nearest_link(coord).ok_or_else(|| CourierError::missing(format!("network link near {owner}")))
    }
}

fn nearest_depot<'a>(group: &DemandGroup, depots: &'a [Depot]) -> CourierResult<&'a Depot> {
    let size = group.points.len().max(1) as f64;
    let (x, y) = group.points.iter().fold((0., 0.), |(x, y), point| (x + point.coord.x, y + point.coord.y));
    let centroid = Coord::new(x / size, y / size);

    depots
        .iter()
        .filter(|depot| depot.provider.eq_ignore_ascii_case(group.provider.as_str()))
        .min_by(|a, b| compare_floats(a.coord.distance(&centroid), b.coord.distance(&centroid)))
        .ok_or_else(|| CourierError::missing(format!("depot of provider {}", group.provider)))
}
