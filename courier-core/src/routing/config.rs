use crate::costs::{TransportCostOracle, TransportCostOracleBuilder};
use crate::models::common::*;
use crate::network::Network;
use crate::scheduling::SchedulerKind;
use crate::utils::{CourierResult, GenericResult, InfoLogger, read_json_config};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::Arc;

/// Routing settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoutingConfig {
    /// A concurrency strategy.
    pub scheduler: SchedulerKind,
    /// Amount of workers. Zero means all available cpus.
    pub workers: usize,
    /// A width of departure time slice used by transport cost cache in seconds.
    pub time_slice_width: f64,
    /// Max route duration in seconds.
    pub max_route_duration: Duration,
    /// Max driver operation time in seconds.
    pub max_driver_time: Duration,
    /// Whether vehicles have to return to depot.
    pub returns_to_depot: bool,
    /// If previous solver run of a carrier took longer (seconds), the search effort is halved.
    pub runtime_threshold: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerKind::default(),
            workers: 0,
            time_slice_width: 1800.,
            max_route_duration: hms(8, 0, 0),
            max_driver_time: 600. * 60.,
            returns_to_depot: true,
            runtime_threshold: 900.,
        }
    }
}

impl RoutingConfig {
    /// Reads config from json. Missing fields get default values.
    pub fn from_json<R: Read>(reader: R) -> GenericResult<Self> {
        read_json_config(reader)
    }

    /// Creates a transport cost oracle over given network with configured time slice width.
    pub fn create_oracle(
        &self,
        network: Arc<dyn Network + Send + Sync>,
        logger: InfoLogger,
    ) -> CourierResult<TransportCostOracle> {
        TransportCostOracleBuilder::new(network).with_time_slice_width(self.time_slice_width).with_logger(logger).build()
    }
}
