//! This module reimports a common used types.

// Reimport core types
pub use crate::costs::{ActivityCost, PenaltyActivityCost, TransportCost, TransportCostOracle, TransportCostOracleBuilder};
pub use crate::demand::{
    CarrierGenerator, DemandConfig, DemandGroup, DemandPartitioner, DemandProcessor, Depot, WeightSampler,
};
pub use crate::feasibility::{FeasibilityEngine, FeasibilitySettings, create_default_feasibility_engine};
pub use crate::models::problem::{Carrier, CarrierVehicleFactory, FleetConfig, Job, Vehicle, VehicleType};
pub use crate::models::solution::Plan;
pub use crate::network::{InMemoryNetwork, InMemoryNetworkBuilder, Network};
pub use crate::replanning::{ReplanningConfig, ReplanningCycle};
pub use crate::routing::{BatchReport, RoutingConfig, RoutingScheduler};
pub use crate::scheduling::SchedulerKind;
pub use crate::solver::{CheapestInsertionSolver, Solver};
pub use crate::utils::{CourierError, CourierResult};

// Reimport courier-kit utils
pub use courier_kit::utils::DefaultRandom;
pub use courier_kit::utils::Environment;
pub use courier_kit::utils::InfoLogger;
pub use courier_kit::utils::Random;
pub use courier_kit::utils::compare_floats;
pub use courier_kit::utils::{GenericError, GenericResult};
