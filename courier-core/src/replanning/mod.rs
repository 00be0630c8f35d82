//! A per-iteration driver which selects a bounded subset of carriers for re-optimization.

#[cfg(test)]
#[path = "../../tests/unit/replanning/cycle_test.rs"]
mod cycle_test;

use crate::models::problem::Carrier;
use crate::routing::{BatchReport, RoutingScheduler};
use crate::utils::{CourierResult, Environment, GenericResult, read_json_config};
use rand::prelude::SliceRandom;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::Arc;

/// Replanning settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplanningConfig {
    /// Max amount of carriers routed within one cycle.
    pub max_carriers: usize,
    /// A probability of a carrier which already had its first replanning to be re-optimized.
    pub reoptimization_probability: f64,
    /// The first iteration when replanning is active.
    pub first_iteration: usize,
    /// The last iteration (inclusive) when replanning is active.
    pub last_iteration: usize,
}

impl Default for ReplanningConfig {
    fn default() -> Self {
        Self { max_carriers: 32, reoptimization_probability: 0.05, first_iteration: 0, last_iteration: 100 }
    }
}

impl ReplanningConfig {
    /// Reads config from json. Missing fields get default values.
    pub fn from_json<R: Read>(reader: R) -> GenericResult<Self> {
        read_json_config(reader)
    }
}

/// Selects carriers for re-optimization once per simulation iteration and routes them.
///
/// Carriers which were never replanned are taken first and marked. Remaining slots are filled
/// by a random draw of other carriers, each of them is hit with the re-optimization probability.
pub struct ReplanningCycle {
    config: ReplanningConfig,
    environment: Arc<Environment>,
    routing: RoutingScheduler,
}

impl ReplanningCycle {
    /// Creates a new instance of `ReplanningCycle`.
    pub fn new(config: ReplanningConfig, environment: Arc<Environment>, routing: RoutingScheduler) -> Self {
        Self { config, environment, routing }
    }

    /// Runs replanning for given iteration. Returns `None` when iteration is outside of the active
    /// window or no carrier is selected.
    pub fn run_once(&self, carriers: &mut [Carrier], iteration: usize) -> CourierResult<Option<BatchReport>> {
        if iteration < self.config.first_iteration || iteration > self.config.last_iteration {
            return Ok(None);
        }

        let selected = self.select(carriers);

        (self.environment.logger)(&format!(
            "replanning iteration {iteration}: {} of {} carriers selected",
            selected.len(),
            carriers.len()
        ));

        if selected.is_empty() {
            return Ok(None);
        }

        let selected = carriers
            .iter_mut()
            .enumerate()
            .filter(|(idx, _)| selected.contains(idx))
            .map(|(_, carrier)| carrier)
            .collect::<Vec<_>>();

        self.routing.route_selected(selected).map(Some)
    }

    /// Returns indices of selected carriers and marks carriers which get their first replanning.
    fn select(&self, carriers: &mut [Carrier]) -> Vec<usize> {
        let random = self.environment.random.as_ref();
        let max_carriers = self.config.max_carriers;

        let mut first = Vec::new();
        let mut others = Vec::new();

        carriers.iter_mut().enumerate().for_each(|(idx, carrier)| {
            if !carrier.attributes.had_first_replanning {
                if first.len() < max_carriers {
                    carrier.attributes.had_first_replanning = true;
                    first.push(idx);
                }
            } else if random.is_hit(self.config.reoptimization_probability) {
                others.push(idx);
            }
        });

        others.shuffle(&mut random.get_rng());
        others.truncate(max_carriers - first.len());

        (self.environment.logger)(&format!(
            "{} carriers get first replanning, {} carriers are re-optimized",
            first.len(),
            others.len()
        ));

        first.into_iter().chain(others).collect()
    }
}
