#[cfg(test)]
#[path = "../../tests/unit/demand/processor_test.rs"]
mod processor_test;

use super::*;
use crate::utils::{CourierError, CourierResult, Environment, GenericResult, read_json_config};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use std::sync::Arc;

/// Demand processing settings.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DemandConfig {
    /// Max amount of deliveries in a single demand group.
    pub demand_border: usize,
    /// Features with more parcels are considered as outliers and skipped.
    pub max_parcels_per_feature: u64,
    /// Max iterations of clustering.
    pub kmeans_max_iterations: usize,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self { demand_border: 600, max_parcels_per_feature: 1500, kmeans_max_iterations: 100 }
    }
}

impl DemandConfig {
    /// Reads config from json. Missing fields get default values.
    pub fn from_json<R: Read>(reader: R) -> GenericResult<Self> {
        read_json_config(reader)
    }
}

/// Turns raw demand features into capacity bounded demand groups and deliveries.
pub struct DemandProcessor {
    config: DemandConfig,
    providers: Vec<String>,
    environment: Arc<Environment>,
    partitioner: DemandPartitioner,
}

impl DemandProcessor {
    /// Creates a new instance of `DemandProcessor` using [`SameSizeKMeans`] clustering.
    pub fn new(config: DemandConfig, providers: &[&str], environment: Arc<Environment>) -> CourierResult<Self> {
        let clustering = Arc::new(SameSizeKMeans::new(environment.random.clone(), config.kmeans_max_iterations));
        Self::with_clustering(config, providers, environment, clustering)
    }

    /// Creates a new instance of `DemandProcessor` using custom clustering. Demand border should be
    /// positive.
    pub fn with_clustering(
        config: DemandConfig,
        providers: &[&str],
        environment: Arc<Environment>,
        clustering: Arc<dyn PointClustering + Send + Sync>,
    ) -> CourierResult<Self> {
        let partitioner = DemandPartitioner::new(config.demand_border, clustering, environment.logger.clone())?;
        let providers = providers.iter().map(|provider| provider.to_string()).collect();

        Ok(Self { config, providers, environment, partitioner })
    }

    /// Groups features by `provider_postalCode`. Features with too many parcels or without postal
    /// code are skipped, each remaining feature joins groups of all providers it has parcels for.
    /// Groups are ordered by key.
    pub fn group_features(&self, features: &[DemandFeature]) -> CourierResult<Vec<DemandGroup>> {
        if features.is_empty() {
            return Err(CourierError::missing("demand features"));
        }

        let mut groups: BTreeMap<String, DemandGroup> = BTreeMap::new();

        for feature in features
            .iter()
            .filter(|feature| feature.total <= self.config.max_parcels_per_feature && !feature.postal_code.is_empty())
        {
            for provider in self.providers.iter() {
                let parcels = feature.parcels_of(provider)?;
                if parcels == 0 {
                    continue;
                }

                let key = format!("{provider}_{}", feature.postal_code);
                let group = groups.entry(key.clone()).or_insert_with(|| DemandGroup {
                    key,
                    provider: provider.clone(),
                    points: vec![],
                });

                group.points.push(DeliveryPoint {
                    id: feature.id.clone(),
                    coord: feature.coord,
                    postal_code: feature.postal_code.clone(),
                    parcels,
                    parcel_type: feature.parcel_type_of(provider).map(|parcel_type| parcel_type.to_string()),
                });
            }
        }

        Ok(groups.into_values().collect())
    }

    /// Groups features and partitions oversized groups.
    pub fn process(&self, features: &[DemandFeature]) -> CourierResult<Vec<DemandGroup>> {
        let groups = self.group_features(features)?;
        (self.environment.logger)(&format!(
            "{} demand groups created, demand border is {}",
            groups.len(),
            self.config.demand_border
        ));

        self.partitioner.partition_all(groups)
    }

    /// Creates deliveries of a demand group sampling individual parcel weights. A point is considered
    /// as business-to-business when its parcel type is "b2b" (case insensitive).
    pub fn create_deliveries(&self, group: &DemandGroup, sampler: &WeightSampler) -> CourierResult<Vec<Delivery>> {
        let deliveries = group
            .points
            .iter()
            .filter(|point| point.parcels > 0)
            .map(|point| {
                let parcel_type = point.parcel_type.as_deref().unwrap_or("b2c");
                let is_b2b = parcel_type.eq_ignore_ascii_case("b2b");
                let weights = (0..point.parcels).map(|_| sampler.sample(is_b2b)).collect();

                Delivery::new(
                    format!("{}_{}", point.id, point.id).as_str(),
                    point.coord,
                    group.provider.as_str(),
                    parcel_type.to_lowercase().as_str(),
                    Some(point.postal_code.as_str()),
                    weights,
                )
            })
            .collect::<CourierResult<Vec<_>>>()?;

        let parcels = deliveries.iter().map(|delivery| delivery.amount() as u64).sum::<u64>();
        if parcels != group.parcel_count() {
            return Err(CourierError::invariant(
                "DemandProcessor",
                group.key.as_str(),
                format!("expected {} parcels, got {parcels}", group.parcel_count()),
            ));
        }

        Ok(deliveries)
    }
}
