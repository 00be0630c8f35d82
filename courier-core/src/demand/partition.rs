#[cfg(test)]
#[path = "../../tests/unit/demand/partition_test.rs"]
mod partition_test;

use super::*;
use crate::utils::{CourierError, CourierResult, InfoLogger, map_reduce, parallel_into_collect};
use std::sync::Arc;

/// Splits oversized demand groups into capacity bounded sub-groups using point clustering.
///
/// Delivery and parcel counts are conserved: each split is checked against its source group and
/// the whole demand set is checked before and after partitioning. A violation aborts the run.
pub struct DemandPartitioner {
    threshold: usize,
    clustering: Arc<dyn PointClustering + Send + Sync>,
    logger: InfoLogger,
}

impl DemandPartitioner {
    /// Creates a new instance of `DemandPartitioner`. Threshold should be positive.
    pub fn new(
        threshold: usize,
        clustering: Arc<dyn PointClustering + Send + Sync>,
        logger: InfoLogger,
    ) -> CourierResult<Self> {
        if threshold == 0 {
            return Err(CourierError::validation("demand border", threshold, "should be positive"));
        }

        Ok(Self { threshold, clustering, logger })
    }

    /// Partitions a single group. Groups within threshold are returned unchanged, others are split
    /// into `ceil(deliveries / threshold)` sub-groups keyed as `key_index`. Only points with parcels
    /// are clustered, points without parcels are dropped from split groups.
    pub fn partition(&self, group: DemandGroup) -> CourierResult<Vec<DemandGroup>> {
        let deliveries = group.delivery_count();
        if deliveries <= self.threshold {
            return Ok(vec![group]);
        }

        let k = deliveries.div_ceil(self.threshold);
        (self.logger)(&format!("demand group '{}' has {deliveries} deliveries, split into {k} groups", group.key));

        let empty = group.points.len() - deliveries;
        if empty > 0 {
            (self.logger)(&format!("demand group '{}' has {empty} points without parcels, skipped", group.key));
        }

        let group = DemandGroup { points: group.points.into_iter().filter(|point| point.parcels > 0).collect(), ..group };
        let coords = group.points.iter().map(|point| [point.coord.x, point.coord.y]).collect::<Vec<_>>();
        let clusters = self.clustering.capacitated_kmeans(coords.as_slice(), k);

        let mut used = vec![false; group.points.len()];
        for &idx in clusters.iter().flatten() {
            match used.get_mut(idx) {
                Some(flag) if !*flag => *flag = true,
                _ => {
                    return Err(CourierError::invariant(
                        "DemandPartitioner",
                        group.key.as_str(),
                        format!("clustering returned unknown or duplicated point index {idx}"),
                    ));
                }
            }
        }

        let sub_groups = clusters
            .into_iter()
            .enumerate()
            .filter(|(_, members)| !members.is_empty())
            .map(|(cluster_idx, members)| DemandGroup {
                key: format!("{}_{cluster_idx}", group.key),
                provider: group.provider.clone(),
                points: members.into_iter().map(|idx| group.points[idx].clone()).collect(),
            })
            .collect::<Vec<_>>();

        let (before, after) = (get_totals(std::slice::from_ref(&group)), get_totals(sub_groups.as_slice()));
        if before != after {
            return Err(CourierError::invariant(
                "DemandPartitioner",
                group.key.as_str(),
                format!("(deliveries, parcels) changed from {before:?} to {after:?}"),
            ));
        }

        sub_groups.iter().for_each(|sub_group| {
            (self.logger)(&format!("assigned {} deliveries to '{}'", sub_group.delivery_count(), sub_group.key))
        });

        Ok(sub_groups)
    }

    /// Partitions all groups in parallel and checks aggregated conservation.
    pub fn partition_all(&self, groups: Vec<DemandGroup>) -> CourierResult<Vec<DemandGroup>> {
        let before = get_totals(groups.as_slice());
        (self.logger)(&format!("before partitioning: {} deliveries, {} parcels", before.0, before.1));

        let partitioned = parallel_into_collect(groups, |group| self.partition(group))
            .into_iter()
            .collect::<CourierResult<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        let after = get_totals(partitioned.as_slice());
        (self.logger)(&format!("after partitioning: {} deliveries, {} parcels", after.0, after.1));

        if before != after {
            return Err(CourierError::invariant(
                "DemandPartitioner",
                "all groups",
                format!("(deliveries, parcels) changed from {before:?} to {after:?}"),
            ));
        }

        Ok(partitioned)
    }
}

/// Returns total amount of deliveries and parcels.
pub fn get_totals(groups: &[DemandGroup]) -> (usize, u64) {
    map_reduce(
        groups,
        |group| (group.delivery_count(), group.parcel_count()),
        || (0, 0),
        |(a_deliveries, a_parcels), (b_deliveries, b_parcels)| (a_deliveries + b_deliveries, a_parcels + b_parcels),
    )
}
