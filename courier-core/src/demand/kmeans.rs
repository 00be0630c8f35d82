#[cfg(test)]
#[path = "../../tests/unit/demand/kmeans_test.rs"]
mod kmeans_test;

use crate::utils::{Random, compare_floats};
use rand::prelude::SliceRandom;
use std::sync::Arc;

/// A point clustering collaborator.
pub trait PointClustering {
    /// Splits points into `k` clusters where no cluster has more than `ceil(n/k)` members.
    /// Returns member indices per cluster.
    fn capacitated_kmeans(&self, points: &[[f64; 2]], k: usize) -> Vec<Vec<usize>>;
}

/// A k-means variant which keeps cluster sizes balanced.
///
/// Each iteration assigns points greedily: points with the strongest preference (the largest
/// difference between the farthest and the nearest mean) are assigned first, each one to the nearest
/// mean which still has capacity. Means are then moved to cluster centroids. The loop stops when
/// assignment does not change or after max iterations.
pub struct SameSizeKMeans {
    random: Arc<dyn Random + Send + Sync>,
    max_iterations: usize,
}

impl SameSizeKMeans {
    /// Creates a new instance of `SameSizeKMeans`.
    pub fn new(random: Arc<dyn Random + Send + Sync>, max_iterations: usize) -> Self {
        Self { random, max_iterations }
    }

    fn init_means(&self, points: &[[f64; 2]], k: usize) -> Vec<[f64; 2]> {
        let mut indices = (0..points.len()).collect::<Vec<_>>();
        indices.shuffle(&mut self.random.get_rng());

        indices.into_iter().take(k).map(|idx| points[idx]).collect()
    }
}

impl PointClustering for SameSizeKMeans {
    fn capacitated_kmeans(&self, points: &[[f64; 2]], k: usize) -> Vec<Vec<usize>> {
        if points.is_empty() || k == 0 {
            return vec![];
        }

        let k = k.min(points.len());
        let max_size = points.len().div_ceil(k);

        let mut means = self.init_means(points, k);
        let mut assignment = assign(points, means.as_slice(), max_size);

        for _ in 0..self.max_iterations {
            means = update_means(points, assignment.as_slice(), means);

            let next = assign(points, means.as_slice(), max_size);
            if next == assignment {
                break;
            }
            assignment = next;
        }

        assignment.into_iter().enumerate().fold(vec![Vec::new(); k], |mut clusters, (point_idx, cluster_idx)| {
            clusters[cluster_idx].push(point_idx);
            clusters
        })
    }
}

fn squared_distance(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

fn assign(points: &[[f64; 2]], means: &[[f64; 2]], max_size: usize) -> Vec<usize> {
    let preferences = points
        .iter()
        .map(|point| {
            let mut distances = means.iter().map(|mean| squared_distance(point, mean)).enumerate().collect::<Vec<_>>();
            distances.sort_by(|(_, a), (_, b)| compare_floats(*a, *b));
            distances
        })
        .collect::<Vec<_>>();

    let mut order = (0..points.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        let priority = |distances: &[(usize, f64)]| distances[0].1 - distances[distances.len() - 1].1;
        compare_floats(priority(&preferences[a]), priority(&preferences[b]))
    });

    let mut sizes = vec![0; means.len()];
    let mut assignment = vec![0; points.len()];

    order.into_iter().for_each(|point_idx| {
        let cluster_idx = preferences[point_idx]
            .iter()
            .map(|(cluster_idx, _)| *cluster_idx)
            .find(|cluster_idx| sizes[*cluster_idx] < max_size)
            .unwrap_or_default();

        sizes[cluster_idx] += 1;
        assignment[point_idx] = cluster_idx;
    });

    assignment
}

fn update_means(points: &[[f64; 2]], assignment: &[usize], means: Vec<[f64; 2]>) -> Vec<[f64; 2]> {
    let mut sums = vec![([0., 0.], 0_usize); means.len()];
    assignment.iter().zip(points.iter()).for_each(|(&cluster_idx, point)| {
        let (sum, count) = &mut sums[cluster_idx];
        sum[0] += point[0];
        sum[1] += point[1];
        *count += 1;
    });

    means
        .into_iter()
        .zip(sums)
        .map(|(mean, (sum, count))| if count == 0 { mean } else { [sum[0] / count as f64, sum[1] / count as f64] })
        .collect()
}
