#[cfg(test)]
#[path = "../../tests/unit/network/path_test.rs"]
mod path_test;

use super::{LinkId, Network, NodeId, TravelDisutility};
use crate::models::common::*;
use crate::models::problem::VehicleType;
use courier_kit::utils::compare_floats;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// A least cost path between two nodes.
#[derive(Clone, Debug, Default)]
pub struct Path {
    /// Traversed links in travel order.
    pub links: Vec<LinkId>,
    /// Total travel time.
    pub travel_time: Duration,
    /// Total travel disutility.
    pub travel_cost: Cost,
}

/// Searches for least cost paths over the network. Implementations are allowed to keep
/// internal buffers, so a single instance should not be shared between workers.
pub trait LeastCostPathSearch {
    /// Calculates a least cost path between two nodes departing at given time.
    /// Returns `None` if destination node is not reachable.
    fn calc_path(&mut self, from: NodeId, to: NodeId, departure: Timestamp, vehicle_type: &VehicleType) -> Option<Path>;
}

/// Creates a new path search instance for a worker.
pub type PathSearchFactory = Arc<
    dyn Fn(
            Arc<dyn Network + Send + Sync>,
            Arc<dyn TravelDisutility + Send + Sync>,
        ) -> Box<dyn LeastCostPathSearch + Send>
        + Send
        + Sync,
>;

/// Returns a factory which creates [`DijkstraPathSearch`] instances.
pub fn create_dijkstra_factory() -> PathSearchFactory {
    Arc::new(|network, disutility| Box::new(DijkstraPathSearch::new(network, disutility)))
}

/// A time dependent label setting (Dijkstra) least cost path search.
pub struct DijkstraPathSearch {
    network: Arc<dyn Network + Send + Sync>,
    disutility: Arc<dyn TravelDisutility + Send + Sync>,
    labels: Vec<Label>,
    touched: Vec<NodeId>,
}

#[derive(Clone)]
struct Label {
    cost: Cost,
    time: Timestamp,
    via: Option<LinkId>,
    settled: bool,
}

impl Default for Label {
    fn default() -> Self {
        Self { cost: f64::MAX, time: f64::MAX, via: None, settled: false }
    }
}

struct QueueItem {
    cost: Cost,
    node: NodeId,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // reversed to turn max heap into min heap
        compare_floats(other.cost, self.cost).then_with(|| other.node.cmp(&self.node))
    }
}

impl DijkstraPathSearch {
    /// Creates a new instance of `DijkstraPathSearch`.
    pub fn new(network: Arc<dyn Network + Send + Sync>, disutility: Arc<dyn TravelDisutility + Send + Sync>) -> Self {
        let labels = vec![Label::default(); network.node_count()];
        Self { network, disutility, labels, touched: Vec::default() }
    }

    fn reset(&mut self) {
        let labels = &mut self.labels;
        self.touched.drain(..).for_each(|node| labels[node] = Label::default());
    }

    fn relax(&mut self, node: NodeId, cost: Cost, time: Timestamp, via: Option<LinkId>) -> bool {
        let label = &mut self.labels[node];
        if label.settled || compare_floats(cost, label.cost) != Ordering::Less {
            return false;
        }

        if label.cost == f64::MAX {
            self.touched.push(node);
        }

        *label = Label { cost, time, via, settled: false };

        true
    }

    fn backtrack(&self, from: NodeId, to: NodeId) -> Vec<LinkId> {
        let mut links = Vec::new();
        let mut current = to;

        while current != from {
            match self.labels[current].via.and_then(|link_id| self.network.link(link_id)) {
                Some(link) => {
                    links.push(link.id);
                    current = link.from;
                }
                None => break,
            }
        }

        links.reverse();
        links
    }
}

impl LeastCostPathSearch for DijkstraPathSearch {
    fn calc_path(&mut self, from: NodeId, to: NodeId, departure: Timestamp, vehicle_type: &VehicleType) -> Option<Path> {
        if from >= self.labels.len() || to >= self.labels.len() {
            return None;
        }

        if from == to {
            return Some(Path::default());
        }

        self.reset();

        let mut queue = BinaryHeap::new();
        self.relax(from, 0., departure, None);
        queue.push(QueueItem { cost: 0., node: from });

        while let Some(QueueItem { node, .. }) = queue.pop() {
            if self.labels[node].settled {
                continue;
            }
            self.labels[node].settled = true;

            if node == to {
                break;
            }

            let (cost, time) = (self.labels[node].cost, self.labels[node].time);
            let network = self.network.clone();

            for &link_id in network.out_links(node) {
                let Some(link) = network.link(link_id) else { continue };

                let link_cost = cost + self.disutility.link_disutility(link, time, vehicle_type);
                let link_time = time + self.disutility.link_travel_time(link, time, vehicle_type);

                if self.relax(link.to, link_cost, link_time, Some(link_id)) {
                    queue.push(QueueItem { cost: link_cost, node: link.to });
                }
            }
        }

        let target = &self.labels[to];
        if !target.settled {
            return None;
        }

        Some(Path {
            links: self.backtrack(from, to),
            travel_time: target.time - departure,
            travel_cost: target.cost,
        })
    }
}
