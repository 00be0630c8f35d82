use crate::costs::{TransportCostOracle, TransportCostOracleBuilder};
use crate::network::*;
use std::sync::Arc;

pub const LINK_LENGTH: f64 = 100.;
pub const LINK_FREESPEED: f64 = 10.;

/// Creates a line of `size` nodes placed every hundred meters along x axis.
///
/// Forward links have ids `0..size - 1` (link `i` goes from node `i` to node `i + 1`), backward
/// links follow them: link `size - 1 + i` goes from node `i + 1` to node `i`. Zones are assigned
/// to forward links by index and copied to their backward counterparts.
pub fn create_line_network(size: usize, zones: &[Option<&str>]) -> InMemoryNetwork {
    assert!(size > 1);

    let mut builder = InMemoryNetworkBuilder::default();
    let nodes = (0..size).map(|idx| builder.add_node(Coord::new(idx as f64 * LINK_LENGTH, 0.))).collect::<Vec<_>>();
    let zone_of = |idx: usize| zones.get(idx).copied().flatten();

    (0..size - 1).for_each(|idx| {
        builder.add_link(nodes[idx], nodes[idx + 1], LINK_LENGTH, LINK_FREESPEED, &["car"], zone_of(idx)).unwrap();
    });
    (0..size - 1).for_each(|idx| {
        builder.add_link(nodes[idx + 1], nodes[idx], LINK_LENGTH, LINK_FREESPEED, &["car"], zone_of(idx)).unwrap();
    });

    builder.build().unwrap()
}

/// Returns id of a backward link which goes from node `idx + 1` to node `idx`.
pub fn backward_link(size: usize, idx: usize) -> LinkId {
    size - 1 + idx
}

pub fn create_test_oracle(size: usize, zones: &[Option<&str>]) -> TransportCostOracle {
    TransportCostOracleBuilder::new(Arc::new(create_line_network(size, zones))).build().unwrap()
}
