#[cfg(test)]
#[path = "../../tests/unit/network/memory_test.rs"]
mod memory_test;

use super::*;
use crate::utils::{CourierError, CourierResult, compare_floats};

/// A network which keeps all nodes and links in memory.
pub struct InMemoryNetwork {
    nodes: Vec<Node>,
    links: Vec<Link>,
    out_links: Vec<Vec<LinkId>>,
}

impl InMemoryNetwork {
    fn midpoint(&self, link: &Link) -> Coord {
        let (from, to) = (&self.nodes[link.from].coord, &self.nodes[link.to].coord);
        Coord::new((from.x + to.x) / 2., (from.y + to.y) / 2.)
    }
}

impl Network for InMemoryNetwork {
    fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id)
    }

    fn links(&self) -> &[Link] {
        self.links.as_slice()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn out_links(&self, node: NodeId) -> &[LinkId] {
        self.out_links.get(node).map_or(&[], |links| links.as_slice())
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn nearest_link(&self, coord: &Coord) -> Option<LinkId> {
        self.links
            .iter()
            .map(|link| (link.id, self.midpoint(link).distance(coord)))
            .min_by(|(_, a), (_, b)| compare_floats(*a, *b))
            .map(|(id, _)| id)
    }
}

/// Builds an in-memory network. Node and link ids are assigned sequentially.
#[derive(Default)]
pub struct InMemoryNetworkBuilder {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl InMemoryNetworkBuilder {
    /// Adds a node and returns its id.
    pub fn add_node(&mut self, coord: Coord) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { id, coord });

        id
    }

    /// Adds a link between two existing nodes and returns its id.
    pub fn add_link(
        &mut self,
        from: NodeId,
        to: NodeId,
        length: f64,
        freespeed: f64,
        allowed_modes: &[&str],
        zone: Option<&str>,
    ) -> CourierResult<LinkId> {
        for node in [from, to] {
            if node >= self.nodes.len() {
                return Err(CourierError::missing(format!("node {node}")));
            }
        }

        if length < 0. || !length.is_finite() {
            return Err(CourierError::validation("link length", length, "should be non-negative"));
        }

        if freespeed <= 0. {
            return Err(CourierError::validation("link freespeed", freespeed, "should be positive"));
        }

        let id = self.links.len();
        self.links.push(Link {
            id,
            from,
            to,
            length,
            freespeed,
            allowed_modes: allowed_modes.iter().map(|mode| mode.to_string()).collect(),
            zone: zone.map(|zone| zone.into()),
        });

        Ok(id)
    }

    /// Builds the network.
    pub fn build(self) -> CourierResult<InMemoryNetwork> {
        if self.links.is_empty() {
            return Err(CourierError::missing("network links"));
        }

        let mut out_links = vec![Vec::new(); self.nodes.len()];
        self.links.iter().for_each(|link| out_links[link.from].push(link.id));

        Ok(InMemoryNetwork { nodes: self.nodes, links: self.links, out_links })
    }
}
