//! A read-only transportation network model, travel disutility and least cost path search.

mod disutility;
pub use self::disutility::*;

mod memory;
pub use self::memory::*;

mod path;
pub use self::path::*;

use std::sync::Arc;

/// Specifies link id type.
pub type LinkId = usize;

/// Specifies node id type.
pub type NodeId = usize;

/// Represents a planar coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Coord {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Coord {
    /// Creates a new coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns euclidean distance to another coordinate.
    pub fn distance(&self, other: &Coord) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A network node.
#[derive(Clone, Debug)]
pub struct Node {
    /// Node id.
    pub id: NodeId,
    /// Node coordinate.
    pub coord: Coord,
}

/// A directed network link.
#[derive(Clone, Debug)]
pub struct Link {
    /// Link id.
    pub id: LinkId,
    /// Origin node.
    pub from: NodeId,
    /// Destination node.
    pub to: NodeId,
    /// Length in meters.
    pub length: f64,
    /// Free speed in meters per second.
    pub freespeed: f64,
    /// Network modes allowed to use the link.
    pub allowed_modes: Vec<String>,
    /// A coarse spatial zone tag.
    pub zone: Option<Arc<str>>,
}

impl Link {
    /// Checks whether the link can be used by given network mode.
    pub fn allows(&self, mode: &str) -> bool {
        self.allowed_modes.iter().any(|allowed| allowed == mode)
    }
}

/// A read-only transportation network.
pub trait Network {
    /// Returns link by its id.
    fn link(&self, id: LinkId) -> Option<&Link>;

    /// Returns node by its id.
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Returns all links. Link ids are positions in the returned slice.
    fn links(&self) -> &[Link];

    /// Returns ids of links leaving given node.
    fn out_links(&self, node: NodeId) -> &[LinkId];

    /// Returns total amount of nodes. Node ids are in `0..node_count()` range.
    fn node_count(&self) -> usize;

    /// Returns the link nearest to given coordinate.
    fn nearest_link(&self, coord: &Coord) -> Option<LinkId>;
}
