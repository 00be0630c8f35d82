use crate::models::common::*;
use crate::models::problem::Vehicle;
use crate::models::solution::Activity;
use std::sync::Arc;

/// A materialized travel leg between two consecutive stops.
#[derive(Clone, Debug)]
pub struct Leg {
    /// Departure time from the origin stop.
    pub departure: Timestamp,
    /// Travel time.
    pub travel_time: Duration,
    /// Traveled distance.
    pub distance: Distance,
    /// Link ids traversed, including origin and destination links.
    pub links: Vec<Location>,
}

/// A tour of a single vehicle with materialized stops and legs.
#[derive(Clone, Debug)]
pub struct ScheduledTour {
    /// A vehicle which performs the tour.
    pub vehicle: Arc<Vehicle>,
    /// Stops including start and end with computed schedules.
    pub stops: Vec<Activity>,
    /// Legs between consecutive stops: `legs.len() == stops.len() - 1`.
    pub legs: Vec<Leg>,
}

/// A carrier plan: a set of tours together with the cost reported by solver.
#[derive(Clone, Debug, Default)]
pub struct Plan {
    /// Tours of the plan.
    pub tours: Vec<ScheduledTour>,
    /// Total cost.
    pub cost: Cost,
    /// Ids of jobs which cannot be assigned.
    pub unassigned: Vec<String>,
}
