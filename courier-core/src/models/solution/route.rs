use crate::models::problem::Vehicle;
use crate::models::solution::Tour;
use std::sync::Arc;

/// Represents a tour performed by a specific vehicle.
#[derive(Clone, Debug)]
pub struct Route {
    /// A vehicle associated within route.
    pub vehicle: Arc<Vehicle>,

    /// Specifies job tour assigned to this route.
    pub tour: Tour,
}

impl Route {
    /// Creates an empty route for given vehicle.
    pub fn new(vehicle: Arc<Vehicle>) -> Self {
        let tour = Tour::new(vehicle.as_ref());
        Self { vehicle, tour }
    }
}
