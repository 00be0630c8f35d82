use crate::models::common::*;

/// Specifies a place where a job activity is performed.
#[derive(Clone, Debug)]
pub struct JobPlace {
    /// Location of the activity.
    pub location: Location,
    /// Operation (service) time.
    pub duration: Duration,
    /// A time window when the operation is allowed to start.
    pub time: TimeWindow,
}

/// Specifies a job variant.
#[derive(Clone, Debug)]
pub enum JobKind {
    /// A job with a single delivery stop served from vehicle's depot.
    Service {
        /// A service place.
        place: JobPlace,
    },
    /// A job which picks up goods at one place and drops them at another one.
    Shipment {
        /// A pickup place.
        pickup: JobPlace,
        /// A delivery place.
        delivery: JobPlace,
    },
}

/// Represents a job: a service or a shipment task.
#[derive(Clone, Debug)]
pub struct Job {
    /// An unique job id.
    pub id: String,
    /// Demand quantity.
    pub demand: i32,
    /// Job variant.
    pub kind: JobKind,
}

impl Job {
    /// Creates a service job.
    pub fn service(id: &str, place: JobPlace, demand: i32) -> Self {
        Self { id: id.to_string(), demand, kind: JobKind::Service { place } }
    }

    /// Creates a shipment job.
    pub fn shipment(id: &str, pickup: JobPlace, delivery: JobPlace, demand: i32) -> Self {
        Self { id: id.to_string(), demand, kind: JobKind::Shipment { pickup, delivery } }
    }

    /// Returns true if the job is a service.
    pub fn is_service(&self) -> bool {
        matches!(self.kind, JobKind::Service { .. })
    }

    /// Returns job places in the order they have to be visited.
    pub fn places(&self) -> Vec<&JobPlace> {
        match &self.kind {
            JobKind::Service { place } => vec![place],
            JobKind::Shipment { pickup, delivery } => vec![pickup, delivery],
        }
    }
}
