#[cfg(test)]
#[path = "../../../tests/unit/models/solution/tour_test.rs"]
mod tour_test;

use crate::models::common::*;
use crate::models::problem::{Job, JobPlace, Vehicle};
use std::sync::Arc;

/// Specifies activity kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActivityKind {
    /// Departure from depot.
    Start,
    /// Arrival at depot or at the last stop of an open route.
    End,
    /// A service stop.
    Service,
    /// A shipment pickup.
    Pickup,
    /// A shipment delivery.
    Delivery,
}

/// Specifies activity place.
#[derive(Clone, Debug)]
pub struct Place {
    /// Location where activity is performed.
    pub location: Location,
    /// Operation time.
    pub duration: Duration,
    /// Time window when operation can start.
    pub time: TimeWindow,
}

impl From<&JobPlace> for Place {
    fn from(place: &JobPlace) -> Self {
        Self { location: place.location, duration: place.duration, time: place.time.clone() }
    }
}

/// Represents activity which is needed to be performed.
#[derive(Clone, Debug)]
pub struct Activity {
    /// Activity kind.
    pub kind: ActivityKind,
    /// Location and duration of the activity.
    pub place: Place,
    /// Computed arrival and departure times.
    pub schedule: Schedule,
    /// A job which activity belongs to. `None` for depot activities.
    pub job: Option<Arc<Job>>,
}

impl Activity {
    /// Creates a job activity.
    pub fn new_job(kind: ActivityKind, place: Place, job: Arc<Job>) -> Self {
        Self { kind, place, schedule: Schedule::default(), job: Some(job) }
    }

    /// Returns true if activity is a route start.
    pub fn is_start(&self) -> bool {
        self.kind == ActivityKind::Start
    }

    /// Returns true if activity is a route end.
    pub fn is_end(&self) -> bool {
        self.kind == ActivityKind::End
    }

    /// Returns the time when operation starts given the arrival time.
    pub fn start_time(&self, arrival: Timestamp) -> Timestamp {
        arrival.max(self.place.time.start)
    }

    /// Returns the time when operation ends given the arrival time.
    pub fn end_time(&self, arrival: Timestamp) -> Timestamp {
        self.start_time(arrival) + self.place.duration
    }

    /// Checks whether activity belongs to the given job.
    pub fn has_same_job(&self, job: &Arc<Job>) -> bool {
        self.job.as_ref().is_some_and(|other| Arc::ptr_eq(other, job))
    }
}

/// Represents a tour: an ordered sequence of activities enclosed by start and end.
#[derive(Clone, Debug)]
pub struct Tour {
    activities: Vec<Activity>,
}

impl Tour {
    /// Creates a new tour with start and end activities using vehicle properties.
    pub fn new(vehicle: &Vehicle) -> Self {
        let start = Activity {
            kind: ActivityKind::Start,
            place: Place { location: vehicle.start, duration: 0., time: TimeWindow::new(vehicle.time.start, f64::MAX) },
            schedule: Schedule::new(vehicle.time.start, vehicle.time.start),
            job: None,
        };
        let end = Activity {
            kind: ActivityKind::End,
            place: Place {
                location: vehicle.end.unwrap_or(vehicle.start),
                duration: 0.,
                time: TimeWindow::new(0., vehicle.time.end),
            },
            schedule: Schedule::new(vehicle.time.start, vehicle.time.start),
            job: None,
        };

        Self { activities: vec![start, end] }
    }

    /// Returns start activity.
    pub fn start(&self) -> &Activity {
        &self.activities[0]
    }

    /// Returns end activity.
    pub fn end(&self) -> &Activity {
        &self.activities[self.activities.len() - 1]
    }

    /// Returns activity by its index.
    pub fn get(&self, index: usize) -> Option<&Activity> {
        self.activities.get(index)
    }

    /// Returns mutable activity by its index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Activity> {
        self.activities.get_mut(index)
    }

    /// Returns all activities including start and end.
    pub fn all_activities(&self) -> &[Activity] {
        self.activities.as_slice()
    }

    /// Returns job activities only.
    pub fn job_activities(&self) -> &[Activity] {
        &self.activities[1..self.activities.len() - 1]
    }

    /// Returns total amount of activities including start and end.
    pub fn total(&self) -> usize {
        self.activities.len()
    }

    /// Returns amount of job activities.
    pub fn job_activity_count(&self) -> usize {
        self.activities.len() - 2
    }

    /// Returns true if tour has no job activities.
    pub fn is_empty(&self) -> bool {
        self.job_activity_count() == 0
    }

    /// Inserts job activity at specified index. Index should be between start and end.
    pub fn insert_at(&mut self, activity: Activity, index: usize) {
        assert!(activity.job.is_some());
        assert!(index > 0 && index < self.activities.len());

        self.activities.insert(index, activity);
    }

    /// Removes all activities of given job. Returns true if job was present.
    pub fn remove_job(&mut self, job: &Arc<Job>) -> bool {
        let size = self.activities.len();
        self.activities.retain(|activity| !activity.has_same_job(job));

        size != self.activities.len()
    }

    /// Returns unique jobs in the order of their first activity.
    pub fn jobs(&self) -> Vec<Arc<Job>> {
        self.job_activities().iter().filter_map(|activity| activity.job.clone()).fold(Vec::new(), |mut acc, job| {
            if !acc.iter().any(|other| Arc::ptr_eq(other, &job)) {
                acc.push(job);
            }
            acc
        })
    }

    /// Returns total demand of all jobs in the tour.
    pub fn total_demand(&self) -> i32 {
        self.jobs().iter().map(|job| job.demand).sum()
    }
}
