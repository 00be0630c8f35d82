#[cfg(test)]
#[path = "../../tests/unit/feasibility/state_test.rs"]
mod state_test;

use crate::models::solution::Route;
use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// A route real start time: the latest departure from depot which still reaches the first
/// stop at its earliest operation start. Stored as a tour state.
pub struct RouteRealStartTimeKey;

/// A latest feasible operation start per activity. Stored as an activity state.
pub struct LatestStartKey;

/// A sum of waiting times at the activity and all activities after it. Stored as an activity state.
pub struct FutureWaitingKey;

/// A latest arrival time at depot considering driver time limit. Stored as a tour state.
pub struct LatestArrivalAtDepotKey;

/// An adjusted departure time from depot. Stored as a tour state.
pub struct NewDepartureKey;

/// Keeps memoized per-tour and per-activity states. States are recomputed each time the tour
/// is changed and never survive a re-optimization.
#[derive(Clone, Default)]
pub struct RouteState {
    index: FxHashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl RouteState {
    /// Gets a value associated with the tour using `K` type as a key.
    pub fn get_tour_state<K: 'static, V: Send + Sync + 'static>(&self) -> Option<&V> {
        self.index.get(&TypeId::of::<K>()).and_then(|any| any.downcast_ref::<V>())
    }

    /// Sets the value associated with the tour using `K` type as a key.
    pub fn set_tour_state<K: 'static, V: Send + Sync + 'static>(&mut self, value: V) {
        self.index.insert(TypeId::of::<K>(), Arc::new(value));
    }

    /// Gets value associated with a key and activity index.
    pub fn get_activity_state<K: 'static, V: Send + Sync + 'static>(&self, activity_idx: usize) -> Option<&V> {
        self.index
            .get(&TypeId::of::<K>())
            .and_then(|s| s.downcast_ref::<Vec<V>>())
            .and_then(|activity_states| activity_states.get(activity_idx))
    }

    /// Adds values associated with activities. Values are indexed by activity position in the tour.
    pub fn set_activity_states<K: 'static, V: Send + Sync + 'static>(&mut self, values: Vec<V>) {
        self.index.insert(TypeId::of::<K>(), Arc::new(values));
    }

    /// Clear all states.
    pub fn clear(&mut self) {
        self.index.clear();
    }
}

/// Provides the way to associate arbitrary states with the route.
#[derive(Clone)]
pub struct RouteContext {
    /// A route.
    pub route: Route,
    /// Memoized states of the route.
    pub state: RouteState,
}

impl RouteContext {
    /// Creates a new instance of `RouteContext` with empty states.
    pub fn new(route: Route) -> Self {
        Self { route, state: RouteState::default() }
    }
}
