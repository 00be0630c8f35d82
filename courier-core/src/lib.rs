//! Core crate contains building blocks to generate synthetic last-mile parcel demand and to route
//! many independent carrier fleets in parallel.
//!
//! # Overview
//!
//! The crate is organized around the following components:
//!
//! - [`demand`]: a statistical parcel weight generator, demand grouping and a capacity bounded
//!   partitioning of oversized delivery groups;
//! - [`costs`]: a concurrent, memoizing transport cost oracle over a [`network`] with a coarse
//!   zone level fallback;
//! - [`feasibility`]: incremental route state updaters and hard constraints (maximum route
//!   duration, time windows with driver time) evaluated on every candidate insertion;
//! - [`solver`]: a contract of the external route search engine and a simple reference implementation;
//! - [`scheduling`] and [`routing`]: interchangeable concurrency strategies and a routing scheduler
//!   which fans carrier sub-problems across workers;
//! - [`replanning`]: a per-iteration driver which selects a bounded subset of carriers for re-optimization.

#![warn(missing_docs)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

pub mod costs;
pub mod demand;
pub mod feasibility;
pub mod models;
pub mod network;
pub mod prelude;
pub mod replanning;
pub mod routing;
pub mod scheduling;
pub mod solver;
pub mod utils;
