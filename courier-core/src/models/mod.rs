//! A collection of models to represent carriers, their fleets, jobs and routed plans.

pub mod common;
pub mod problem;
pub mod solution;
