//! This crate contains domain agnostic building blocks used by the courier routing workspace:
//! a pseudo random source abstraction, timing, float comparison, parallel helpers and a
//! runtime environment which carries logging and parallelism settings.

#![warn(missing_docs)]

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[macro_use]
pub mod helpers;

pub mod prelude;
pub mod utils;
