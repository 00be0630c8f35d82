//! Orchestrates parallel solving of many independent carrier routing problems.

mod config;
pub use self::config::*;

mod scheduler;
pub use self::scheduler::*;

mod settings;
pub use self::settings::*;
