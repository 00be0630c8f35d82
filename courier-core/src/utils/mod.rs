//! Helper functionality: reimports building blocks and defines the domain error taxonomy.

mod config;
pub use self::config::*;

mod error;
pub use self::error::*;

pub use courier_kit::utils::*;
