//! Solution domain models: tours, routes and routed plans.

mod plan;
pub use self::plan::*;

mod route;
pub use self::route::*;

mod tour;
pub use self::tour::*;
