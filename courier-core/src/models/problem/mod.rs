//! Problem domain models: carriers, fleets and jobs.

mod carrier;
pub use self::carrier::*;

mod fleet;
pub use self::fleet::*;

mod jobs;
pub use self::jobs::*;

mod vehicle_factory;
pub use self::vehicle_factory::*;
