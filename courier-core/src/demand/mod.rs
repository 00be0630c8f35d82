//! Synthetic parcel demand: parcel weight sampling, grouping of raw demand features,
//! capacity bounded partitioning of oversized groups and generation of carriers.

mod carriers;
pub use self::carriers::*;

mod kmeans;
pub use self::kmeans::*;

mod model;
pub use self::model::*;

mod partition;
pub use self::partition::*;

mod processor;
pub use self::processor::*;

mod weights;
pub use self::weights::*;
