pub mod board;
pub mod feature;
pub mod timeline;

pub use board::Board;
pub use feature::{Feature, FeatureId, FeatureKind, Schedule, UpdateRecord};
pub use timeline::TimelineViewport;
