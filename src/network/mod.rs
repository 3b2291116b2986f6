// network/mod.rs
pub mod directions;
pub mod registry;

pub use directions::Direction;
pub use registry::{LaneId, LaneRecord, MovementId, MovementRecord, RoadNetwork};
