pub mod control_system;
pub mod errors;
pub mod network;
pub mod preset;
pub mod util;

pub use control_system::{
    partition_phases, AdaptiveConfig, CarEntry, ConflictGraph, DischargeModel, EngineStatus,
    Phase, SchedulingEngine, Strategy, TimingConfig,
};
pub use errors::SchedulerError;
pub use network::{Direction, LaneId, MovementId, RoadNetwork};
pub use preset::{Command, Preset};
