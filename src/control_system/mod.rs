// control_system/mod.rs
pub mod conflicts;
pub mod discharge;
pub mod engine;
pub mod phases;
pub mod strategy;

pub use conflicts::ConflictGraph;
pub use discharge::{DischargeModel, TimingConfig};
pub use engine::{CarEntry, EngineStatus, SchedulingEngine};
pub use phases::{partition_phases, Phase};
pub use strategy::{AdaptiveConfig, Strategy};
