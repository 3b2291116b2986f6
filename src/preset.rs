use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::control_system::discharge::TimingConfig;
use crate::control_system::strategy::Strategy;
use crate::errors::SchedulerError;
use crate::network::registry::parse_movement_text;
use crate::network::{MovementId, RoadNetwork};

/// One scripted entry of a preset's command sequence.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Queue a car at `start_road`. The destination is informational; the
    /// engine credits the start lane.
    #[serde(rename_all = "camelCase")]
    AddVehicle {
        start_road: String,
        #[serde(default)]
        end_road: Option<String>,
    },
    /// Advance the engine by one step.
    Step,
}

/// An externally supplied intersection setup: movement lines, conflict
/// declarations and a scripted command sequence, plus optional overrides for
/// timing and strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct Preset {
    pub movements: Vec<String>,
    #[serde(default)]
    pub collisions: Vec<(String, String)>,
    #[serde(default)]
    pub commands: Vec<Command>,
    #[serde(default)]
    pub timing: Option<TimingConfig>,
    #[serde(default)]
    pub strategy: Option<Strategy>,
}

impl Preset {
    pub fn from_json(text: &str) -> Result<Self, SchedulerError> {
        serde_json::from_str(text).map_err(|e| SchedulerError::Configuration(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchedulerError> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| {
            SchedulerError::Configuration(format!(
                "could not read preset {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_json(&text)
    }

    /// The built-in demo preset: three movements on one approach pair and a
    /// short add/step script.
    pub fn mocked() -> Self {
        let vehicle = |start: &str, end: &str| Command::AddVehicle {
            start_road: start.to_string(),
            end_road: Some(end.to_string()),
        };
        Self {
            movements: vec![
                "S2 -> N1".to_string(),
                "N2 -> S1".to_string(),
                "S2 -> W1".to_string(),
            ],
            collisions: Vec::new(),
            commands: vec![
                vehicle("S2", "W1"),
                vehicle("N2", "S1"),
                Command::Step,
                Command::Step,
                vehicle("S2", "N1"),
                vehicle("S2", "N1"),
                Command::Step,
                Command::Step,
            ],
            timing: None,
            strategy: None,
        }
    }

    /// Builds the road network and resolves the collision declarations.
    ///
    /// Movement lines the loader tolerates are skipped with a warning rather
    /// than failing the whole preset: unparseable text, and "reversing"
    /// lines whose origin and destination share an approach direction
    /// (u-turns are assumed to ride along with the left turn of the same
    /// lane). The core stays strict; the tolerance lives here.
    pub fn build(&self) -> Result<(RoadNetwork, Vec<(MovementId, MovementId)>), SchedulerError> {
        let mut network = RoadNetwork::new();

        for line in &self.movements {
            let (from, to) = match parse_movement_text(line) {
                Ok(keys) => keys,
                Err(_) => {
                    log::warn!("invalid movement line {line:?}, skipping");
                    continue;
                }
            };
            if from.0 == to.0 {
                log::warn!("reversing movement {line:?}, skipping");
                continue;
            }
            network.parse_movement(line)?;
        }

        let mut conflict_pairs = Vec::with_capacity(self.collisions.len());
        for (a, b) in &self.collisions {
            let a = network.find_movement(a).map_err(|_| {
                SchedulerError::Configuration(format!("collision references unknown movement {a:?}"))
            })?;
            let b = network.find_movement(b).map_err(|_| {
                SchedulerError::Configuration(format!("collision references unknown movement {b:?}"))
            })?;
            conflict_pairs.push((a, b));
        }

        Ok((network, conflict_pairs))
    }
}
