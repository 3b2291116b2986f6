use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::control_system::conflicts::ConflictGraph;
use crate::control_system::discharge::{DischargeModel, TimingConfig};
use crate::control_system::phases::{partition_phases, Phase};
use crate::control_system::strategy::Strategy;
use crate::errors::SchedulerError;
use crate::network::{LaneId, MovementId, RoadNetwork};
use crate::util::CallbackList;

/// Where a car enters the engine: lane text, a held lane handle, or a held
/// movement handle (which credits the movement's origin lane).
#[derive(Debug, Clone, Copy)]
pub enum CarEntry<'a> {
    LaneText(&'a str),
    Lane(LaneId),
    Movement(MovementId),
}

impl<'a> From<&'a str> for CarEntry<'a> {
    fn from(text: &'a str) -> Self {
        CarEntry::LaneText(text)
    }
}

impl From<LaneId> for CarEntry<'_> {
    fn from(id: LaneId) -> Self {
        CarEntry::Lane(id)
    }
}

impl From<MovementId> for CarEntry<'_> {
    fn from(id: MovementId) -> Self {
        CarEntry::Movement(id)
    }
}

/// Read-only snapshot of the engine state.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatus {
    /// Index of the phase currently holding right of way.
    pub active_phase: usize,
    /// Labels of the active phase's movements.
    pub active_phase_movements: Vec<String>,
    /// Consecutive steps the active phase has stayed active.
    pub active_steps: u32,
    /// Steps since each phase was last active, indexed by phase.
    pub waiting_steps: Vec<u32>,
    /// Queued cars summed over each phase's origin lanes, indexed by phase.
    pub cars_in_phases: Vec<u32>,
}

/// The phase-scheduling state machine.
///
/// Owns the road network, the computed phases and every per-phase counter.
/// Transitions happen only on explicit [`step`](Self::step) calls; there are
/// no timers and no background work. One instance is single-writer: all
/// mutation goes through `&mut self`.
#[derive(Debug)]
pub struct SchedulingEngine {
    network: RoadNetwork,
    phases: Vec<Phase>,
    strategy: Strategy,
    discharge: DischargeModel,
    rng: SmallRng,
    active_idx: usize,
    active_steps: u32,
    waiting_steps: Vec<u32>,
    last_car_added: Option<LaneId>,
    phase_changed: CallbackList<EngineStatus>,
    phase_stayed: CallbackList<EngineStatus>,
    car_added: CallbackList<String>,
}

impl SchedulingEngine {
    /// Builds an engine over `network`, with the given conflict
    /// declarations, scheduling strategy and signal timing.
    ///
    /// Fails with `Configuration` when the network has no movements or the
    /// timing parameters are unusable, and with `IdentityNotFound` when a
    /// conflict declaration references a movement outside the network.
    pub fn new(
        network: RoadNetwork,
        conflict_pairs: &[(MovementId, MovementId)],
        strategy: Strategy,
        timing: TimingConfig,
    ) -> Result<Self, SchedulerError> {
        let rng = SmallRng::from_rng(&mut rand::rng());
        Self::with_rng(network, conflict_pairs, strategy, timing, rng)
    }

    /// Like [`new`](Self::new), with a caller-supplied RNG so tests can pin
    /// the discharge sampling.
    pub fn with_rng(
        network: RoadNetwork,
        conflict_pairs: &[(MovementId, MovementId)],
        strategy: Strategy,
        timing: TimingConfig,
        rng: SmallRng,
    ) -> Result<Self, SchedulerError> {
        timing.validate()?;
        if network.movement_count() == 0 {
            return Err(SchedulerError::Configuration(
                "network has no movements to schedule".to_string(),
            ));
        }

        let mut conflicts = ConflictGraph::new(network.movement_count());
        for &(a, b) in conflict_pairs {
            conflicts.declare(a, b)?;
        }

        let phases = partition_phases(&network, &conflicts);
        let waiting_steps = vec![0; phases.len()];

        Ok(Self {
            network,
            phases,
            strategy,
            discharge: DischargeModel::new(timing),
            rng,
            active_idx: 0,
            active_steps: 0,
            waiting_steps,
            last_car_added: None,
            phase_changed: CallbackList::new(),
            phase_stayed: CallbackList::new(),
            car_added: CallbackList::new(),
        })
    }

    /// Advances the state machine by one step.
    ///
    /// Discharges cars through the active phase, asks the strategy for the
    /// next phase and commits the transition, firing the matching
    /// notification. Returns `Ok(true)` when only one phase exists at all,
    /// i.e. further stepping cannot change anything.
    pub fn step(&mut self) -> Result<bool, SchedulerError> {
        // Discharge: one sampled count for this step, applied to every
        // origin lane of the active phase, clamped per lane.
        let cars_through = self.discharge.cars_through(&mut self.rng);
        let origin_lanes = self.phases[self.active_idx].origin_lanes.clone();
        for lane in origin_lanes {
            self.network.remove_cars(lane, cars_through);
        }

        // Select the next phase fully before committing anything, so a
        // strategy error leaves the counters untouched.
        let next = if self.phases.len() == 1 {
            self.active_idx
        } else {
            self.strategy.next_phase(
                self.active_idx,
                self.active_steps,
                &self.waiting_steps,
                &self.count_cars_in_phases(),
            )?
        };

        if next == self.active_idx {
            self.active_steps += 1;
            self.bump_waiting(next);
            log::debug!("phase {} stays active ({} steps)", next, self.active_steps);
            let status = self.status();
            self.phase_stayed.fire(&status);
        } else {
            log::debug!("phase {} -> {}", self.active_idx, next);
            self.active_idx = next;
            self.active_steps = 0;
            self.bump_waiting(next);
            let status = self.status();
            self.phase_changed.fire(&status);
        }

        Ok(self.phases.len() == 1)
    }

    /// Queues one car at the given entry point.
    ///
    /// The entry must already be part of this engine's universe; nothing is
    /// created here and nothing mutates on the error path. Returns the
    /// credited lane.
    pub fn add_car<'a>(
        &mut self,
        entry: impl Into<CarEntry<'a>>,
    ) -> Result<LaneId, SchedulerError> {
        let lane = match entry.into() {
            CarEntry::LaneText(text) => self.network.find_lane(text)?,
            CarEntry::Lane(id) => {
                if !self.network.contains_lane(id) {
                    return Err(SchedulerError::IdentityNotFound(format!("lane #{}", id.0)));
                }
                id
            }
            CarEntry::Movement(id) => {
                if !self.network.contains_movement(id) {
                    return Err(SchedulerError::IdentityNotFound(format!(
                        "movement #{}",
                        id.0
                    )));
                }
                self.network.movement(id).from
            }
        };

        self.network.add_car(lane);
        self.last_car_added = Some(lane);
        let label = self.network.lane_label(lane);
        self.car_added.fire(&label);
        Ok(lane)
    }

    /// Snapshot of the current counters.
    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            active_phase: self.active_idx,
            active_phase_movements: self.phases[self.active_idx]
                .movements
                .iter()
                .map(|&m| self.network.movement_label(m))
                .collect(),
            active_steps: self.active_steps,
            waiting_steps: self.waiting_steps.clone(),
            cars_in_phases: self.count_cars_in_phases(),
        }
    }

    /// Subscribes to phase-change transitions.
    pub fn on_phase_changed(&mut self, callback: impl FnMut(&EngineStatus) + 'static) {
        self.phase_changed.push(callback);
    }

    /// Subscribes to steps where the active phase is kept.
    pub fn on_phase_stayed(&mut self, callback: impl FnMut(&EngineStatus) + 'static) {
        self.phase_stayed.push(callback);
    }

    /// Subscribes to car arrivals; the payload is the credited lane label.
    pub fn on_car_added(&mut self, callback: impl FnMut(&String) + 'static) {
        self.car_added.push(callback);
    }

    /// The lane credited by the most recent `add_car`, if any.
    pub fn last_car_added(&self) -> Option<LaneId> {
        self.last_car_added
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    fn count_cars_in_phases(&self) -> Vec<u32> {
        self.phases
            .iter()
            .map(|phase| {
                phase
                    .origin_lanes
                    .iter()
                    .map(|&lane| self.network.queued_cars(lane))
                    .sum()
            })
            .collect()
    }

    /// Resets the newly active phase's waiting counter and lets every other
    /// phase wait one step longer.
    fn bump_waiting(&mut self, active: usize) {
        for (idx, waited) in self.waiting_steps.iter_mut().enumerate() {
            if idx == active {
                *waited = 0;
            } else {
                *waited += 1;
            }
        }
    }
}
