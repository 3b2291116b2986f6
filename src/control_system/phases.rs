use crate::control_system::conflicts::ConflictGraph;
use crate::network::{LaneId, MovementId, RoadNetwork};

/// A group of mutually non-conflicting movements that receive right of way
/// together.
///
/// Membership is computed once when the engine is built and never changes;
/// only the per-phase counters held by the engine mutate afterwards.
#[derive(Debug, Clone)]
pub struct Phase {
    /// Member movements, in registration order.
    pub movements: Vec<MovementId>,
    /// Origin lanes of the member movements, deduplicated, registration
    /// order preserved.
    pub origin_lanes: Vec<LaneId>,
}

/// Partitions the movement universe into phases by greedy cover.
///
/// Repeatedly seeds a phase with the first uncovered movement in
/// registration order, then pulls in every later uncovered movement that
/// conflicts with none of the members placed so far. Every movement lands in
/// exactly one phase. The result is deterministic for a given registration
/// order but not guaranteed to use the fewest phases; minimizing the phase
/// count is NP-hard, and the runtime fairness rules bound worst-case waiting
/// independently of it.
pub fn partition_phases(network: &RoadNetwork, conflicts: &ConflictGraph) -> Vec<Phase> {
    let universe = network.movement_count();
    let mut covered = vec![false; universe];
    let mut phases = Vec::new();

    for seed in 0..universe {
        if covered[seed] {
            continue;
        }
        let mut members = vec![MovementId(seed)];
        covered[seed] = true;

        for candidate in seed + 1..universe {
            if covered[candidate] {
                continue;
            }
            let clashes = members
                .iter()
                .any(|&member| conflicts.conflicts(member, MovementId(candidate)));
            if !clashes {
                members.push(MovementId(candidate));
                covered[candidate] = true;
            }
        }

        let mut origin_lanes: Vec<LaneId> = Vec::new();
        for &movement in &members {
            let origin = network.movement(movement).from;
            if !origin_lanes.contains(&origin) {
                origin_lanes.push(origin);
            }
        }

        phases.push(Phase {
            movements: members,
            origin_lanes,
        });
    }

    log::debug!(
        "partitioned {} movements into {} phases",
        universe,
        phases.len()
    );
    phases
}
