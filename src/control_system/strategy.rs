use serde::{Deserialize, Serialize};

use crate::errors::SchedulerError;

/// Tuning knobs for the adaptive strategy, both counted in engine steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// Steps a phase may stay active before it is barred from being picked
    /// again (anti-monopolization).
    pub max_active_steps: u32,
    /// Waiting steps after which a phase is considered starved and jumps the
    /// demand ranking.
    pub max_wait_steps: u32,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            max_active_steps: 6,
            max_wait_steps: 5,
        }
    }
}

/// Picks which phase receives right of way next. Chosen once at engine
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// Cycles through the phases in index order, ignoring demand.
    FixedRoundRobin,
    /// Sends green where the cars are, bounded by anti-monopolization and
    /// starvation overrides.
    Adaptive(AdaptiveConfig),
}

impl Strategy {
    /// Computes the next active phase index from the current counters.
    ///
    /// `waiting_steps` and `cars_in_phases` are indexed by phase and must
    /// have the same nonzero length. The computation is pure; the engine
    /// commits no counter mutation until it returns.
    pub fn next_phase(
        &self,
        current: usize,
        active_steps: u32,
        waiting_steps: &[u32],
        cars_in_phases: &[u32],
    ) -> Result<usize, SchedulerError> {
        match self {
            Strategy::FixedRoundRobin => Ok((current + 1) % cars_in_phases.len()),
            Strategy::Adaptive(config) => {
                Self::next_adaptive(config, current, active_steps, waiting_steps, cars_in_phases)
            }
        }
    }

    fn next_adaptive(
        config: &AdaptiveConfig,
        current: usize,
        active_steps: u32,
        waiting_steps: &[u32],
        cars_in_phases: &[u32],
    ) -> Result<usize, SchedulerError> {
        let mut candidates: Vec<usize> = (0..cars_in_phases.len()).collect();

        // The current phase has held green long enough; force a hand-over
        // unless it is the only phase there is.
        if active_steps > config.max_active_steps && candidates.len() > 1 {
            candidates.retain(|&idx| idx != current);
        }

        // Starved phases preempt the demand ranking entirely.
        let starved: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&idx| waiting_steps[idx] > config.max_wait_steps)
            .collect();
        if !starved.is_empty() {
            candidates = starved;
        }

        // Most queued cars wins; ties go to the lowest phase index.
        let mut best: Option<usize> = None;
        for &idx in &candidates {
            match best {
                Some(leader) if cars_in_phases[idx] <= cars_in_phases[leader] => {}
                _ => best = Some(idx),
            }
        }

        best.ok_or_else(|| {
            SchedulerError::InvariantViolation("no candidate phase to activate".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adaptive(max_active_steps: u32, max_wait_steps: u32) -> Strategy {
        Strategy::Adaptive(AdaptiveConfig {
            max_active_steps,
            max_wait_steps,
        })
    }

    #[test]
    fn round_robin_cycles_through_every_phase() {
        let strategy = Strategy::FixedRoundRobin;
        let waiting = [0u32; 4];
        let cars = [9, 0, 3, 7];
        let mut current = 0;
        let mut visited = Vec::new();
        for _ in 0..4 {
            current = strategy.next_phase(current, 0, &waiting, &cars).unwrap();
            visited.push(current);
        }
        assert_eq!(visited, vec![1, 2, 3, 0]);
    }

    #[test]
    fn adaptive_picks_the_phase_with_most_cars() {
        let strategy = adaptive(6, 5);
        let next = strategy.next_phase(0, 0, &[0, 0, 0], &[2, 9, 4]).unwrap();
        assert_eq!(next, 1);
    }

    #[test]
    fn adaptive_breaks_ties_by_lowest_index() {
        let strategy = adaptive(6, 5);
        let next = strategy.next_phase(2, 0, &[0, 0, 0], &[5, 5, 5]).unwrap();
        assert_eq!(next, 0);
    }

    #[test]
    fn starvation_override_beats_raw_demand() {
        // Phase 1 has waited past the threshold of 3; phase 0 has far more
        // cars but must yield.
        let strategy = adaptive(6, 3);
        let next = strategy.next_phase(0, 0, &[0, 4], &[100, 1]).unwrap();
        assert_eq!(next, 1);
    }

    #[test]
    fn waiting_exactly_at_the_threshold_does_not_starve() {
        let strategy = adaptive(6, 3);
        let next = strategy.next_phase(0, 0, &[0, 3], &[100, 1]).unwrap();
        assert_eq!(next, 0);
    }

    #[test]
    fn monopolizing_phase_is_removed_from_candidates() {
        // Phase 0 still has the most cars but exceeded its active budget.
        let strategy = adaptive(2, 9);
        let next = strategy.next_phase(0, 3, &[0, 1, 1], &[50, 6, 2]).unwrap();
        assert_eq!(next, 1);
    }

    #[test]
    fn active_budget_is_exclusive_at_the_threshold() {
        let strategy = adaptive(2, 9);
        let next = strategy.next_phase(0, 2, &[0, 1], &[50, 6]).unwrap();
        assert_eq!(next, 0);
    }

    #[test]
    fn single_phase_survives_the_monopolization_rule() {
        let strategy = adaptive(1, 9);
        let next = strategy.next_phase(0, 100, &[0], &[0]).unwrap();
        assert_eq!(next, 0);
    }

    #[test]
    fn starved_monopolist_stays_excluded() {
        // The active phase is both over budget and starved-looking; the
        // exclusion is applied first, so the other starved phase wins.
        let strategy = adaptive(2, 3);
        let next = strategy.next_phase(0, 5, &[9, 4, 0], &[8, 1, 2]).unwrap();
        assert_eq!(next, 1);
    }
}
