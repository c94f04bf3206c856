//! Replay verdict reducer
//!
//! Drives `tick` from a fresh state until a terminal outcome, then compares
//! the simulated score to the claimed one.

use serde::{Deserialize, Serialize};

use super::state::{Outcome, SimState};
use super::tick::{TapCursor, finish, tick};
use crate::rules::Rules;

/// Accept/reject decision plus the engine's own score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub accepted: bool,
    pub simulated_score: u64,
}

/// Full result of one replay run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub outcome: Outcome,
    pub score: u64,
    /// Steps executed, including the terminal one
    pub steps: u64,
    /// Simulation time of the last executed step
    pub ended_at_ms: f64,
    pub horizon_ms: f64,
    pub obstacles_spawned: u32,
}

impl ReplayReport {
    /// Accept iff the claim is within `rules.tolerance` of the simulated score
    pub fn verdict(&self, rules: &Rules, claimed_score: u64) -> Verdict {
        Verdict {
            accepted: self.score.abs_diff(claimed_score) <= rules.tolerance,
            simulated_score: self.score,
        }
    }
}

/// Time-exhaustion horizon: the latest tap, or the empty-trace floor
pub fn horizon_ms(rules: &Rules, taps: &[f64]) -> f64 {
    taps.iter()
        .copied()
        .reduce(f64::max)
        .unwrap_or_else(|| rules.empty_trace_horizon_ms())
}

/// Re-simulate a run from `seed` and `taps`
pub fn replay(rules: &Rules, seed: &str, taps: &[f64]) -> ReplayReport {
    let horizon = horizon_ms(rules, taps);
    let mut state = SimState::new(rules);
    let mut cursor = TapCursor::new(taps);

    let outcome = loop {
        if rules.step_time_ms(state.step) > horizon {
            break finish(&mut state, Outcome::TimeExhausted);
        }
        if let Some(outcome) = tick(&mut state, rules, seed, &mut cursor) {
            break outcome;
        }
    };

    ReplayReport {
        outcome,
        score: state.score,
        steps: state.step,
        ended_at_ms: rules.step_time_ms(state.step.saturating_sub(1)),
        horizon_ms: horizon,
        obstacles_spawned: state.spawned,
    }
}

/// Verify a claimed score under the reference rule set
pub fn verify_replay(seed: &str, taps: &[f64], claimed_score: u64) -> Verdict {
    verify_replay_with(&Rules::default(), seed, taps, claimed_score)
}

/// Verify a claimed score under an explicit rule set
pub fn verify_replay_with(rules: &Rules, seed: &str, taps: &[f64], claimed_score: u64) -> Verdict {
    replay(rules, seed, taps).verdict(rules, claimed_score)
}
