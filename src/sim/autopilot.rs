//! Autopilot - plays a seed and records the taps it made
//!
//! Aims a little below the center of the nearest gap it has not yet cleared
//! and taps whenever the entity drops below the aim point. Runs on the same
//! `tick` as the verifier, so its trace replays to the exact same run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Outcome, SimState};
use super::tick::{TapCursor, tick};
use crate::rules::Rules;

/// Aim offset below gap center, as a fraction of the gap half-height
const AIM_FRACTION: f64 = 0.35;

/// Deterministic trace generator
#[derive(Debug, Clone)]
pub struct Autopilot<'r> {
    rules: &'r Rules,
    aim_offset: f64,
    /// Max reaction delay per tap, in steps (0 = frame perfect)
    jitter_steps: u32,
    jitter_seed: u64,
}

impl<'r> Autopilot<'r> {
    pub fn new(rules: &'r Rules) -> Self {
        Self {
            rules,
            aim_offset: rules.gap_half_height * AIM_FRACTION,
            jitter_steps: 0,
            jitter_seed: 0,
        }
    }

    /// Delay each tap by 0..=`steps` steps, drawn from a PCG32 seeded with `seed`
    pub fn with_jitter(mut self, steps: u32, seed: u64) -> Self {
        self.jitter_steps = steps;
        self.jitter_seed = seed;
        self
    }

    /// Height the autopilot tries to hold
    pub fn aim_y(&self, state: &SimState) -> f64 {
        let rules = self.rules;
        let hitbox_left = state.entity.pos.x - rules.hitbox_width / 2.0;
        state
            .obstacles
            .iter()
            .find(|o| o.trailing_edge(rules) >= hitbox_left)
            .map_or((rules.gap_min_y + rules.gap_max_y) / 2.0, |o| o.gap_y)
            + self.aim_offset
    }

    /// Play `seed` for up to `duration_ms` and return the tap trace
    pub fn play(&self, seed: &str, duration_ms: f64) -> Vec<f64> {
        self.run(seed, duration_ms).taps
    }

    /// Play `seed` for up to `duration_ms`.
    ///
    /// Stops early if the run ends; the trace then covers the run up to
    /// its terminal step.
    pub fn run(&self, seed: &str, duration_ms: f64) -> AutopilotRun {
        let rules = self.rules;
        let mut rng = Pcg32::seed_from_u64(self.jitter_seed);
        let mut state = SimState::new(rules);
        let mut taps = Vec::new();
        let mut pending: Option<u64> = None;
        let mut outcome = None;

        while rules.step_time_ms(state.step) <= duration_ms {
            let now_ms = rules.step_time_ms(state.step);

            if pending.is_none() && state.entity.pos.y > self.aim_y(&state) {
                let delay = if self.jitter_steps > 0 {
                    u64::from(rng.random_range(0..=self.jitter_steps))
                } else {
                    0
                };
                pending = Some(state.step + delay);
            }

            let fire = pending == Some(state.step);
            if fire {
                taps.push(now_ms);
                pending = None;
            }

            let one = [now_ms];
            let due = if fire { &one[..] } else { &one[..0] };
            outcome = tick(&mut state, rules, seed, &mut TapCursor::new(due));
            if outcome.is_some() {
                break;
            }
        }

        AutopilotRun {
            taps,
            outcome,
            score: state.score,
            ended_at_ms: rules.step_time_ms(state.step.saturating_sub(1)),
        }
    }
}

/// What the autopilot did on one seed
#[derive(Debug, Clone, PartialEq)]
pub struct AutopilotRun {
    pub taps: Vec<f64>,
    /// Terminal outcome if the autopilot died before `duration_ms`
    pub outcome: Option<Outcome>,
    pub score: u64,
    /// Simulation time of the last executed step
    pub ended_at_ms: f64,
}
