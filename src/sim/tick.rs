//! Fixed timestep simulation tick
//!
//! One step = taps due, kinematics, judge, scheduler, in that order. A newly
//! spawned obstacle therefore cannot move or score in its spawn step.

use super::collision::judge_step;
use super::spawn::maybe_spawn;
use super::state::{Outcome, RunPhase, SimState};
use crate::rules::Rules;

/// Consumes a tap trace in trace order.
///
/// Taps are never reordered. An out-of-order tap blocks behind every earlier
/// tap in the trace: in `[100, 50]` the 50 ms tap does not fire at 66.7 ms,
/// it fires together with the 100 ms tap.
#[derive(Debug, Clone)]
pub struct TapCursor<'a> {
    taps: &'a [f64],
    next: usize,
}

impl<'a> TapCursor<'a> {
    pub fn new(taps: &'a [f64]) -> Self {
        Self { taps, next: 0 }
    }

    /// Number of leading taps with timestamp <= `now_ms`, consuming them
    pub fn take_due(&mut self, now_ms: f64) -> usize {
        let start = self.next;
        while self.next < self.taps.len() && self.taps[self.next] <= now_ms {
            self.next += 1;
        }
        self.next - start
    }

    /// Taps not yet consumed
    pub fn remaining(&self) -> usize {
        self.taps.len() - self.next
    }
}

/// Kinematics stepper: apply due taps, integrate, report out-of-bounds
pub fn step_kinematics(state: &mut SimState, rules: &Rules, due_taps: usize, dt: f64) -> bool {
    // Impulse model - any number of due taps has the effect of one
    if due_taps > 0 {
        state.entity.jump(rules);
    }
    state.entity.integrate(rules, dt);
    state.entity.out_of_bounds(rules)
}

/// Advance the run by one fixed timestep.
///
/// Returns the terminal outcome if this step ended the run. Calling `tick` on
/// a finished run is a no-op.
pub fn tick(
    state: &mut SimState,
    rules: &Rules,
    seed: &str,
    taps: &mut TapCursor<'_>,
) -> Option<Outcome> {
    if !state.is_running() {
        return state.outcome();
    }

    let now_ms = rules.step_time_ms(state.step);
    let dt = rules.dt();
    state.step += 1;

    let due = taps.take_due(now_ms);
    if step_kinematics(state, rules, due, dt) {
        return Some(finish(state, Outcome::OutOfBounds));
    }

    if let Some(collision) = judge_step(state, rules, dt) {
        return Some(finish(state, collision));
    }

    maybe_spawn(state, rules, seed, now_ms);
    None
}

/// Mark the run finished
pub fn finish(state: &mut SimState, outcome: Outcome) -> Outcome {
    state.phase = RunPhase::Finished(outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_cursor_consumes_in_trace_order() {
        let taps = [100.0, 50.0, 300.0, 300.0];
        let mut cursor = TapCursor::new(&taps);

        assert_eq!(cursor.take_due(0.0), 0);
        // 50 is due but sits behind 100
        assert_eq!(cursor.take_due(60.0), 0);
        assert_eq!(cursor.take_due(100.0), 2);
        // Duplicates are both consumed
        assert_eq!(cursor.take_due(300.0), 2);
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.take_due(1e9), 0);
    }

    #[test]
    fn test_free_fall_leaves_playfield() {
        let rules = Rules::default();
        let mut state = SimState::new(&rules);
        let mut cursor = TapCursor::new(&[]);

        let mut outcome = None;
        while outcome.is_none() {
            outcome = tick(&mut state, &rules, "seed", &mut cursor);
        }
        assert_eq!(outcome, Some(Outcome::OutOfBounds));
        // y after n steps = 300 + 0.25 * n * (n + 1); first exceeds 600 at n = 35
        assert_eq!(state.step, 35);
        assert_eq!(state.score, 0);
        assert!(!state.is_running());
    }

    #[test]
    fn test_tap_at_zero_applies_on_first_step() {
        let rules = Rules::default();
        let mut state = SimState::new(&rules);
        let taps = [0.0];
        let mut cursor = TapCursor::new(&taps);

        assert_eq!(tick(&mut state, &rules, "seed", &mut cursor), None);
        assert!(state.entity.pos.y < rules.entity_start_y);
        let expected_vy = rules.jump_velocity + rules.gravity * rules.dt();
        assert!((state.entity.vel.y - expected_vy).abs() < 1e-9);
    }

    #[test]
    fn test_tick_after_finish_is_noop() {
        let rules = Rules::default();
        let mut state = SimState::new(&rules);
        finish(&mut state, Outcome::TimeExhausted);
        let before = state.entity;
        let mut cursor = TapCursor::new(&[]);
        assert_eq!(
            tick(&mut state, &rules, "seed", &mut cursor),
            Some(Outcome::TimeExhausted)
        );
        assert_eq!(state.entity, before);
        assert_eq!(state.step, 0);
    }

    #[test]
    fn test_first_spawn_after_one_interval() {
        let rules = Rules {
            gravity: 0.0,
            ..Default::default()
        };
        let mut state = SimState::new(&rules);
        let mut cursor = TapCursor::new(&[]);

        // Steps 0..=107 run at t < 1800 ms
        for _ in 0..108 {
            tick(&mut state, &rules, "seed", &mut cursor);
        }
        assert!(state.obstacles.is_empty());

        tick(&mut state, &rules, "seed", &mut cursor);
        assert_eq!(state.obstacles.len(), 1);
        // Spawned after the judge ran: still at the right edge
        assert_eq!(state.obstacles[0].x, rules.playfield_width);
        assert_eq!(state.last_spawn_ms, 1800.0);
    }

    #[test]
    fn test_out_of_order_tap_waits_for_earlier_tap() {
        let rules = Rules::default();
        let mut state = SimState::new(&rules);
        let taps = [100.0, 50.0];
        let mut cursor = TapCursor::new(&taps);

        // Steps 0..=5 run at t <= 83.3 ms: the 50 ms tap is overdue but blocked
        for _ in 0..6 {
            assert_eq!(tick(&mut state, &rules, "seed", &mut cursor), None);
            assert!(state.entity.vel.y > 0.0);
        }
        assert_eq!(cursor.remaining(), 2);

        // Step 6 at 100 ms releases both
        tick(&mut state, &rules, "seed", &mut cursor);
        assert_eq!(cursor.remaining(), 0);
        assert!(state.entity.vel.y < 0.0);
    }
}
