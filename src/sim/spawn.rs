//! Obstacle scheduler
//!
//! Spawns at the right edge every `spawn_interval_ms`, gap drawn from the
//! seeded sequence at draw index = obstacles spawned so far.

use super::rng::seeded_unit;
use super::state::{Obstacle, SimState};
use crate::rules::Rules;

/// Map a `[0, 1)` draw into the gap center range
#[inline]
pub fn gap_center(rules: &Rules, unit: f64) -> f64 {
    rules.gap_min_y + unit * (rules.gap_max_y - rules.gap_min_y)
}

/// Gap center of the `index`-th obstacle for `seed`
pub fn gap_for(rules: &Rules, seed: &str, index: u32) -> f64 {
    gap_center(rules, seeded_unit(seed, u64::from(index)))
}

/// Spawn an obstacle if the interval has elapsed. Returns true if one spawned.
pub fn maybe_spawn(state: &mut SimState, rules: &Rules, seed: &str, now_ms: f64) -> bool {
    if now_ms - state.last_spawn_ms < rules.spawn_interval_ms {
        return false;
    }

    let id = state.spawned;
    state.obstacles.push(Obstacle {
        id,
        x: rules.playfield_width,
        gap_y: gap_for(rules, seed, id),
        scored: false,
    });
    state.spawned += 1;
    state.last_spawn_ms = now_ms;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_center_mapping() {
        let rules = Rules::default();
        assert_eq!(gap_center(&rules, 0.0), rules.gap_min_y);
        assert_eq!(gap_center(&rules, 0.5), 300.0);
        assert!(gap_center(&rules, 0.999) < rules.gap_max_y);
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let rules = Rules::default();
        let mut state = SimState::new(&rules);
        assert!(!maybe_spawn(&mut state, &rules, "abc", 0.0));
        assert!(!maybe_spawn(&mut state, &rules, "abc", 1799.9));
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_spawn_uses_draw_index() {
        let rules = Rules::default();
        let mut state = SimState::new(&rules);

        assert!(maybe_spawn(&mut state, &rules, "abc", 1800.0));
        assert!(!maybe_spawn(&mut state, &rules, "abc", 3000.0));
        assert!(maybe_spawn(&mut state, &rules, "abc", 3600.0));

        assert_eq!(state.spawned, 2);
        assert_eq!(state.last_spawn_ms, 3600.0);
        assert_eq!(state.obstacles[0].id, 0);
        assert_eq!(state.obstacles[1].id, 1);
        assert_eq!(state.obstacles[0].x, rules.playfield_width);
        // seeded_unit("abc", 0) == 0.022
        assert!((state.obstacles[0].gap_y - (130.0 + 0.022 * 340.0)).abs() < 1e-9);
        assert_eq!(state.obstacles[1].gap_y, gap_for(&rules, "abc", 1));
        assert!(!state.obstacles[0].scored);
    }
}
