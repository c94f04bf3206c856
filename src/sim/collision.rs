//! Collision and scoring judge
//!
//! Per step: scroll every obstacle, count the ones whose leading edge has
//! passed the entity, then test the entity against each obstacle column it
//! overlaps. Any gap-band miss is terminal for the whole step.

use glam::DVec2;

use super::state::{Entity, GapSide, Obstacle, Outcome, SimState};
use crate::rules::Rules;

/// Axis-aligned box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Self { min, max }
    }

    /// Strict horizontal overlap; touching edges do not count
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && other.min.x < self.max.x
    }
}

/// Entity hit-box. Zero height: only the center row is tested against the gap.
pub fn entity_hitbox(entity: &Entity, rules: &Rules) -> Aabb {
    let half = rules.hitbox_width / 2.0;
    Aabb::new(
        DVec2::new(entity.pos.x - half, entity.pos.y),
        DVec2::new(entity.pos.x + half, entity.pos.y),
    )
}

/// Full-height column occupied by an obstacle
pub fn obstacle_column(obstacle: &Obstacle, rules: &Rules) -> Aabb {
    Aabb::new(
        DVec2::new(obstacle.x, 0.0),
        DVec2::new(obstacle.trailing_edge(rules), rules.playfield_height),
    )
}

/// Which barrier the entity is in, if it is outside the gap band
pub fn gap_miss(obstacle: &Obstacle, y: f64, rules: &Rules) -> Option<GapSide> {
    if obstacle.gap_contains(y, rules) {
        None
    } else if y < obstacle.gap_y {
        Some(GapSide::Upper)
    } else {
        Some(GapSide::Lower)
    }
}

/// Advance, score, collide and retire obstacles for one step.
///
/// Returns the terminal collision, if any.
pub fn judge_step(state: &mut SimState, rules: &Rules, dt: f64) -> Option<Outcome> {
    let entity_x = state.entity.pos.x;
    let scroll = rules.obstacle_speed * dt;

    // Movement and scoring for every obstacle before any collision test, so
    // the points awarded in a step never depend on the entity's height.
    for obstacle in state.obstacles.iter_mut() {
        obstacle.x -= scroll;
        if !obstacle.scored && obstacle.x < entity_x {
            obstacle.scored = true;
            state.score += u64::from(rules.score_multiplier);
        }
    }

    // First miss in spawn order ends the step
    let hitbox = entity_hitbox(&state.entity, rules);
    let y = state.entity.pos.y;
    let collision = state
        .obstacles
        .iter()
        .filter(|o| obstacle_column(o, rules).overlaps_x(&hitbox))
        .find_map(|o| {
            gap_miss(o, y, rules).map(|side| Outcome::Collided {
                obstacle: o.id,
                side,
            })
        });
    if collision.is_some() {
        return collision;
    }

    state.obstacles.retain(|o| o.trailing_edge(rules) >= 0.0);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obstacle(id: u32, x: f64, gap_y: f64) -> Obstacle {
        Obstacle {
            id,
            x,
            gap_y,
            scored: false,
        }
    }

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0));
        let b = Aabb::new(DVec2::new(10.0, 0.0), DVec2::new(20.0, 10.0));
        let c = Aabb::new(DVec2::new(9.5, 0.0), DVec2::new(20.0, 10.0));
        assert!(!a.overlaps_x(&b));
        assert!(a.overlaps_x(&c));
        assert!(c.overlaps_x(&a));
    }

    #[test]
    fn test_gap_miss_sides() {
        let rules = Rules::default();
        let o = obstacle(0, 70.0, 300.0);
        assert_eq!(gap_miss(&o, 300.0, &rules), None);
        assert_eq!(gap_miss(&o, 200.0, &rules), Some(GapSide::Upper));
        assert_eq!(gap_miss(&o, 400.0, &rules), Some(GapSide::Lower));
    }

    #[test]
    fn test_scores_once_when_leading_edge_passes() {
        let rules = Rules::default();
        let dt = rules.dt();
        let mut state = SimState::new(&rules);
        state.entity.pos.y = 300.0;
        // Leading edge 1px right of the entity, scrolls 2px per step
        state.obstacles.push(obstacle(0, 81.0, 300.0));

        assert_eq!(judge_step(&mut state, &rules, dt), None);
        assert_eq!(state.score, 1);
        assert!(state.obstacles[0].scored);

        assert_eq!(judge_step(&mut state, &rules, dt), None);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_score_multiplier() {
        let rules = Rules {
            score_multiplier: 3,
            ..Default::default()
        };
        let mut state = SimState::new(&rules);
        state.obstacles.push(obstacle(0, 81.0, 300.0));
        judge_step(&mut state, &rules, rules.dt());
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_collision_inside_column() {
        let rules = Rules::default();
        let mut state = SimState::new(&rules);
        state.entity.pos.y = 450.0;
        state.obstacles.push(obstacle(7, 70.0, 300.0));

        assert_eq!(
            judge_step(&mut state, &rules, rules.dt()),
            Some(Outcome::Collided {
                obstacle: 7,
                side: GapSide::Lower
            })
        );
    }

    #[test]
    fn test_no_collision_outside_column() {
        let rules = Rules::default();
        let mut state = SimState::new(&rules);
        state.entity.pos.y = 590.0;
        // Column spans 200..252 after scrolling, hit-box spans 63..97
        state.obstacles.push(obstacle(0, 202.0, 300.0));
        assert_eq!(judge_step(&mut state, &rules, rules.dt()), None);
    }

    #[test]
    fn test_first_collision_ends_step_and_scoring_still_applies() {
        let rules = Rules::default();
        let mut state = SimState::new(&rules);
        state.entity.pos.y = 100.0;
        state.obstacles.push(obstacle(0, 81.0, 300.0));
        state.obstacles.push(obstacle(1, 75.0, 500.0));

        let collision = judge_step(&mut state, &rules, rules.dt());
        assert_eq!(state.score, 2);
        assert!(state.obstacles.iter().all(|o| o.scored));
        assert_eq!(
            collision,
            Some(Outcome::Collided {
                obstacle: 0,
                side: GapSide::Upper
            })
        );
    }

    #[test]
    fn test_retires_obstacles_off_left_edge() {
        let rules = Rules::default();
        let mut state = SimState::new(&rules);
        state.obstacles.push(obstacle(0, -51.0, 300.0));
        state.obstacles.push(obstacle(1, 150.0, 300.0));

        judge_step(&mut state, &rules, rules.dt());
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].id, 1);
    }
}
