//! Simulation run state
//!
//! One `SimState` per verdict request. Nothing here outlives the call.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::rules::Rules;

/// Which side of the gap the entity hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapSide {
    /// Above the gap (upper barrier)
    Upper,
    /// Below the gap (lower barrier)
    Lower,
}

/// Run phase - `Running` until one of the terminal outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Running,
    Finished(Outcome),
}

/// Terminal outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Entity left the gap band while inside an obstacle column
    Collided { obstacle: u32, side: GapSide },
    /// Entity left the vertical playfield
    OutOfBounds,
    /// Simulation time passed the replay horizon
    TimeExhausted,
}

/// The player entity. `pos.x` never changes; `vel.x` stays zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: DVec2,
    pub vel: DVec2,
}

impl Entity {
    pub fn new(rules: &Rules) -> Self {
        Self {
            pos: DVec2::new(rules.entity_x, rules.entity_start_y),
            vel: DVec2::new(0.0, rules.entity_start_vy),
        }
    }

    /// Tap impulse: velocity is replaced, not added to
    #[inline]
    pub fn jump(&mut self, rules: &Rules) {
        self.vel.y = rules.jump_velocity;
    }

    /// Semi-implicit Euler: velocity first, then position with the new velocity
    #[inline]
    pub fn integrate(&mut self, rules: &Rules, dt: f64) {
        self.vel.y += rules.gravity * dt;
        self.pos.y += self.vel.y * dt;
    }

    /// True if outside `[0, playfield_height]`
    #[inline]
    pub fn out_of_bounds(&self, rules: &Rules) -> bool {
        self.pos.y < 0.0 || self.pos.y > rules.playfield_height
    }
}

/// A scrolling gap-gated barrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Spawn index (also the sequence draw index)
    pub id: u32,
    /// Leading (left) edge
    pub x: f64,
    /// Vertical gap center
    pub gap_y: f64,
    /// Set once the obstacle has been counted
    pub scored: bool,
}

impl Obstacle {
    /// Trailing (right) edge
    #[inline]
    pub fn trailing_edge(&self, rules: &Rules) -> f64 {
        self.x + rules.obstacle_width
    }

    /// Closed gap band: the edges themselves are passable
    #[inline]
    pub fn gap_contains(&self, y: f64, rules: &Rules) -> bool {
        y >= self.gap_y - rules.gap_half_height && y <= self.gap_y + rules.gap_half_height
    }
}

/// Complete state of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub entity: Entity,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub score: u64,
    /// Steps executed so far
    pub step: u64,
    /// Simulation time (ms) of the last spawn
    pub last_spawn_ms: f64,
    /// Total obstacles spawned (next draw index)
    pub spawned: u32,
    pub phase: RunPhase,
}

impl SimState {
    pub fn new(rules: &Rules) -> Self {
        Self {
            entity: Entity::new(rules),
            obstacles: Vec::new(),
            score: 0,
            step: 0,
            last_spawn_ms: 0.0,
            spawned: 0,
            phase: RunPhase::Running,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Terminal outcome, if the run has ended
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            RunPhase::Running => None,
            RunPhase::Finished(outcome) => Some(outcome),
        }
    }
}
