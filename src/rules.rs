//! Game rule set
//!
//! Every physics and scoring constant the simulation reads lives here, so a
//! run can be replayed against an alternate rule set without code changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rule set validation/loading errors
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("invalid rules JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("gap range {min}..={max} is inverted")]
    InvertedGapRange { min: f64, max: f64 },
    #[error("gap band ({min} - {half}) ..= ({max} + {half}) leaves the playfield (height {height})")]
    GapOutsidePlayfield {
        min: f64,
        max: f64,
        half: f64,
        height: f64,
    },
    #[error("entity start ({x}, {y}) is outside the playfield")]
    EntityOutsidePlayfield { x: f64, y: f64 },
}

/// Immutable physics/scoring configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Fixed steps per simulated second
    pub tick_rate_hz: f64,

    // === Playfield ===
    pub playfield_width: f64,
    pub playfield_height: f64,

    // === Entity ===
    /// Fixed horizontal position of the entity center
    pub entity_x: f64,
    pub entity_start_y: f64,
    pub entity_start_vy: f64,
    /// Hit-box width, centered on `entity_x`
    pub hitbox_width: f64,
    /// Downward acceleration (px/s²)
    pub gravity: f64,
    /// Velocity a tap resets the entity to (negative = up)
    pub jump_velocity: f64,

    // === Obstacles ===
    /// Leftward scroll speed (px/s)
    pub obstacle_speed: f64,
    pub obstacle_width: f64,
    pub spawn_interval_ms: f64,
    /// Half the height of the passable gap
    pub gap_half_height: f64,
    /// Lowest gap center (top of the range, y grows downward)
    pub gap_min_y: f64,
    /// Highest gap center
    pub gap_max_y: f64,

    // === Scoring ===
    pub score_multiplier: u32,
    /// Max |simulated - claimed| still accepted
    pub tolerance: u64,
    /// Horizon for an empty trace, in spawn intervals
    pub empty_trace_spawn_cycles: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            tick_rate_hz: TICK_RATE_HZ,

            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            entity_x: ENTITY_X,
            entity_start_y: ENTITY_START_Y,
            entity_start_vy: 0.0,
            hitbox_width: HITBOX_WIDTH,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,

            obstacle_speed: OBSTACLE_SPEED,
            obstacle_width: OBSTACLE_WIDTH,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            gap_half_height: GAP_HALF_HEIGHT,
            gap_min_y: GAP_MIN_Y,
            gap_max_y: GAP_MAX_Y,

            score_multiplier: 1,
            tolerance: SCORE_TOLERANCE,
            empty_trace_spawn_cycles: EMPTY_TRACE_SPAWN_CYCLES,
        }
    }
}

impl Rules {
    /// Parse a (possibly partial) JSON rule set and validate it
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let rules: Rules = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Check that the rule set describes a playable, finite simulation
    pub fn validate(&self) -> Result<(), RulesError> {
        for (field, value) in [
            ("tick_rate_hz", self.tick_rate_hz),
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("hitbox_width", self.hitbox_width),
            ("obstacle_speed", self.obstacle_speed),
            ("obstacle_width", self.obstacle_width),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("gap_half_height", self.gap_half_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RulesError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("entity_start_vy", self.entity_start_vy),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("gap_min_y", self.gap_min_y),
            ("gap_max_y", self.gap_max_y),
        ] {
            if !value.is_finite() {
                return Err(RulesError::NotFinite { field, value });
            }
        }

        if self.gap_min_y > self.gap_max_y {
            return Err(RulesError::InvertedGapRange {
                min: self.gap_min_y,
                max: self.gap_max_y,
            });
        }

        if self.gap_min_y - self.gap_half_height < 0.0
            || self.gap_max_y + self.gap_half_height > self.playfield_height
        {
            return Err(RulesError::GapOutsidePlayfield {
                min: self.gap_min_y,
                max: self.gap_max_y,
                half: self.gap_half_height,
                height: self.playfield_height,
            });
        }

        let x_ok = self.entity_x.is_finite() && (0.0..=self.playfield_width).contains(&self.entity_x);
        let y_ok = self.entity_start_y.is_finite()
            && (0.0..=self.playfield_height).contains(&self.entity_start_y);
        if !x_ok || !y_ok {
            return Err(RulesError::EntityOutsidePlayfield {
                x: self.entity_x,
                y: self.entity_start_y,
            });
        }

        Ok(())
    }

    /// Fixed timestep in seconds
    #[inline]
    pub fn dt(&self) -> f64 {
        1.0 / self.tick_rate_hz
    }

    /// Simulation time (ms) at the start of step `step`.
    ///
    /// Computed from the step index rather than accumulated so integral
    /// timestamps stay exact.
    #[inline]
    pub fn step_time_ms(&self, step: u64) -> f64 {
        step as f64 * 1000.0 / self.tick_rate_hz
    }

    /// Time-exhaustion horizon used when the trace is empty
    pub fn empty_trace_horizon_ms(&self) -> f64 {
        self.spawn_interval_ms * f64::from(self.empty_trace_spawn_cycles)
    }
}
