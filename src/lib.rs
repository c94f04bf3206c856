//! Tap Replay - server-side score verification for a tap-timing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic re-simulation (physics, obstacles, scoring, verdict)
//! - `rules`: Data-driven rule set (constants for one run)
//! - `submission`: Untrusted-input boundary in front of the engine

pub mod rules;
pub mod sim;
pub mod submission;

pub use rules::{Rules, RulesError};
pub use sim::{Outcome, ReplayReport, Verdict, replay, verify_replay, verify_replay_with};
pub use submission::{Limits, Submission, SubmissionError, ValidatedSubmission, judge};

/// Reference rule set constants
pub mod consts {
    /// Fixed simulation rate (60 Hz, one step ≈ 16.67 ms)
    pub const TICK_RATE_HZ: f64 = 60.0;

    /// Playfield dimensions (y grows downward)
    pub const PLAYFIELD_WIDTH: f64 = 400.0;
    pub const PLAYFIELD_HEIGHT: f64 = 600.0;

    /// Entity defaults - fixed column, starts mid-screen at rest
    pub const ENTITY_X: f64 = 80.0;
    pub const ENTITY_START_Y: f64 = 300.0;
    pub const HITBOX_WIDTH: f64 = 34.0;

    /// Downward acceleration (px/s²)
    pub const GRAVITY: f64 = 1800.0;
    /// Tap impulse - replaces current velocity
    pub const JUMP_VELOCITY: f64 = -480.0;

    /// Obstacle defaults
    pub const OBSTACLE_SPEED: f64 = 120.0;
    pub const OBSTACLE_WIDTH: f64 = 52.0;
    pub const SPAWN_INTERVAL_MS: f64 = 1800.0;
    pub const GAP_HALF_HEIGHT: f64 = 70.0;
    pub const GAP_MIN_Y: f64 = 130.0;
    pub const GAP_MAX_Y: f64 = 470.0;

    /// Absorbs step-boundary rounding between client and server
    pub const SCORE_TOLERANCE: u64 = 2;
    pub const EMPTY_TRACE_SPAWN_CYCLES: u32 = 3;

    /// Resolution of the seeded sequence generator
    pub const SEQUENCE_RESOLUTION: u32 = 1000;
}
