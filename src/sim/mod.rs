//! Deterministic replay simulation
//!
//! All verification logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded sequence draws only
//! - Stable iteration order (spawn order)
//! - No I/O and no logging

pub mod autopilot;
pub mod collision;
pub mod replay;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::{Autopilot, AutopilotRun};
pub use collision::{Aabb, judge_step};
pub use replay::{ReplayReport, Verdict, horizon_ms, replay, verify_replay, verify_replay_with};
pub use rng::{rolling_hash, seeded_unit};
pub use spawn::{gap_for, maybe_spawn};
pub use state::{Entity, GapSide, Obstacle, Outcome, RunPhase, SimState};
pub use tick::{TapCursor, step_kinematics, tick};
