//! Score submission boundary
//!
//! Turns untrusted JSON into well-typed engine input, then runs the verifier.
//! Everything that can fail or needs logging happens here, not in `sim`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::rules::Rules;
use crate::sim::{Verdict, replay};

/// Default boundary limits
pub const MAX_SEED_LEN: usize = 256;
pub const MAX_TAPS: usize = 20_000;
/// 30 minutes
pub const MAX_TRACE_MS: f64 = 30.0 * 60.0 * 1000.0;

/// Why a submission never reached the engine
#[derive(Debug, Error, PartialEq)]
pub enum SubmissionError {
    #[error("invalid submission JSON: {0}")]
    Parse(String),
    #[error("seed is {len} bytes (max {max})")]
    SeedTooLong { len: usize, max: usize },
    #[error("trace has {count} taps (max {max})")]
    TooManyTaps { count: usize, max: usize },
    #[error("tap {index} is not a number: {value}")]
    NonNumericTap { index: usize, value: String },
    #[error("tap {index} is out of range: {value} (allowed 0..={max})")]
    TapOutOfRange { index: usize, value: f64, max: f64 },
    #[error("claimed score must be a non-negative integer, got {0}")]
    InvalidScore(String),
}

/// Size limits applied before simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_seed_len: usize,
    pub max_taps: usize,
    pub max_trace_ms: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_seed_len: MAX_SEED_LEN,
            max_taps: MAX_TAPS,
            max_trace_ms: MAX_TRACE_MS,
        }
    }
}

/// Raw client submission. Taps and score stay untyped until `validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub seed: String,
    #[serde(default)]
    pub taps: Vec<Value>,
    pub claimed_score: Value,
}

/// Submission that passed every boundary check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub seed: String,
    pub taps: Vec<f64>,
    pub claimed_score: u64,
}

impl Submission {
    pub fn from_json(json: &str) -> Result<Self, SubmissionError> {
        serde_json::from_str(json).map_err(|e| SubmissionError::Parse(e.to_string()))
    }

    pub fn validate(&self, limits: &Limits) -> Result<ValidatedSubmission, SubmissionError> {
        if self.seed.len() > limits.max_seed_len {
            return Err(SubmissionError::SeedTooLong {
                len: self.seed.len(),
                max: limits.max_seed_len,
            });
        }
        if self.taps.len() > limits.max_taps {
            return Err(SubmissionError::TooManyTaps {
                count: self.taps.len(),
                max: limits.max_taps,
            });
        }

        let taps = self
            .taps
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let t = value.as_f64().ok_or_else(|| SubmissionError::NonNumericTap {
                    index,
                    value: value.to_string(),
                })?;
                if !t.is_finite() || !(0.0..=limits.max_trace_ms).contains(&t) {
                    return Err(SubmissionError::TapOutOfRange {
                        index,
                        value: t,
                        max: limits.max_trace_ms,
                    });
                }
                Ok(t)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let claimed_score = self
            .claimed_score
            .as_u64()
            .ok_or_else(|| SubmissionError::InvalidScore(self.claimed_score.to_string()))?;

        Ok(ValidatedSubmission {
            seed: self.seed.clone(),
            taps,
            claimed_score,
        })
    }
}

/// Validate a submission and run the verifier on it
pub fn judge(
    rules: &Rules,
    limits: &Limits,
    submission: &Submission,
) -> Result<Verdict, SubmissionError> {
    let input = submission.validate(limits).inspect_err(|e| {
        log::warn!("Submission for seed {:?} refused: {}", submission.seed, e);
    })?;

    let report = replay(rules, &input.seed, &input.taps);
    let verdict = report.verdict(rules, input.claimed_score);

    if verdict.accepted {
        log::debug!(
            "Replay accepted: seed={:?} claimed={} simulated={} outcome={:?}",
            input.seed,
            input.claimed_score,
            verdict.simulated_score,
            report.outcome
        );
    } else {
        log::warn!(
            "Replay rejected: seed={:?} claimed={} simulated={} outcome={:?} after {} steps",
            input.seed,
            input.claimed_score,
            verdict.simulated_score,
            report.outcome,
            report.steps
        );
    }

    Ok(verdict)
}
