//! Online linear model over hashed features with AdaGrad step sizes.
//!
//! The model is a pair of fixed-width vectors: weights `w` and squared-gradient
//! accumulators `g`. Feature codes address both with `|code| mod size`;
//! colliding features share a weight. The sign of a code decides whether it
//! adds or subtracts its weight, doubling the usable feature space.
//!
//! ```text
//!   score(f) = Σ sign(f_i) · w[|f_i| mod size]
//!
//!   update(f, target):
//!     direction = -1 if target > score(f) else +1
//!     for each f_i:
//!       grad      = direction · sign(f_i)
//!       g[idx]   += grad²
//!       rate      = 1 / sqrt(max(g[idx], ADAGRAD_FLOOR))
//!       score    += direction · rate
//!       w[idx]   += grad · rate
//!     return score
//! ```
//!
//! Updates move every touched weight by a sign step rather than a gradient
//! magnitude, so the returned score shifts by exactly `direction · Σ rate`.
//! Nothing in the model is random: the same call sequence always yields the
//! same weights.

use crate::error::ConfigError;

/// Lower bound applied to an AdaGrad accumulator before taking its square root.
///
/// Gradients are always `±1`, so an accumulator that has been bumped once is
/// already `>= 1`. The floor only matters if a zero accumulator is ever read,
/// where it caps the learning rate at `1.0` instead of dividing by zero.
pub const ADAGRAD_FLOOR: f64 = 1.0;

#[inline]
fn sign(code: i32) -> f64 {
    if code > 0 { 1.0 } else { -1.0 }
}

/// Hashed-feature perceptron. See the module documentation.
#[derive(Debug, Clone, PartialEq)]
pub struct Perceptron {
    weights: Vec<f64>,
    adagrad: Vec<f64>,
}

impl Perceptron {
    /// Creates a zeroed model with `size` weights.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        match Self::try_new(size) {
            Ok(model) => model,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a zeroed model, rejecting a zero `size`.
    pub fn try_new(size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::new("model_size", "must be greater than zero"));
        }
        Ok(Self {
            weights: vec![0.0; size],
            adagrad: vec![0.0; size],
        })
    }

    pub fn size(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn adagrad(&self) -> &[f64] {
        &self.adagrad
    }

    #[inline]
    fn slot(&self, code: i32) -> usize {
        code.unsigned_abs() as usize % self.weights.len()
    }

    /// Linear score of `features`. Empty feature lists score `0.0`.
    pub fn score(&self, features: &[i32]) -> f64 {
        features
            .iter()
            .map(|&code| sign(code) * self.weights[self.slot(code)])
            .sum()
    }

    /// Nudges the weights of `features` one sign step and returns the corrected score.
    pub fn update(&mut self, features: &[i32], target: f64) -> f64 {
        let mut score = self.score(features);
        let direction = if target > score { -1.0 } else { 1.0 };
        for &code in features {
            let grad = direction * sign(code);
            let idx = self.slot(code);
            self.adagrad[idx] += grad * grad;
            let rate = 1.0 / self.adagrad[idx].max(ADAGRAD_FLOOR).sqrt();
            score += direction * rate;
            self.weights[idx] += grad * rate;
        }
        score
    }

    /// Zeroes weights and accumulators.
    pub fn reset(&mut self) {
        self.weights.fill(0.0);
        self.adagrad.fill(0.0);
    }
}
