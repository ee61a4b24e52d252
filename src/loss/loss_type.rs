use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::NetError;
use crate::loss::mse::SquareLoss;

/// Selects the loss the backward sweep differentiates.
///
/// - `Square` - squared error normalized by output width (`"square"`/`"mse"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Square,
}

impl LossType {
    pub fn output(&self, predicted: f64, target: f64, width: usize) -> f64 {
        match self {
            LossType::Square => SquareLoss::output(predicted, target, width),
        }
    }

    pub fn derivative(&self, predicted: f64, target: f64, width: usize) -> f64 {
        match self {
            LossType::Square => SquareLoss::derivative(predicted, target, width),
        }
    }

    /// Scalar loss of a whole prediction: the sum of per-unit outputs.
    pub fn total(&self, predicted: &[f64], expected: &[f64]) -> f64 {
        let width = predicted.len();
        predicted.iter().zip(expected.iter())
            .map(|(&p, &t)| self.output(p, t, width))
            .sum()
    }
}

impl FromStr for LossType {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" | "mse" => Ok(LossType::Square),
            other => Err(NetError::config(format!("unknown loss function '{other}'"))),
        }
    }
}
