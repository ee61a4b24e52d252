use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::NetError;

/// Element-wise activation applied to a node's total input.
///
/// The set is closed: every node in a network refers to one of these
/// variants and dispatch is a plain `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    /// `f(x) = x`. Also accepted by name as `"linear"`.
    Identity,
    ReLU,
    Sigmoid,
    Tanh,
}

impl ActivationFunction {
    pub fn output(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => x,
            ActivationFunction::ReLU => x.max(0.0),
            ActivationFunction::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            ActivationFunction::Tanh => x.tanh(),
        }
    }

    /// Derivative at the pre-activation value `x`.
    ///
    /// ReLU uses 0 at `x == 0`. Sigmoid and tanh are written in terms of
    /// their own output.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Identity => 1.0,
            ActivationFunction::ReLU => if x <= 0.0 { 0.0 } else { 1.0 },
            ActivationFunction::Sigmoid => {
                let s = self.output(x);
                s * (1.0 - s)
            }
            ActivationFunction::Tanh => {
                let t = self.output(x);
                1.0 - t * t
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Identity => "linear",
            ActivationFunction::ReLU => "relu",
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::Tanh => "tanh",
        }
    }
}

impl FromStr for ActivationFunction {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "identity" => Ok(ActivationFunction::Identity),
            "relu" => Ok(ActivationFunction::ReLU),
            "sigmoid" => Ok(ActivationFunction::Sigmoid),
            "tanh" => Ok(ActivationFunction::Tanh),
            other => Err(NetError::config(format!("unknown activation '{other}'"))),
        }
    }
}
