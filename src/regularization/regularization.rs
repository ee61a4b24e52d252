use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::NetError;

/// Weight penalty added on top of the loss gradient at update time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regularization {
    /// `|w|`, subgradient `sign(w)` with 0 at `w == 0`.
    L1,
    /// `w² / 2`, derivative `w`.
    L2,
}

impl Regularization {
    pub fn output(&self, w: f64) -> f64 {
        match self {
            Regularization::L1 => w.abs(),
            Regularization::L2 => 0.5 * w * w,
        }
    }

    pub fn derivative(&self, w: f64) -> f64 {
        match self {
            Regularization::L1 => {
                if w > 0.0 { 1.0 } else if w < 0.0 { -1.0 } else { 0.0 }
            }
            Regularization::L2 => w,
        }
    }

    /// Like `from_str`, but `"none"` and the empty string mean no penalty.
    pub fn parse_optional(s: &str) -> Result<Option<Regularization>, NetError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(None),
            other => other.parse().map(Some),
        }
    }
}

impl FromStr for Regularization {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l1" => Ok(Regularization::L1),
            "l2" => Ok(Regularization::L2),
            other => Err(NetError::config(format!("unknown regularization '{other}'"))),
        }
    }
}
