use std::str::FromStr;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Serialize, Deserialize};

use crate::error::NetError;

/// Strategy for a node's initial bias, given its fan-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasInit {
    Zero,
    /// Gaussian with mean 0 and standard deviation `sqrt(2 / fan_in)`,
    /// for layers feeding rectifying activations.
    He,
}

impl BiasInit {
    /// Draws one bias. A zero fan-in (input nodes) always yields 0.
    pub fn generate<R: Rng + ?Sized>(&self, fan_in: usize, rng: &mut R) -> f64 {
        match self {
            BiasInit::Zero => 0.0,
            BiasInit::He => {
                if fan_in == 0 {
                    return 0.0;
                }
                let std_dev = (2.0 / fan_in as f64).sqrt();
                match Normal::new(0.0, std_dev) {
                    Ok(normal) => normal.sample(rng),
                    Err(_) => 0.0,
                }
            }
        }
    }
}

impl FromStr for BiasInit {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(BiasInit::Zero),
            "he" => Ok(BiasInit::He),
            other => Err(NetError::config(format!("unknown bias strategy '{other}'"))),
        }
    }
}
