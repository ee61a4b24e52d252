use crate::network::network::Network;
use crate::network::update::Penalty;
use crate::regularization::regularization::Regularization;

/// Plain gradient descent, optionally with a weight penalty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
    pub penalty: Option<Penalty>,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate, penalty: None }
    }

    pub fn with_regularization(mut self, kind: Regularization, rate: f64) -> Sgd {
        self.penalty = Some(Penalty { kind, rate });
        self
    }

    /// Applies one update from the gradients accumulated since the last step.
    pub fn step(&self, network: &mut Network) {
        network.update_with_penalty(self.learning_rate, self.penalty);
    }
}
