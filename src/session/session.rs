use log::{debug, info};
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::init::bias::BiasInit;
use crate::loss::loss_type::LossType;
use crate::network::builder::NetworkBuilder;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::regularization::regularization::Regularization;
use crate::session::request::BuildRequest;

/// Progress returned after every `Session::run`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Updates applied so far.
    pub epochs: usize,
    /// Loss of the sample just run, measured before any update.
    pub loss: f64,
}

/// One network with its training settings and counters.
///
/// Samples arrive one at a time through `run`; the accumulated gradients are
/// applied every `batch_size` samples.
#[derive(Debug, Clone)]
pub struct Session {
    network: Network,
    optimizer: Sgd,
    loss: LossType,
    batch_size: usize,
    iterations: usize,
    epochs: usize,
    last_loss: Option<f64>,
}

impl Session {
    /// Resolves every name in `request` and builds the network.
    ///
    /// # Errors
    /// `InvalidConfig` for an unknown activation, loss, regularization or
    /// bias name, a bad shape, `batchSize == 0`, a learning rate that is not
    /// finite and positive, or a negative or non-finite `regLambda`.
    pub fn build(request: &BuildRequest) -> Result<Session> {
        let arch = &request.architecture_params;
        let training = &request.training_params;

        let activation: ActivationFunction = arch.activation.parse()?;
        let output_activation: ActivationFunction = arch.output_activation.parse()?;
        let loss: LossType = training.loss_fn.parse()?;
        let regularization = Regularization::parse_optional(&arch.regularisation)?;
        let bias_init = match arch.bias_init.as_deref() {
            Some(name) => name.parse()?,
            None => BiasInit::He,
        };

        if training.batch_size == 0 {
            return Err(NetError::config("batchSize must be at least 1"));
        }
        if !(training.learning_rate > 0.0 && training.learning_rate.is_finite()) {
            return Err(NetError::config(format!(
                "learningRate must be positive, got {}",
                training.learning_rate
            )));
        }
        if !(training.reg_lambda >= 0.0 && training.reg_lambda.is_finite()) {
            return Err(NetError::config(format!(
                "regLambda must be finite and not negative, got {}",
                training.reg_lambda
            )));
        }

        let mut builder = NetworkBuilder::new(&arch.network_shape, activation, output_activation)
            .bias_init(bias_init)
            .init_zero(arch.init_zero);
        if let Some(seed) = request.seed {
            builder = builder.seed(seed);
        }
        let network = builder.build()?;

        let mut optimizer = Sgd::new(training.learning_rate);
        if let Some(kind) = regularization {
            optimizer = optimizer.with_regularization(kind, training.reg_lambda);
        }

        info!(
            "session built shape={:?} batch_size={} learning_rate={} regularization={:?}",
            arch.network_shape, training.batch_size, training.learning_rate, regularization
        );

        Ok(Session {
            network,
            optimizer,
            loss,
            batch_size: training.batch_size,
            iterations: 0,
            epochs: 0,
            last_loss: None,
        })
    }

    /// Trains on one labelled sample.
    ///
    /// Runs forward, records the loss, then backward. When this brings the
    /// iteration count to a multiple of the batch size the pending gradients
    /// are applied and the epoch count goes up by one.
    pub fn run(&mut self, inputs: &[f64], labels: &[f64]) -> Result<RunReport> {
        self.network.forward(inputs)?;
        let loss = self.network.loss(labels, self.loss)?;
        self.network.backward(labels, self.loss)?;
        self.iterations += 1;

        if self.iterations % self.batch_size == 0 {
            self.optimizer.step(&mut self.network);
            self.epochs += 1;
            debug!("session update epochs={} loss={loss:.6}", self.epochs);
        }

        self.last_loss = Some(loss);
        Ok(RunReport { epochs: self.epochs, loss })
    }

    /// Forward pass only; leaves gradients and counters untouched.
    pub fn predict(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        Ok(self.network.forward(inputs)?.iter().map(|n| n.output).collect())
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Loss of the most recent `run`, `None` before the first one.
    pub fn last_loss(&self) -> Option<f64> {
        self.last_loss
    }
}
