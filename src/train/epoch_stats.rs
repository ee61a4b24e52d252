use serde::{Serialize, Deserialize};

/// Per-epoch statistics produced by `train_loop`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Mean loss over the training samples, measured before each update.
    pub train_loss: f64,
    /// Mean loss over the test set after the epoch, if one was given.
    pub test_loss: Option<f64>,
    /// Argmax accuracy on the test set; only for multi-output labels.
    pub test_accuracy: Option<f64>,
    pub elapsed_ms: u64,
}
