use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use crate::loss::loss_type::LossType;
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`      - total number of full passes over the training data
/// - `batch_size`  - samples accumulated per update; `1` for online SGD
/// - `loss`        - loss differentiated by the backward pass
/// - `seed`        - seed for the per-epoch shuffle; entropy when `None`
/// - `progress_tx` - optional channel; one `EpochStats` per completed epoch.
///                   A dropped receiver ends the run early.
/// - `stop_flag`   - optional flag; when set from another thread the loop
///                   ends after the current epoch.
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub loss: LossType,
    pub seed: Option<u64>,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no seed, progress channel or stop flag.
    pub fn new(epochs: usize, batch_size: usize, loss: LossType) -> Self {
        TrainConfig {
            epochs,
            batch_size,
            loss,
            seed: None,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
