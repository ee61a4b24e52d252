use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::dataset::Dataset;
use crate::error::{NetError, Result};
use crate::loss::loss_type::LossType;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns the stats of every
/// completed epoch.
///
/// Each epoch visits the training samples in a freshly shuffled order, runs
/// forward + backward per sample and steps `optimizer` after every
/// `batch_size` samples (and once more for a trailing partial batch).
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Errors
/// `InvalidConfig` for an empty training set, `batch_size == 0`, a learning
/// rate that is not finite and positive, or a bad regularization rate;
/// `SizeMismatch` if any sample does not fit the network.
pub fn train_loop(
    network: &mut Network,
    train: &Dataset,
    test: Option<&Dataset>,
    optimizer: &Sgd,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    if train.is_empty() {
        return Err(NetError::config("training set is empty"));
    }
    if config.batch_size == 0 {
        return Err(NetError::config("batch_size must be at least 1"));
    }
    let lr = optimizer.learning_rate;
    if !(lr > 0.0 && lr.is_finite()) {
        return Err(NetError::config(format!("learning rate must be finite and positive, got {lr}")));
    }
    if let Some(penalty) = optimizer.penalty {
        if !(penalty.rate >= 0.0 && penalty.rate.is_finite()) {
            return Err(NetError::config(format!(
                "regularization rate must be finite and not negative, got {}",
                penalty.rate
            )));
        }
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        if stop_requested(config) {
            break;
        }

        let t_start = Instant::now();
        let train_loss = run_one_epoch(network, train, optimizer, config, &mut rng)?;

        let (test_loss, test_accuracy) = match test {
            Some(t) if !t.is_empty() => {
                let acc = if t.label_count() > 1 { Some(accuracy(network, t)?) } else { None };
                (Some(evaluate_loss(network, t, config.loss)?), acc)
            }
            _ => (None, None),
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            test_loss,
            test_accuracy,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        info!(
            "epoch {}/{} train_loss={:.6} test_loss={:?} test_accuracy={:?} elapsed_ms={}",
            stats.epoch,
            stats.total_epochs,
            stats.train_loss,
            stats.test_loss,
            stats.test_accuracy,
            stats.elapsed_ms
        );
        history.push(stats.clone());

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                info!("progress receiver dropped, stopping after epoch {epoch}");
                break;
            }
        }
    }

    Ok(history)
}

/// Mean loss over a dataset, forward passes only.
pub fn evaluate_loss(network: &mut Network, data: &Dataset, loss: LossType) -> Result<f64> {
    if data.is_empty() {
        warn!("evaluate_loss called on an empty dataset");
        return Ok(0.0);
    }
    let mut total = 0.0;
    for (input, label) in data.iter() {
        network.forward(input)?;
        total += network.loss(label, loss)?;
    }
    Ok(total / data.len() as f64)
}

/// Fraction of samples whose largest output matches the largest label entry.
pub fn accuracy(network: &mut Network, data: &Dataset) -> Result<f64> {
    if data.is_empty() {
        return Ok(0.0);
    }
    let mut correct = 0usize;
    for (input, label) in data.iter() {
        let output: Vec<f64> = network.forward(input)?.iter().map(|n| n.output).collect();
        if argmax(&output) == argmax(label) {
            correct += 1;
        }
    }
    Ok(correct as f64 / data.len() as f64)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config.stop_flag.as_ref().map_or(false, |flag| flag.load(Ordering::Relaxed))
}

/// One shuffled pass; returns the mean pre-update loss over all samples.
fn run_one_epoch(
    network: &mut Network,
    train: &Dataset,
    optimizer: &Sgd,
    config: &TrainConfig,
    rng: &mut StdRng,
) -> Result<f64> {
    let n = train.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut total_loss = 0.0;
    for batch in order.chunks(config.batch_size) {
        for &idx in batch {
            network.forward(&train.inputs[idx])?;
            total_loss += network.loss(&train.labels[idx], config.loss)?;
            network.backward(&train.labels[idx], config.loss)?;
        }
        optimizer.step(network);
    }

    Ok(total_loss / n as f64)
}

fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::sync::{mpsc, Arc, atomic::AtomicBool};

    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::network::builder::NetworkBuilder;
    use crate::regularization::regularization::Regularization;

    fn xor_data() -> Dataset {
        Dataset::new(
            vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
            vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
        )
        .unwrap()
    }

    fn xor_net() -> Network {
        NetworkBuilder::new(&[2, 6, 1], ActivationFunction::Tanh, ActivationFunction::Sigmoid)
            .seed(3)
            .build()
            .unwrap()
    }

    #[test]
    fn rejects_zero_batch_and_empty_set() {
        let mut net = xor_net();
        let sgd = Sgd::new(0.1);
        let cfg = TrainConfig::new(1, 0, LossType::Square);
        assert!(matches!(train_loop(&mut net, &xor_data(), None, &sgd, &cfg), Err(NetError::InvalidConfig(_))));

        let cfg = TrainConfig::new(1, 1, LossType::Square);
        assert!(train_loop(&mut net, &Dataset::default(), None, &sgd, &cfg).is_err());
    }

    #[test]
    fn rejects_bad_learning_and_penalty_rates() {
        let data = xor_data();
        let cfg = TrainConfig::new(1, 1, LossType::Square).with_seed(1);
        for lr in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let mut net = xor_net();
            let before = net.clone();
            let err = train_loop(&mut net, &data, None, &Sgd::new(lr), &cfg).unwrap_err();
            assert!(matches!(err, NetError::InvalidConfig(_)), "learning rate {lr}");
            assert_eq!(net, before);
        }

        let mut net = xor_net();
        let sgd = Sgd::new(0.1).with_regularization(Regularization::L2, f64::NAN);
        assert!(matches!(train_loop(&mut net, &data, None, &sgd, &cfg), Err(NetError::InvalidConfig(_))));
    }

    #[test]
    fn surfaces_size_mismatch_from_samples() {
        let mut net = xor_net();
        let data = Dataset::new(vec![vec![1.0, 2.0, 3.0]], vec![vec![1.0]]).unwrap();
        let cfg = TrainConfig::new(1, 1, LossType::Square).with_seed(1);
        let err = train_loop(&mut net, &data, None, &Sgd::new(0.1), &cfg).unwrap_err();
        assert!(matches!(err, NetError::SizeMismatch { what: "input", .. }));
    }

    #[test]
    fn learns_xor() {
        let mut net = xor_net();
        let data = xor_data();
        let before = evaluate_loss(&mut net, &data, LossType::Square).unwrap();
        let cfg = TrainConfig::new(3000, 1, LossType::Square).with_seed(42);
        let history = train_loop(&mut net, &data, Some(&data), &Sgd::new(0.5), &cfg).unwrap();
        assert_eq!(history.len(), 3000);
        let after = history.last().and_then(|s| s.test_loss).unwrap();
        assert!(after < before * 0.25, "before={before} after={after}");
        assert!(history[0].test_accuracy.is_none());
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let data = xor_data();
        let cfg = TrainConfig::new(20, 2, LossType::Square).with_seed(9);
        let mut a = xor_net();
        let mut b = xor_net();
        let ha = train_loop(&mut a, &data, None, &Sgd::new(0.3), &cfg).unwrap();
        let hb = train_loop(&mut b, &data, None, &Sgd::new(0.3), &cfg).unwrap();
        let la: Vec<f64> = ha.iter().map(|s| s.train_loss).collect();
        let lb: Vec<f64> = hb.iter().map(|s| s.train_loss).collect();
        assert_eq!(la, lb);
        assert_eq!(a.links(), b.links());
    }

    #[test]
    fn partial_batches_leave_no_pending_gradients() {
        let mut net = xor_net();
        let data = xor_data();
        let cfg = TrainConfig::new(2, 3, LossType::Square).with_seed(5);
        train_loop(&mut net, &data, None, &Sgd::new(0.1), &cfg).unwrap();
        assert_eq!(net.pending_gradients(), 0);
    }

    #[test]
    fn stop_flag_and_dropped_receiver_end_early() {
        let data = xor_data();
        let mut net = xor_net();

        let flag = Arc::new(AtomicBool::new(true));
        let mut cfg = TrainConfig::new(10, 1, LossType::Square).with_seed(1);
        cfg.stop_flag = Some(flag);
        let history = train_loop(&mut net, &data, None, &Sgd::new(0.1), &cfg).unwrap();
        assert!(history.is_empty());

        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut cfg = TrainConfig::new(10, 1, LossType::Square).with_seed(1);
        cfg.progress_tx = Some(tx);
        let history = train_loop(&mut net, &data, None, &Sgd::new(0.1), &cfg).unwrap();
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn accuracy_uses_argmax() {
        let mut net = NetworkBuilder::new(&[2, 2], ActivationFunction::Identity, ActivationFunction::Identity)
            .init_zero(true)
            .build()
            .unwrap();
        // Identity map: output[i] = input[i].
        for link in net.links_mut() {
            link.weight = if link.source().index == link.dest().index { 1.0 } else { 0.0 };
        }
        let data = Dataset::new(
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]],
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0]],
        )
        .unwrap();
        let acc = accuracy(&mut net, &data).unwrap();
        assert!((acc - 2.0 / 3.0).abs() < 1e-12);
    }
}
