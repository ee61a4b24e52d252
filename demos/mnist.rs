/// MNIST digit classification on the graph engine.
///
/// Architecture: 784 → 128 (ReLU) → 10 (Sigmoid)
/// Loss:         squared error against one-hot labels
/// Optimizer:    SGD, lr = 0.1
/// Batch size:   16
/// Epochs:       5
///
/// Run with:
///   RUST_LOG=info cargo run --example mnist --release -- <train.csv> <test.csv>
///
/// The CSV files use the common `label,pixel0,...,pixel783` layout. Paths can
/// also come from `MNIST_TRAIN` and `MNIST_TEST`. `MNIST_LIMIT` caps the
/// number of training rows, which helps since every link is its own object.

use std::sync::mpsc;

use linknet::data::csv::load_mnist_csv;
use linknet::{accuracy, train_loop, ActivationFunction, LossType, NetworkBuilder, Sgd, TrainConfig};

fn path_arg(position: usize, var: &str, default: &str) -> String {
    std::env::args()
        .nth(position)
        .or_else(|| std::env::var(var).ok())
        .unwrap_or_else(|| default.to_owned())
}

fn main() {
    env_logger::init();

    let train_path = path_arg(1, "MNIST_TRAIN", "mnist_data/mnist_train.csv");
    let test_path = path_arg(2, "MNIST_TEST", "mnist_data/mnist_test.csv");

    println!("Loading MNIST data...");
    let mut train = load_mnist_csv(&train_path, 10)
        .unwrap_or_else(|e| panic!("cannot load training set '{train_path}': {e}"));
    let test = load_mnist_csv(&test_path, 10)
        .unwrap_or_else(|e| panic!("cannot load test set '{test_path}': {e}"));
    if let Some(limit) = std::env::var("MNIST_LIMIT").ok().and_then(|s| s.parse().ok()) {
        train.truncate(limit);
    }
    println!("  Training set: {} samples", train.len());
    println!("  Test set:     {} samples", test.len());

    let mut network = NetworkBuilder::new(&[784, 128, 10], ActivationFunction::ReLU, ActivationFunction::Sigmoid)
        .seed(2024)
        .build()
        .expect("valid shape");

    let before = accuracy(&mut network, &test).expect("test set fits the network");
    println!("Untrained test accuracy: {:.2}%", before * 100.0);

    let (tx, rx) = mpsc::channel();
    let mut config = TrainConfig::new(5, 16, LossType::Square).with_seed(1);
    config.progress_tx = Some(tx);

    let printer = std::thread::spawn(move || {
        for stats in rx {
            println!(
                "Epoch {:>2}/{}  train_loss = {:.5}  test_loss = {:.5}  test_acc = {:.2}%  ({} ms)",
                stats.epoch,
                stats.total_epochs,
                stats.train_loss,
                stats.test_loss.unwrap_or(f64::NAN),
                stats.test_accuracy.unwrap_or(f64::NAN) * 100.0,
                stats.elapsed_ms,
            );
        }
    });

    let history = train_loop(&mut network, &train, Some(&test), &Sgd::new(0.1), &config)
        .expect("training data fits the network");
    drop(config);
    let _ = printer.join();

    if let Some(last) = history.last() {
        println!(
            "Final test accuracy: {:.2}%",
            last.test_accuracy.unwrap_or(0.0) * 100.0
        );
    }

    let out = "trained_models/mnist.json";
    let _ = std::fs::create_dir_all("trained_models");
    match network.save_json(out) {
        Ok(()) => println!("Saved model to {out}"),
        Err(e) => eprintln!("Could not save model: {e}"),
    }
}
