pub mod error;
pub mod activation;
pub mod loss;
pub mod regularization;
pub mod init;
pub mod network;
pub mod optim;
pub mod train;
pub mod session;
pub mod data;

// Convenience re-exports
pub use error::{NetError, Result};
pub use activation::activation::ActivationFunction;
pub use loss::loss_type::LossType;
pub use loss::mse::SquareLoss;
pub use regularization::regularization::Regularization;
pub use init::bias::BiasInit;
pub use network::{Link, Network, NetworkBuilder, Node, NodeRef, Penalty};
pub use optim::sgd::Sgd;
pub use train::{evaluate_loss, accuracy, train_loop, EpochStats, TrainConfig};
pub use session::{BuildRequest, RunReport, Session};
pub use data::Dataset;
