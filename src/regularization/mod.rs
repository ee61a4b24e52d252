pub mod regularization;

pub use regularization::Regularization;
