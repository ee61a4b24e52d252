pub mod mse;
pub mod loss_type;

pub use mse::SquareLoss;
pub use loss_type::LossType;
