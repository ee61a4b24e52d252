pub mod dataset;
pub mod csv;
pub mod synthetic;

pub use dataset::{Dataset, DatasetError};
