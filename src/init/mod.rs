pub mod bias;

pub use bias::BiasInit;
