pub mod node;
pub mod network;
pub mod builder;
pub mod propagation;
pub mod update;

pub use node::{Link, Node, NodeRef};
pub use network::Network;
pub use builder::NetworkBuilder;
pub use update::Penalty;
