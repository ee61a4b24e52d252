use std::fmt;

/// The result type used across the engine.
pub type Result<T> = std::result::Result<T, NetError>;

/// Errors surfaced by the engine. Both kinds are caller bugs, never transient.
#[derive(Debug, Clone, PartialEq)]
pub enum NetError {
    /// A vector handed to the network does not match the width of the layer
    /// it feeds (`what` names the vector, e.g. "input" or "label").
    SizeMismatch {
        what: &'static str,
        got: usize,
        expected: usize,
    },
    /// A build request that cannot produce a network: short shape, zero
    /// width, unknown registry name, bad hyperparameter.
    InvalidConfig(String),
}

impl NetError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        NetError::InvalidConfig(msg.into())
    }
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::SizeMismatch { what, got, expected } => {
                write!(f, "size mismatch for {what}: got {got}, expected {expected}")
            }
            NetError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for NetError {}
