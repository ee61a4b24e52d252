use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;

/// Address of a node: its layer and its position within that layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub layer: usize,
    pub index: usize,
}

impl NodeRef {
    pub fn new(layer: usize, index: usize) -> Self {
        NodeRef { layer, index }
    }
}

/// A neuron. Links are referenced by their index in the network's link arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Diagnostic only; never used for addressing.
    pub id: String,
    pub bias: f64,
    pub activation: ActivationFunction,
    /// Pre-activation weighted sum from the last forward pass.
    pub total_input: f64,
    pub output: f64,
    /// ∂loss/∂output from the last backward pass.
    pub der_a: f64,
    /// ∂loss/∂total_input from the last backward pass.
    pub der_z: f64,
    /// Sum of bias gradients since the last update.
    pub acc_grad: f64,
    pub grad_count: usize,
    pub(crate) inputs: Vec<usize>,
    pub(crate) outputs: Vec<usize>,
}

impl Node {
    pub(crate) fn new(id: String, activation: ActivationFunction) -> Node {
        Node {
            id,
            bias: 0.0,
            activation,
            total_input: 0.0,
            output: 0.0,
            der_a: 0.0,
            der_z: 0.0,
            acc_grad: 0.0,
            grad_count: 0,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Indices of incoming links, ordered by source position.
    pub fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    /// Indices of outgoing links, ordered by destination position.
    pub fn outputs(&self) -> &[usize] {
        &self.outputs
    }

    pub fn fan_in(&self) -> usize {
        self.inputs.len()
    }
}

/// A weighted connection between two nodes in adjacent layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// `"<source id> -> <dest id>"`, diagnostic only.
    pub id: String,
    pub weight: f64,
    /// Weight gradient from the last backward pass.
    pub der: f64,
    pub acc_grad: f64,
    pub grad_count: usize,
    /// Set when an L1 step drives the weight across zero; a dead link keeps
    /// its place in the topology with weight 0 and takes no further gradients.
    pub dead: bool,
    pub(crate) source: NodeRef,
    pub(crate) dest: NodeRef,
}

impl Link {
    pub(crate) fn new(id: String, source: NodeRef, dest: NodeRef, weight: f64) -> Link {
        Link {
            id,
            weight,
            der: 0.0,
            acc_grad: 0.0,
            grad_count: 0,
            dead: false,
            source,
            dest,
        }
    }

    pub fn source(&self) -> NodeRef {
        self.source
    }

    pub fn dest(&self) -> NodeRef {
        self.dest
    }
}
