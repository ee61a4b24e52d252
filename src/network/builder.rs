use log::debug;
use rand::{distributions::Uniform, rngs::StdRng, Rng, SeedableRng};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::init::bias::BiasInit;
use crate::network::network::Network;
use crate::network::node::{Link, Node, NodeRef};

/// Builds a fully connected layered network from a shape such as
/// `[784, 128, 10]` (input width first, output width last).
///
/// ```
/// use linknet::{ActivationFunction, NetworkBuilder};
///
/// let net = NetworkBuilder::new(&[2, 3, 1], ActivationFunction::ReLU, ActivationFunction::Sigmoid)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(net.shape(), vec![2, 3, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    shape: Vec<usize>,
    activation: ActivationFunction,
    output_activation: ActivationFunction,
    bias_init: BiasInit,
    init_zero: bool,
    seed: Option<u64>,
}

impl NetworkBuilder {
    pub fn new(
        shape: &[usize],
        activation: ActivationFunction,
        output_activation: ActivationFunction,
    ) -> NetworkBuilder {
        NetworkBuilder {
            shape: shape.to_vec(),
            activation,
            output_activation,
            bias_init: BiasInit::He,
            init_zero: false,
            seed: None,
        }
    }

    /// Bias strategy for every non-input layer. Input nodes always get zero.
    pub fn bias_init(mut self, bias_init: BiasInit) -> Self {
        self.bias_init = bias_init;
        self
    }

    /// Start every weight and bias at exactly 0.
    pub fn init_zero(mut self, init_zero: bool) -> Self {
        self.init_zero = init_zero;
        self
    }

    /// Seed for weight and bias draws; without one the build uses entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(&self) -> Result<Network> {
        validate_shape(&self.shape)?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let weights = Uniform::new(-0.5, 0.5);
        let last = self.shape.len() - 1;

        let mut layers: Vec<Vec<Node>> = Vec::with_capacity(self.shape.len());
        let mut links: Vec<Link> = Vec::new();
        let mut next_id = 1usize;

        let input_layer = (0..self.shape[0])
            .map(|_| {
                let mut node = Node::new(next_id.to_string(), self.activation);
                next_id += 1;
                node.bias = BiasInit::Zero.generate(0, &mut rng);
                node
            })
            .collect();
        layers.push(input_layer);

        for layer_idx in 1..self.shape.len() {
            let activation = if layer_idx == last { self.output_activation } else { self.activation };
            let mut layer = Vec::with_capacity(self.shape[layer_idx]);

            for node_idx in 0..self.shape[layer_idx] {
                let mut node = Node::new(next_id.to_string(), activation);
                next_id += 1;
                let dest = NodeRef::new(layer_idx, node_idx);

                for (src_idx, prev) in layers[layer_idx - 1].iter_mut().enumerate() {
                    let weight = if self.init_zero { 0.0 } else { rng.sample(&weights) };
                    let link_idx = links.len();
                    links.push(Link::new(
                        format!("{} -> {}", prev.id, node.id),
                        NodeRef::new(layer_idx - 1, src_idx),
                        dest,
                        weight,
                    ));
                    node.inputs.push(link_idx);
                    prev.outputs.push(link_idx);
                }

                node.bias = if self.init_zero {
                    0.0
                } else {
                    self.bias_init.generate(node.fan_in(), &mut rng)
                };
                layer.push(node);
            }
            layers.push(layer);
        }

        debug!(
            "built network shape={:?} links={} activation={} output_activation={}",
            self.shape,
            links.len(),
            self.activation.name(),
            self.output_activation.name()
        );

        Ok(Network::from_parts(layers, links))
    }
}

fn validate_shape(shape: &[usize]) -> Result<()> {
    if shape.len() < 2 {
        return Err(NetError::config(format!(
            "shape needs at least 2 layers, got {}",
            shape.len()
        )));
    }
    if let Some(pos) = shape.iter().position(|&w| w == 0) {
        return Err(NetError::config(format!("layer {pos} has width 0")));
    }
    Ok(())
}
