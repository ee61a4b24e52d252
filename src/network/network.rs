use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::{NetError, Result};
use crate::network::builder::NetworkBuilder;
use crate::network::node::{Link, Node, NodeRef};

/// A layered feed-forward graph.
///
/// Nodes live in per-layer arenas and links in one flat arena; every
/// cross-reference is an index. Topology is fixed once built, only the
/// scalar fields of nodes and links change during training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub(crate) layers: Vec<Vec<Node>>,
    pub(crate) links: Vec<Link>,
}

impl Network {
    /// Builds an unseeded network with He-initialized biases.
    /// Use [`NetworkBuilder`] for seeding and other options.
    pub fn new(
        shape: &[usize],
        activation: ActivationFunction,
        output_activation: ActivationFunction,
    ) -> Result<Network> {
        NetworkBuilder::new(shape, activation, output_activation).build()
    }

    pub(crate) fn from_parts(layers: Vec<Vec<Node>>, links: Vec<Link>) -> Network {
        Network { layers, links }
    }

    pub fn layers(&self) -> &[Vec<Node>] {
        &self.layers
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Mutable access to every link's scalar state.
    pub fn links_mut(&mut self) -> impl Iterator<Item = &mut Link> {
        self.links.iter_mut()
    }

    /// Mutable access to every node's scalar state, input layer first.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.layers.iter_mut().flatten()
    }

    pub fn node(&self, at: NodeRef) -> Option<&Node> {
        self.layers.get(at.layer).and_then(|layer| layer.get(at.index))
    }

    pub fn node_mut(&mut self, at: NodeRef) -> Option<&mut Node> {
        self.layers.get_mut(at.layer).and_then(|layer| layer.get_mut(at.index))
    }

    pub fn link(&self, idx: usize) -> Option<&Link> {
        self.links.get(idx)
    }

    pub fn link_mut(&mut self, idx: usize) -> Option<&mut Link> {
        self.links.get_mut(idx)
    }

    /// Incoming links of a node, in source order.
    pub fn incoming(&self, at: NodeRef) -> impl Iterator<Item = &Link> {
        self.node(at)
            .map(|n| n.inputs.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&l| &self.links[l])
    }

    /// Outgoing links of a node, in destination order.
    pub fn outgoing(&self, at: NodeRef) -> impl Iterator<Item = &Link> {
        self.node(at)
            .map(|n| n.outputs.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&l| &self.links[l])
    }

    pub fn shape(&self) -> Vec<usize> {
        self.layers.iter().map(|layer| layer.len()).collect()
    }

    pub fn input_width(&self) -> usize {
        self.layers[0].len()
    }

    pub fn output_width(&self) -> usize {
        self.output_layer().len()
    }

    pub fn output_layer(&self) -> &[Node] {
        &self.layers[self.layers.len() - 1]
    }

    /// Output values left by the last forward pass.
    pub fn prediction(&self) -> Vec<f64> {
        self.output_layer().iter().map(|n| n.output).collect()
    }

    /// Checks the structural invariants: at least two non-empty layers, a
    /// link-free input layer, and full connectivity between adjacent layers.
    /// Each node's `inputs` and `outputs` must list its links in the order of
    /// the node at the far end, without repeats.
    pub fn validate(&self) -> Result<()> {
        if self.layers.len() < 2 {
            return Err(NetError::config(format!(
                "network needs at least 2 layers, has {}",
                self.layers.len()
            )));
        }
        if let Some(pos) = self.layers.iter().position(|l| l.is_empty()) {
            return Err(NetError::config(format!("layer {pos} is empty")));
        }
        if self.layers[0].iter().any(|n| !n.inputs.is_empty()) {
            return Err(NetError::config("input layer has incoming links"));
        }

        let mut seen_as_input = vec![false; self.links.len()];
        for (k, layer) in self.layers.iter().enumerate().skip(1) {
            let prev_width = self.layers[k - 1].len();
            for (j, node) in layer.iter().enumerate() {
                if node.inputs.len() != prev_width {
                    return Err(NetError::config(format!(
                        "node {} in layer {k} has {} incoming links, expected {prev_width}",
                        node.id,
                        node.inputs.len()
                    )));
                }
                for (i, &l) in node.inputs.iter().enumerate() {
                    let link = self.links.get(l).ok_or_else(|| {
                        NetError::config(format!("node {} refers to missing link {l}", node.id))
                    })?;
                    if link.source != NodeRef::new(k - 1, i) || link.dest != NodeRef::new(k, j) {
                        return Err(NetError::config(format!("link {} has inconsistent endpoints", link.id)));
                    }
                    seen_as_input[l] = true;
                }
            }
        }
        if seen_as_input.iter().any(|seen| !seen) {
            return Err(NetError::config("network contains links outside the layer topology"));
        }

        for (k, layer) in self.layers.iter().enumerate() {
            for (i, node) in layer.iter().enumerate() {
                let expected = self.layers.get(k + 1).map_or(0, |next| next.len());
                if node.outputs.len() != expected {
                    return Err(NetError::config(format!(
                        "node {} in layer {k} has {} outgoing links, expected {expected}",
                        node.id,
                        node.outputs.len()
                    )));
                }
                for (j, &l) in node.outputs.iter().enumerate() {
                    match self.links.get(l) {
                        Some(link) if link.source == NodeRef::new(k, i) && link.dest == NodeRef::new(k + 1, j) => {}
                        _ => {
                            return Err(NetError::config(format!(
                                "outgoing link {j} of node {} does not run from it to node {j} of layer {}",
                                node.id,
                                k + 1
                            )))
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a network previously written by `save_json`, rejecting
    /// files whose topology does not hold together.
    pub fn load_json(path: &str) -> std::io::Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let network: Network = serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        network
            .validate()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn net() -> Network {
        NetworkBuilder::new(&[3, 4, 2], ActivationFunction::Tanh, ActivationFunction::Sigmoid)
            .seed(21)
            .build()
            .unwrap()
    }

    #[test]
    fn built_network_validates() {
        assert_eq!(net().validate(), Ok(()));
    }

    #[test]
    fn validate_catches_tampered_topology() {
        let mut broken = net();
        broken.layers[1][0].inputs.pop();
        assert!(broken.validate().is_err());

        let mut crossed = net();
        crossed.links[0].dest = NodeRef::new(2, 1);
        assert!(crossed.validate().is_err());

        let mut single = net();
        single.layers.truncate(1);
        assert!(single.validate().is_err());
    }

    #[test]
    fn validate_rejects_repeated_outgoing_links() {
        for (shape, layer) in [(&[1, 2, 1][..], 0), (&[1, 2, 2, 1][..], 1)] {
            let mut net = NetworkBuilder::new(shape, ActivationFunction::Tanh, ActivationFunction::Sigmoid)
                .seed(3)
                .build()
                .unwrap();
            let first = net.layers[layer][0].outputs[0];
            net.layers[layer][0].outputs[1] = first;
            assert!(net.validate().is_err(), "shape {shape:?}");
        }

        let mut swapped = net();
        swapped.layers[1][0].outputs.swap(0, 1);
        assert!(swapped.validate().is_err());
    }

    #[test]
    fn incoming_and_outgoing_walk_the_right_links() {
        let net = net();
        let hidden = NodeRef::new(1, 2);
        assert_eq!(net.incoming(hidden).count(), 3);
        assert!(net.incoming(hidden).all(|l| l.dest() == hidden));
        assert_eq!(net.outgoing(hidden).count(), 2);
        assert!(net.outgoing(hidden).all(|l| l.source() == hidden));
        assert_eq!(net.incoming(NodeRef::new(9, 9)).count(), 0);
    }

    #[test]
    fn json_round_trip_preserves_parameters() {
        let original = net();
        let path = std::env::temp_dir().join(format!("linknet-net-{}.json", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        original.save_json(&path).unwrap();
        let loaded = Network::load_json(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.shape(), original.shape());
        assert_eq!(loaded.validate(), Ok(()));
        for (a, b) in loaded.links().iter().zip(original.links()) {
            assert_eq!(a.id, b.id);
            assert_relative_eq!(a.weight, b.weight, epsilon = 1e-12);
        }
        for (a, b) in loaded.layers().iter().flatten().zip(original.layers().iter().flatten()) {
            assert_eq!(a.activation, b.activation);
            assert_relative_eq!(a.bias, b.bias, epsilon = 1e-12);
        }
    }

    #[test]
    fn load_json_rejects_inconsistent_files() {
        let mut broken = net();
        broken.layers[2][1].inputs.clear();
        let path = std::env::temp_dir().join(format!("linknet-broken-{}.json", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        broken.save_json(&path).unwrap();
        let err = Network::load_json(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
