use crate::error::{NetError, Result};
use crate::loss::loss_type::LossType;
use crate::network::network::Network;
use crate::network::node::Node;

impl Network {
    /// Forward pass for one sample; returns the output layer.
    ///
    /// Input nodes take the values verbatim. Every later layer computes
    /// `total_input = bias + Σ weight × source.output` and applies its
    /// activation, strictly after the previous layer is done.
    pub fn forward(&mut self, inputs: &[f64]) -> Result<&[Node]> {
        let expected = self.input_width();
        if inputs.len() != expected {
            return Err(NetError::SizeMismatch { what: "input", got: inputs.len(), expected });
        }

        for (node, &x) in self.layers[0].iter_mut().zip(inputs) {
            node.output = x;
        }

        for i in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(i);
            let prev = &done[i - 1];
            for node in rest[0].iter_mut() {
                let mut total = node.bias;
                for &l in &node.inputs {
                    let link = &self.links[l];
                    total += link.weight * prev[link.source.index].output;
                }
                node.total_input = total;
                node.output = node.activation.output(total);
            }
        }

        Ok(self.output_layer())
    }

    /// Backward pass for one labelled sample, against the values cached by
    /// the last `forward`.
    ///
    /// Gradients are *added* to each node's and link's accumulator, and each
    /// touched count goes up by one; nothing is applied until `update`.
    pub fn backward(&mut self, labels: &[f64], loss: LossType) -> Result<()> {
        let last = self.layers.len() - 1;
        let width = self.layers[last].len();
        if labels.len() != width {
            return Err(NetError::SizeMismatch { what: "label", got: labels.len(), expected: width });
        }

        for (node, &label) in self.layers[last].iter_mut().zip(labels) {
            node.der_a = loss.derivative(node.output, label, width);
        }

        for i in (1..=last).rev() {
            let (before, rest) = self.layers.split_at_mut(i);
            let layer = &mut rest[0];

            for node in layer.iter_mut() {
                node.der_z = node.der_a * node.activation.derivative(node.total_input);
                node.acc_grad += node.der_z;
                node.grad_count += 1;
            }

            let prev = &before[i - 1];
            for node in layer.iter() {
                for &l in &node.inputs {
                    let link = &mut self.links[l];
                    if link.dead {
                        continue;
                    }
                    link.der = node.der_z * prev[link.source.index].output;
                    link.acc_grad += link.der;
                    link.grad_count += 1;
                }
            }

            // The input layer has no parameters to reach.
            if i == 1 {
                continue;
            }

            for prev_node in before[i - 1].iter_mut() {
                prev_node.der_a = 0.0;
                for &l in &prev_node.outputs {
                    let link = &self.links[l];
                    prev_node.der_a += layer[link.dest.index].der_z * link.weight;
                }
            }
        }

        Ok(())
    }

    /// Scalar loss of the current prediction against `labels`.
    pub fn loss(&self, labels: &[f64], loss: LossType) -> Result<f64> {
        let width = self.output_width();
        if labels.len() != width {
            return Err(NetError::SizeMismatch { what: "label", got: labels.len(), expected: width });
        }
        Ok(loss.total(&self.prediction(), labels))
    }
}
