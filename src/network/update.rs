use log::debug;

use crate::network::network::Network;
use crate::regularization::regularization::Regularization;

/// A weight penalty and its rate, applied after the gradient step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penalty {
    pub kind: Regularization,
    pub rate: f64,
}

impl Network {
    /// Applies the averaged accumulated gradients:
    /// `param -= learning_rate × acc_grad / grad_count`, then clears both.
    /// Parameters with a zero count are left alone.
    pub fn update(&mut self, learning_rate: f64) {
        self.update_with_penalty(learning_rate, None);
    }

    /// `update` followed by a regularization step on every weight that was
    /// just updated: `w' = w - learning_rate × rate × penalty'(w)`.
    ///
    /// Under L1 a step that would carry the weight across zero pins it to 0
    /// and marks the link dead.
    pub fn update_with_penalty(&mut self, learning_rate: f64, penalty: Option<Penalty>) {
        let mut biases = 0usize;
        for node in self.layers.iter_mut().skip(1).flatten() {
            if node.grad_count == 0 {
                continue;
            }
            node.bias -= learning_rate * (node.acc_grad / node.grad_count as f64);
            node.acc_grad = 0.0;
            node.grad_count = 0;
            biases += 1;
        }

        let mut weights = 0usize;
        let mut killed = 0usize;
        for link in self.links.iter_mut() {
            if link.grad_count == 0 {
                continue;
            }
            link.weight -= learning_rate * (link.acc_grad / link.grad_count as f64);
            link.acc_grad = 0.0;
            link.grad_count = 0;
            weights += 1;

            if let Some(Penalty { kind, rate }) = penalty {
                let stepped = link.weight - learning_rate * rate * kind.derivative(link.weight);
                match kind {
                    Regularization::L1 if link.weight * stepped < 0.0 => {
                        link.weight = 0.0;
                        link.dead = true;
                        killed += 1;
                    }
                    _ => link.weight = stepped,
                }
            }
        }

        debug!("update lr={learning_rate} biases={biases} weights={weights} dead_links={killed}");
    }

    /// Number of parameters with gradients waiting for an update.
    pub fn pending_gradients(&self) -> usize {
        let nodes = self.layers.iter().flatten().filter(|n| n.grad_count > 0).count();
        let links = self.links.iter().filter(|l| l.grad_count > 0).count();
        nodes + links
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::loss::loss_type::LossType;
    use crate::network::builder::NetworkBuilder;
    use crate::network::node::NodeRef;

    fn seeded(shape: &[usize]) -> Network {
        NetworkBuilder::new(shape, ActivationFunction::Tanh, ActivationFunction::Sigmoid)
            .seed(4)
            .build()
            .unwrap()
    }

    #[test]
    fn update_without_gradients_is_a_no_op() {
        let mut net = seeded(&[3, 5, 2]);
        let before = net.clone();
        net.update(0.3);
        assert_eq!(net, before);
        net.forward(&[1.0, 2.0, 3.0]).unwrap();
        let after_forward = net.clone();
        net.update(0.3);
        assert_eq!(net, after_forward);
    }

    #[test]
    fn single_sample_step_is_exact() {
        let mut net = seeded(&[3, 4, 2]);
        net.forward(&[0.2, -0.4, 0.6]).unwrap();
        net.backward(&[0.0, 1.0], LossType::Square).unwrap();
        let before = net.clone();
        let lr = 0.25;
        net.update(lr);

        for (k, layer) in before.layers().iter().enumerate().skip(1) {
            for (j, node) in layer.iter().enumerate() {
                let updated = net.node(NodeRef::new(k, j)).unwrap();
                assert_eq!(updated.bias, node.bias - lr * (node.der_z / 1.0));
                assert_eq!(updated.grad_count, 0);
                assert_eq!(updated.acc_grad, 0.0);
            }
        }
        for (old, new) in before.links().iter().zip(net.links()) {
            let source_output = before.node(old.source()).unwrap().output;
            let dest_der_z = before.node(old.dest()).unwrap().der_z;
            assert_eq!(new.weight, old.weight - lr * (dest_der_z * source_output));
            assert_eq!(new.grad_count, 0);
        }
    }

    #[test]
    fn minibatch_update_applies_mean_gradient() {
        let samples: [(&[f64], &[f64]); 3] = [
            (&[0.1, 0.9], &[1.0]),
            (&[-0.5, 0.3], &[0.0]),
            (&[0.7, -0.2], &[1.0]),
        ];
        let base = seeded(&[2, 3, 1]);
        let lr = 0.5;

        let mut link_grads = vec![0.0; base.links().len()];
        let mut bias_grads = vec![vec![0.0; 3], vec![0.0; 1]];
        for (x, y) in samples {
            let mut probe = base.clone();
            probe.forward(x).unwrap();
            probe.backward(y, LossType::Square).unwrap();
            for (acc, link) in link_grads.iter_mut().zip(probe.links()) {
                *acc += link.der;
            }
            for k in 1..3 {
                for (acc, node) in bias_grads[k - 1].iter_mut().zip(&probe.layers()[k]) {
                    *acc += node.der_z;
                }
            }
        }

        let mut net = base.clone();
        for (x, y) in samples {
            net.forward(x).unwrap();
            net.backward(y, LossType::Square).unwrap();
        }
        net.update(lr);

        for ((new, old), g) in net.links().iter().zip(base.links()).zip(&link_grads) {
            assert_relative_eq!(new.weight, old.weight - lr * g / 3.0, epsilon = 1e-12);
        }
        for k in 1..3 {
            for (j, g) in bias_grads[k - 1].iter().enumerate() {
                let at = NodeRef::new(k, j);
                let expected = base.node(at).unwrap().bias - lr * g / 3.0;
                assert_relative_eq!(net.node(at).unwrap().bias, expected, epsilon = 1e-12);
            }
        }
        assert_eq!(net.pending_gradients(), 0);
    }

    #[test]
    fn l2_penalty_shrinks_weights_towards_zero() {
        let mut net = seeded(&[2, 2, 1]);
        net.forward(&[0.0, 0.0]).unwrap();
        net.backward(&[0.5], LossType::Square).unwrap();
        let before = net.clone();
        let lr = 0.1;
        let rate = 0.5;
        net.update_with_penalty(lr, Some(Penalty { kind: Regularization::L2, rate }));
        let mut plain = before.clone();
        plain.update(lr);
        for (reg, pl) in net.links().iter().zip(plain.links()) {
            assert_relative_eq!(reg.weight, pl.weight * (1.0 - lr * rate), epsilon = 1e-15);
            assert!(!reg.dead);
        }
    }

    #[test]
    fn l1_crossing_zero_kills_the_link() {
        let mut net = NetworkBuilder::new(&[1, 1], ActivationFunction::Identity, ActivationFunction::Identity)
            .init_zero(true)
            .build()
            .unwrap();
        net.link_mut(0).unwrap().weight = 0.01;
        // Zero input: the loss gradient on the weight is 0, only the penalty acts.
        net.forward(&[0.0]).unwrap();
        net.backward(&[0.0], LossType::Square).unwrap();
        net.update_with_penalty(1.0, Some(Penalty { kind: Regularization::L1, rate: 1.0 }));
        let link = &net.links()[0];
        assert_eq!(link.weight, 0.0);
        assert!(link.dead);

        // Dead links stop collecting gradients.
        net.forward(&[1.0]).unwrap();
        net.backward(&[5.0], LossType::Square).unwrap();
        assert_eq!(net.links()[0].grad_count, 0);
        net.update(1.0);
        assert_eq!(net.links()[0].weight, 0.0);
    }

    #[test]
    fn l1_small_step_keeps_sign() {
        let mut net = NetworkBuilder::new(&[1, 1], ActivationFunction::Identity, ActivationFunction::Identity)
            .init_zero(true)
            .build()
            .unwrap();
        net.link_mut(0).unwrap().weight = -0.4;
        net.forward(&[0.0]).unwrap();
        net.backward(&[0.0], LossType::Square).unwrap();
        net.update_with_penalty(0.1, Some(Penalty { kind: Regularization::L1, rate: 1.0 }));
        assert_relative_eq!(net.links()[0].weight, -0.3, epsilon = 1e-15);
        assert!(!net.links()[0].dead);
    }
}
