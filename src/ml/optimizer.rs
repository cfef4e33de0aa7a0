//! Adam optimizer

use super::network::{Gradients, Network};

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const EPSILON: f64 = 1e-7;

/// Adam with bias-corrected first and second moment estimates
#[derive(Debug, Clone)]
pub struct Adam {
    learning_rate: f64,
    step: i32,
    m: Gradients,
    v: Gradients,
}

impl Adam {
    pub fn new(learning_rate: f64, network: &Network) -> Self {
        Self {
            learning_rate,
            step: 0,
            m: Gradients::zeros(network),
            v: Gradients::zeros(network),
        }
    }

    pub fn steps(&self) -> i32 {
        self.step
    }

    /// Apply one update to every parameter of `network`
    pub fn apply(&mut self, network: &mut Network, grads: &Gradients) {
        self.step += 1;
        let correction1 = 1.0 - BETA1.powi(self.step);
        let correction2 = 1.0 - BETA2.powi(self.step);
        let lr = self.learning_rate;

        for (idx, layer) in network.layers.iter_mut().enumerate() {
            update(
                &mut layer.weights,
                &grads.weights[idx],
                &mut self.m.weights[idx],
                &mut self.v.weights[idx],
                lr,
                correction1,
                correction2,
            );
            update(
                &mut layer.biases,
                &grads.biases[idx],
                &mut self.m.biases[idx],
                &mut self.v.biases[idx],
                lr,
                correction1,
                correction2,
            );
        }
    }
}

fn update(
    params: &mut [f64],
    grads: &[f64],
    m: &mut [f64],
    v: &mut [f64],
    lr: f64,
    correction1: f64,
    correction2: f64,
) {
    for i in 0..params.len() {
        let g = grads[i];
        m[i] = BETA1 * m[i] + (1.0 - BETA1) * g;
        v[i] = BETA2 * v[i] + (1.0 - BETA2) * g * g;
        let m_hat = m[i] / correction1;
        let v_hat = v[i] / correction2;
        params[i] -= lr * m_hat / (v_hat.sqrt() + EPSILON);
    }
}
