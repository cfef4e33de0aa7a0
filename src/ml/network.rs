//! Dense feed-forward regression network
//!
//! Weights live in plain row-major `Vec<f64>` buffers. Training passes keep a
//! per-layer trace (input, pre-activation, dropout mask) so the backward pass
//! can run without recomputing the forward one.

use super::sequence::TrainingSet;
use crate::config::TrainingConfig;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Linear,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Linear => x,
        }
    }

    fn derivative(self, pre: f64) -> f64 {
        match self {
            Activation::Relu => {
                if pre > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Linear => 1.0,
        }
    }
}

/// Fully connected layer
#[derive(Debug, Clone)]
pub struct DenseLayer {
    pub(super) inputs: usize,
    pub(super) outputs: usize,
    /// Row-major `outputs x inputs`
    pub(super) weights: Vec<f64>,
    pub(super) biases: Vec<f64>,
    activation: Activation,
    /// Fraction of outputs zeroed during training
    dropout: f64,
    /// L2 kernel penalty
    l2: f64,
}

impl DenseLayer {
    /// Glorot-uniform kernel, zero biases
    pub fn new<R: Rng + ?Sized>(
        inputs: usize,
        outputs: usize,
        activation: Activation,
        dropout: f64,
        l2: f64,
        rng: &mut R,
    ) -> Self {
        let limit = (6.0 / (inputs + outputs) as f64).sqrt();
        let weights = (0..inputs * outputs)
            .map(|_| rng.random_range(-limit..limit))
            .collect();

        Self {
            inputs,
            outputs,
            weights,
            biases: vec![0.0; outputs],
            activation,
            dropout,
            l2,
        }
    }

    fn pre_activation(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .chunks(self.inputs)
            .zip(&self.biases)
            .map(|(row, b)| row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.pre_activation(input)
            .into_iter()
            .map(|z| self.activation.apply(z))
            .collect()
    }

    fn l2_penalty(&self) -> f64 {
        if self.l2 == 0.0 {
            return 0.0;
        }
        self.l2 * self.weights.iter().map(|w| w * w).sum::<f64>()
    }

    fn is_finite(&self) -> bool {
        self.weights.iter().chain(&self.biases).all(|v| v.is_finite())
    }
}

/// What the backward pass needs from one layer's forward pass
#[derive(Debug)]
pub(super) struct LayerTrace {
    input: Vec<f64>,
    pre: Vec<f64>,
    /// Inverted-dropout multipliers (1.0 where nothing was dropped)
    mask: Vec<f64>,
}

/// Gradient buffers shaped like a network's parameters
#[derive(Debug, Clone)]
pub struct Gradients {
    pub(super) weights: Vec<Vec<f64>>,
    pub(super) biases: Vec<Vec<f64>>,
}

impl Gradients {
    pub fn zeros(network: &Network) -> Self {
        Self {
            weights: network.layers.iter().map(|l| vec![0.0; l.weights.len()]).collect(),
            biases: network.layers.iter().map(|l| vec![0.0; l.biases.len()]).collect(),
        }
    }
}

/// Stack of dense layers ending in a single linear unit
#[derive(Debug, Clone)]
pub struct Network {
    pub(super) layers: Vec<DenseLayer>,
}

impl Network {
    pub fn new<R: Rng + ?Sized>(input_width: usize, config: &TrainingConfig, rng: &mut R) -> Self {
        let mut layers = Vec::with_capacity(config.hidden_units.len() + 1);
        let mut width = input_width;

        for (i, &units) in config.hidden_units.iter().enumerate() {
            let dropout = config.dropout.get(i).copied().unwrap_or(0.0);
            let l2 = config.l2.get(i).copied().unwrap_or(0.0);
            layers.push(DenseLayer::new(width, units, Activation::Relu, dropout, l2, rng));
            width = units;
        }
        layers.push(DenseLayer::new(width, 1, Activation::Linear, 0.0, 0.0, rng));

        Self { layers }
    }

    pub fn input_width(&self) -> usize {
        self.layers.first().map(|l| l.inputs).unwrap_or(0)
    }

    /// Inference pass, dropout disabled
    pub fn predict(&self, input: &[f64]) -> f64 {
        let output = self
            .layers
            .iter()
            .fold(input.to_vec(), |activation, layer| layer.forward(&activation));
        output.first().copied().unwrap_or(f64::NAN)
    }

    /// Mean squared error over a sample set
    pub fn mse(&self, set: &TrainingSet) -> f64 {
        if set.is_empty() {
            return 0.0;
        }
        let total: f64 = set
            .inputs
            .iter()
            .zip(&set.targets)
            .map(|(x, y)| (self.predict(x) - y).powi(2))
            .sum();
        total / set.len() as f64
    }

    pub fn l2_penalty(&self) -> f64 {
        self.layers.iter().map(DenseLayer::l2_penalty).sum()
    }

    pub fn is_finite(&self) -> bool {
        self.layers.iter().all(DenseLayer::is_finite)
    }

    /// Training pass with dropout; returns the output and the trace for `backward`
    pub(super) fn forward_train<R: Rng + ?Sized>(
        &self,
        input: &[f64],
        rng: &mut R,
    ) -> (f64, Vec<LayerTrace>) {
        let mut traces = Vec::with_capacity(self.layers.len());
        let mut activation = input.to_vec();

        for layer in &self.layers {
            let pre = layer.pre_activation(&activation);
            let mask: Vec<f64> = if layer.dropout > 0.0 {
                let keep = 1.0 - layer.dropout;
                (0..layer.outputs)
                    .map(|_| if rng.random::<f64>() < keep { 1.0 / keep } else { 0.0 })
                    .collect()
            } else {
                vec![1.0; layer.outputs]
            };

            let output = pre
                .iter()
                .zip(&mask)
                .map(|(z, m)| layer.activation.apply(*z) * m)
                .collect();

            traces.push(LayerTrace { input: activation, pre, mask });
            activation = output;
        }

        (activation.first().copied().unwrap_or(f64::NAN), traces)
    }

    /// Accumulate parameter gradients given dLoss/dOutput for one sample
    pub(super) fn backward(&self, traces: &[LayerTrace], output_grad: f64, grads: &mut Gradients) {
        let mut upstream = vec![output_grad];

        for (idx, layer) in self.layers.iter().enumerate().rev() {
            let trace = &traces[idx];
            let delta: Vec<f64> = (0..layer.outputs)
                .map(|o| upstream[o] * trace.mask[o] * layer.activation.derivative(trace.pre[o]))
                .collect();

            let weight_grads = &mut grads.weights[idx];
            for (o, d) in delta.iter().enumerate() {
                grads.biases[idx][o] += d;
                let row = &mut weight_grads[o * layer.inputs..(o + 1) * layer.inputs];
                for (g, x) in row.iter_mut().zip(&trace.input) {
                    *g += d * x;
                }
            }

            if idx > 0 {
                let mut next = vec![0.0; layer.inputs];
                for (o, d) in delta.iter().enumerate() {
                    let row = &layer.weights[o * layer.inputs..(o + 1) * layer.inputs];
                    for (n, w) in next.iter_mut().zip(row) {
                        *n += w * d;
                    }
                }
                upstream = next;
            }
        }
    }

    /// Add the derivative of the L2 penalty to the weight gradients
    pub(super) fn add_l2_gradients(&self, grads: &mut Gradients) {
        for (layer, g) in self.layers.iter().zip(grads.weights.iter_mut()) {
            if layer.l2 == 0.0 {
                continue;
            }
            for (gw, w) in g.iter_mut().zip(&layer.weights) {
                *gw += 2.0 * layer.l2 * w;
            }
        }
    }
}
