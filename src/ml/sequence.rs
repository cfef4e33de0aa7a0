//! Sliding-window training pairs

/// Inputs of `window` consecutive values, each paired with the value that follows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
    pub window: usize,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Split off the trailing `fraction` of samples for validation.
    /// Everything stays in the training half when the split would leave it empty.
    pub fn split(&self, fraction: f64) -> (TrainingSet, TrainingSet) {
        let split_at = ((self.len() as f64) * (1.0 - fraction)).floor() as usize;
        if fraction <= 0.0 || split_at == 0 || split_at >= self.len() {
            return (self.clone(), TrainingSet { window: self.window, ..Default::default() });
        }

        let train = TrainingSet {
            inputs: self.inputs[..split_at].to_vec(),
            targets: self.targets[..split_at].to_vec(),
            window: self.window,
        };
        let validation = TrainingSet {
            inputs: self.inputs[split_at..].to_vec(),
            targets: self.targets[split_at..].to_vec(),
            window: self.window,
        };
        (train, validation)
    }
}

/// Slice `series` into `(series[i..i+window], series[i+window])` pairs
pub fn build_sequences(series: &[f64], window: usize) -> TrainingSet {
    if window == 0 || series.len() <= window {
        return TrainingSet { window, ..Default::default() };
    }

    let (inputs, targets): (Vec<Vec<f64>>, Vec<f64>) = series
        .windows(window + 1)
        .map(|w| (w[..window].to_vec(), w[window]))
        .unzip();

    TrainingSet { inputs, targets, window }
}
