//! Min-max scaling between price space and model space

/// Linear map of `[min, max]` onto `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    min: f64,
    max: f64,
}

impl Normalizer {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Fit to the extremes of `values`; `None` for an empty slice
    pub fn fit(values: &[f64]) -> Option<Self> {
        let mut iter = values.iter().copied();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        Some(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of the range; a flat range counts as 1
    pub fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            1.0
        } else {
            range
        }
    }

    pub fn normalize(&self, values: &[f64]) -> Vec<f64> {
        normalize(values, self.min, self.max)
    }

    pub fn denormalize(&self, values: &[f64]) -> Vec<f64> {
        denormalize(values, self.min, self.max)
    }
}

/// Rescale `values` from `[min, max]` to `[0, 1]`
pub fn normalize(values: &[f64], min: f64, max: f64) -> Vec<f64> {
    let range = Normalizer::new(min, max).range();
    values.iter().map(|v| (v - min) / range).collect()
}

/// Map model-space values back to prices
pub fn denormalize(values: &[f64], min: f64, max: f64) -> Vec<f64> {
    let range = Normalizer::new(min, max).range();
    values.iter().map(|v| v * range + min).collect()
}
