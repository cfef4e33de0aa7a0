//! Pearson correlation and the cross-commodity correlation matrix

use serde::{Deserialize, Serialize};

/// Minimum paired observations for a meaningful coefficient
const MIN_PAIRS: usize = 3;

/// Pearson correlation over the first `min(len(a), len(b))` pairs
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n < MIN_PAIRS {
        return 0.0;
    }

    let (a, b) = (&a[..n], &b[..n]);
    let mean_a = super::mean(a);
    let mean_b = super::mean(b);

    let mut numerator = 0.0;
    let mut denom_a = 0.0;
    let mut denom_b = 0.0;

    for (x, y) in a.iter().zip(b) {
        let da = x - mean_a;
        let db = y - mean_b;
        numerator += da * db;
        denom_a += da * da;
        denom_b += db * db;
    }

    let denominator = (denom_a * denom_b).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    let r = numerator / denominator;
    if r.is_finite() {
        r.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// Qualitative reading of a coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    StrongPositive,
    ModeratePositive,
    WeakPositive,
    None,
    WeakNegative,
    ModerateNegative,
    StrongNegative,
}

impl CorrelationStrength {
    pub fn classify(value: f64) -> Self {
        match value {
            v if v >= 0.7 => CorrelationStrength::StrongPositive,
            v if v >= 0.4 => CorrelationStrength::ModeratePositive,
            v if v >= 0.1 => CorrelationStrength::WeakPositive,
            v if v >= -0.1 => CorrelationStrength::None,
            v if v >= -0.4 => CorrelationStrength::WeakNegative,
            v if v >= -0.7 => CorrelationStrength::ModerateNegative,
            _ => CorrelationStrength::StrongNegative,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CorrelationStrength::StrongPositive => "Strong positive",
            CorrelationStrength::ModeratePositive => "Moderate positive",
            CorrelationStrength::WeakPositive => "Weak positive",
            CorrelationStrength::None => "No correlation",
            CorrelationStrength::WeakNegative => "Weak negative",
            CorrelationStrength::ModerateNegative => "Moderate negative",
            CorrelationStrength::StrongNegative => "Strong negative",
        }
    }
}

/// One cell of the heatmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCell {
    pub row: String,
    pub column: String,
    /// Rounded to two decimals
    pub correlation: f64,
    pub strength: CorrelationStrength,
}

/// Correlation for every ordered pair; the diagonal is exactly 1
pub fn correlation_matrix<S: AsRef<str>>(series: &[(S, Vec<f64>)]) -> Vec<CorrelationCell> {
    let mut cells = Vec::with_capacity(series.len() * series.len());

    for (i, (row, a)) in series.iter().enumerate() {
        for (j, (column, b)) in series.iter().enumerate() {
            let value = if i == j { 1.0 } else { correlation(a, b) };
            let rounded = (value * 100.0).round() / 100.0;
            cells.push(CorrelationCell {
                row: row.as_ref().to_string(),
                column: column.as_ref().to_string(),
                correlation: rounded,
                strength: CorrelationStrength::classify(rounded),
            });
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(n: usize, phase: f64) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.7 + phase).sin() * 10.0).collect()
    }

    #[test]
    fn test_self_correlation_is_one() {
        let a = wave(20, 0.0);
        assert!((correlation(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_symmetry() {
        let a = wave(25, 0.0);
        let b = wave(30, 1.3);
        assert_eq!(correlation(&a, &b), correlation(&b, &a));
    }

    #[test]
    fn test_perfect_negative() {
        let a = vec![1.0, 2.0, 3.0, 4.0];
        let b = vec![8.0, 6.0, 4.0, 2.0];
        assert!((correlation(&a, &b) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_bounds() {
        for phase in [0.0, 0.5, 1.0, 2.0, 3.14] {
            let r = correlation(&wave(15, 0.0), &wave(15, phase));
            assert!((-1.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn test_insufficient_pairs() {
        assert_eq!(correlation(&[1.0, 2.0], &[2.0, 4.0]), 0.0);
        assert_eq!(correlation(&[1.0, 2.0, 3.0], &[5.0, 6.0]), 0.0);
    }

    #[test]
    fn test_zero_variance() {
        assert_eq!(correlation(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_uses_shortest_prefix() {
        let a = vec![1.0, 2.0, 3.0, 100.0, -50.0];
        let b = vec![2.0, 4.0, 6.0];
        assert!((correlation(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_strength_labels() {
        assert_eq!(CorrelationStrength::classify(0.85), CorrelationStrength::StrongPositive);
        assert_eq!(CorrelationStrength::classify(0.4), CorrelationStrength::ModeratePositive);
        assert_eq!(CorrelationStrength::classify(0.0), CorrelationStrength::None);
        assert_eq!(CorrelationStrength::classify(-0.3), CorrelationStrength::WeakNegative);
        assert_eq!(CorrelationStrength::classify(-0.9), CorrelationStrength::StrongNegative);
        assert_eq!(CorrelationStrength::StrongNegative.label(), "Strong negative");
    }

    #[test]
    fn test_correlation_matrix() {
        let series = vec![
            ("wheat", vec![1.0, 2.0, 3.0, 4.0]),
            ("rice", vec![2.0, 4.0, 6.0, 8.0]),
            ("onion", vec![4.0, 3.0, 2.0, 1.0]),
        ];
        let cells = correlation_matrix(&series);
        assert_eq!(cells.len(), 9);

        let diag: Vec<_> = cells.iter().filter(|c| c.row == c.column).collect();
        assert!(diag.iter().all(|c| c.correlation == 1.0));

        let wheat_onion = cells
            .iter()
            .find(|c| c.row == "wheat" && c.column == "onion")
            .unwrap();
        assert_eq!(wheat_onion.correlation, -1.0);
        assert_eq!(wheat_onion.strength, CorrelationStrength::StrongNegative);
    }
}
