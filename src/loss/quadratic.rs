/// Quadratic cost `C = ½‖ŷ − y‖²`, paired with the sigmoid output layer.
pub struct QuadraticLoss;

impl QuadraticLoss {
    /// Scalar cost for one sample.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        0.5 * predicted
            .iter()
            .zip(expected.iter())
            .map(|(a, y)| (a - y).powi(2))
            .sum::<f64>()
    }

    /// Per-output gradient ∂C/∂ŷ = ŷ − y.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter()).map(|(a, y)| a - y).collect()
    }
}
