/// Logistic sigmoid, the activation used by every layer of the network.
///
/// `function` branches on the sign of `z` so that `exp` is only ever called
/// with a non-positive argument: it cannot overflow, and underflow just
/// saturates towards 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sigmoid;

impl Sigmoid {
    pub fn function(z: f64) -> f64 {
        if z >= 0.0 {
            1.0 / (1.0 + (-z).exp())
        } else {
            let e = z.exp();
            e / (1.0 + e)
        }
    }

    /// σ'(z) = σ(z)(1 - σ(z)), evaluated on the pre-activation.
    pub fn derivative(z: f64) -> f64 {
        Sigmoid::derivative_from_output(Sigmoid::function(z))
    }

    /// Same derivative, reusing an already computed activation `a = σ(z)`.
    pub fn derivative_from_output(a: f64) -> f64 {
        a * (1.0 - a)
    }
}

#[cfg(test)]
mod tests {
    use super::Sigmoid;
    use approx::assert_relative_eq;

    #[test]
    fn sigmoid_at_zero_is_half() {
        assert_relative_eq!(Sigmoid::function(0.0), 0.5);
        assert_relative_eq!(Sigmoid::derivative(0.0), 0.25);
    }

    #[test]
    fn sigmoid_matches_naive_formula() {
        for &z in &[-5.0, -1.3, 0.2, 2.5, 8.0] {
            let naive = 1.0 / (1.0 + f64::exp(-z));
            assert_relative_eq!(Sigmoid::function(z), naive, max_relative = 1e-12);
        }
    }

    #[test]
    fn extreme_inputs_stay_finite() {
        let lo = Sigmoid::function(-1000.0);
        let hi = Sigmoid::function(1000.0);
        assert!(lo.is_finite() && lo >= 0.0);
        assert!(hi.is_finite() && hi <= 1.0);
        assert!(Sigmoid::derivative(-1000.0).is_finite());
    }

    #[test]
    fn symmetric_around_origin() {
        assert_relative_eq!(Sigmoid::function(3.0) + Sigmoid::function(-3.0), 1.0, epsilon = 1e-15);
    }
}
