use rand::Rng;

use crate::{
    activation::Sigmoid,
    error::{Error, Result},
    math::matrix::Matrix,
    network::gradients::LayerGradient,
};

/// Weights and biases of one transition between consecutive layers.
///
/// `weights` is `size × input_size`, `biases` is `size × 1`. Both are private
/// so the shape invariant checked at construction cannot be broken later.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    weights: Matrix,
    biases: Matrix,
}

impl Layer {
    /// He-initialized weights, zero biases.
    pub fn new<R: Rng + ?Sized>(input_size: usize, size: usize, rng: &mut R) -> Layer {
        Layer {
            weights: Matrix::he(size, input_size, rng),
            biases: Matrix::zeros(size, 1),
        }
    }

    /// Builds a layer from explicit parameters.
    pub fn from_parameters(weights: Matrix, biases: Matrix) -> Result<Layer> {
        if weights.rows == 0 || weights.cols == 0 {
            return Err(Error::config(format!(
                "layer weights must be non-empty, got {}x{}",
                weights.rows, weights.cols
            )));
        }
        if biases.cols != 1 || biases.rows != weights.rows {
            return Err(Error::config(format!(
                "bias shape {}x{} does not match weight shape {}x{} (expected {}x1)",
                biases.rows, biases.cols, weights.rows, weights.cols, weights.rows
            )));
        }
        Ok(Layer { weights, biases })
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &Matrix {
        &self.biases
    }

    pub fn input_size(&self) -> usize {
        self.weights.cols
    }

    pub fn size(&self) -> usize {
        self.weights.rows
    }

    /// Returns `(z, a)` with `z = W·input + b` and `a = σ(z)`.
    pub fn feed_from(&self, input: &Matrix) -> (Matrix, Matrix) {
        let mut z = self.weights.dot(input);
        z += &self.biases;
        let a = z.map(Sigmoid::function);
        (z, a)
    }

    /// Gradients for this layer given its error `delta` (∂C/∂z) and the
    /// activation that fed it.
    pub fn compute_gradients(&self, delta: &Matrix, input: &Matrix) -> LayerGradient {
        LayerGradient {
            weights: delta.outer(input),
            biases: delta.clone(),
        }
    }

    /// Pushes `delta` back through this layer's weights:
    /// `(Wᵀ·δ) ⊙ σ'(z_prev)`.
    pub fn propagate_delta(&self, delta: &Matrix, prev_pre_activation: &Matrix) -> Matrix {
        self.weights
            .transpose_dot(delta)
            .hadamard(&prev_pre_activation.map(Sigmoid::derivative))
    }

    /// `W -= scale·gW`, `b -= scale·gb`.
    pub(crate) fn apply_gradients(&mut self, grad: &LayerGradient, scale: f64) {
        self.weights.sub_scaled(&grad.weights, scale);
        self.biases.sub_scaled(&grad.biases, scale);
    }
}
