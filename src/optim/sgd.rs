use crate::{layers::dense::Layer, network::gradients::LayerGradient};

/// Plain mini-batch stochastic gradient descent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update from gradients summed over `batch_len` samples:
    /// `W -= (η / batch_len) · ΣgW`, same for the biases.
    pub fn step(&self, layer: &mut Layer, summed: &LayerGradient, batch_len: usize) {
        if batch_len == 0 {
            return;
        }
        layer.apply_gradients(summed, self.learning_rate / batch_len as f64);
    }
}
