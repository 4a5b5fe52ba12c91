use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;

/// Weight and bias gradients for one layer, shaped like its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradient {
    pub weights: Matrix,
    pub biases: Matrix,
}

impl LayerGradient {
    pub fn zeros_like(layer: &Layer) -> LayerGradient {
        LayerGradient {
            weights: Matrix::zeros(layer.size(), layer.input_size()),
            biases: Matrix::zeros(layer.size(), 1),
        }
    }
}

/// Gradients for every layer, ordered input → output.
///
/// `loss` is the summed quadratic cost of the samples whose gradients were
/// added in; it rides along so an epoch's training loss comes for free.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub layers: Vec<LayerGradient>,
    pub loss: f64,
}

impl Gradients {
    pub fn zeros_like(layers: &[Layer]) -> Gradients {
        Gradients {
            layers: layers.iter().map(LayerGradient::zeros_like).collect(),
            loss: 0.0,
        }
    }

    pub fn accumulate(&mut self, other: &Gradients) {
        debug_assert_eq!(self.layers.len(), other.layers.len());
        for (acc, g) in self.layers.iter_mut().zip(other.layers.iter()) {
            acc.weights += &g.weights;
            acc.biases += &g.biases;
        }
        self.loss += other.loss;
    }

    /// Owned form of `accumulate`, shaped for a parallel reduction.
    pub fn merge(mut self, other: Gradients) -> Gradients {
        self.accumulate(&other);
        self
    }
}
