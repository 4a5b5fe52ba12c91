use std::borrow::Borrow;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use tracing::trace;

use crate::{
    activation::Sigmoid,
    data::sample::Sample,
    error::{Error, Result},
    layers::dense::Layer,
    loss::quadratic::QuadraticLoss,
    math::{matrix::Matrix, vector::argmax},
    network::gradients::Gradients,
    optim::sgd::Sgd,
    train::{loop_fn::train_loop, summary::TrainSummary, train_config::TrainConfig},
};

/// Everything the backward pass needs from one forward pass.
///
/// `activations` has one entry per layer including the input
/// (`activations[0] == x`); `pre_activations` has one entry per transition.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    pub activations: Vec<Matrix>,
    pub pre_activations: Vec<Matrix>,
}

impl ForwardPass {
    /// Final activation vector.
    pub fn output(&self) -> Vec<f64> {
        self.activations.last().map(Matrix::to_column_vec).unwrap_or_default()
    }
}

/// Fully-connected sigmoid network trained with the quadratic cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layer_sizes: Vec<usize>,
    layers: Vec<Layer>,
}

/// Checks that a topology has at least two layers, none of them empty.
pub fn validate_layer_sizes(layer_sizes: &[usize]) -> Result<()> {
    if layer_sizes.len() < 2 {
        return Err(Error::config(format!(
            "a network needs at least 2 layers (input and output), got {}",
            layer_sizes.len()
        )));
    }
    if let Some(i) = layer_sizes.iter().position(|&n| n == 0) {
        return Err(Error::config(format!("layer {} has size 0; every layer must be positive", i)));
    }
    Ok(())
}

impl Network {
    /// Builds a network with He-initialized weights and zero biases.
    pub fn new<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Result<Network> {
        validate_layer_sizes(layer_sizes)?;
        let layers = layer_sizes
            .windows(2)
            .map(|pair| Layer::new(pair[0], pair[1], &mut *rng))
            .collect();
        Ok(Network {
            layer_sizes: layer_sizes.to_vec(),
            layers,
        })
    }

    /// `new` with a `StdRng` seeded from `seed`.
    pub fn with_seed(layer_sizes: &[usize], seed: u64) -> Result<Network> {
        Network::new(layer_sizes, &mut StdRng::seed_from_u64(seed))
    }

    /// Builds a network from explicit per-layer parameters, input → output.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Network> {
        let first = layers
            .first()
            .ok_or_else(|| Error::config("a network needs at least one layer of parameters"))?;
        let mut layer_sizes = vec![first.input_size()];
        for (i, layer) in layers.iter().enumerate() {
            let expected = layer_sizes[i];
            if layer.input_size() != expected {
                return Err(Error::config(format!(
                    "layer {} expects {} inputs but the previous layer has {} outputs",
                    i,
                    layer.input_size(),
                    expected
                )));
            }
            layer_sizes.push(layer.size());
        }
        Ok(Network { layer_sizes, layers })
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn input_size(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_size(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Parameters of transition `index` (between layer `index` and `index + 1`).
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Fails when a sample's input or target length does not fit the network.
    pub fn check_sample(&self, sample: &Sample) -> Result<()> {
        self.check_input(&sample.input)?;
        self.check_target(&sample.target)
    }

    fn check_input(&self, x: &[f64]) -> Result<()> {
        if x.len() != self.input_size() {
            return Err(Error::config(format!(
                "input has length {} but the network expects {}",
                x.len(),
                self.input_size()
            )));
        }
        Ok(())
    }

    fn check_target(&self, y: &[f64]) -> Result<()> {
        if y.len() != self.output_size() {
            return Err(Error::config(format!(
                "target has length {} but the network produces {}",
                y.len(),
                self.output_size()
            )));
        }
        Ok(())
    }

    /// Forward pass keeping every activation and pre-activation.
    pub fn forward_propagation(&self, x: &[f64]) -> Result<ForwardPass> {
        self.check_input(x)?;
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        activations.push(Matrix::column(x));
        for layer in &self.layers {
            let (z, a) = layer.feed_from(&activations[activations.len() - 1]);
            pre_activations.push(z);
            activations.push(a);
        }
        Ok(ForwardPass {
            activations,
            pre_activations,
        })
    }

    /// Gradient of `½‖ŷ − y‖²` with respect to every weight and bias.
    ///
    /// `pass` must come from `forward_propagation` on this network; its first
    /// activation is the input `x`. Does not touch the parameters.
    pub fn backward_propagation(&self, y: &[f64], pass: &ForwardPass) -> Result<Gradients> {
        self.check_target(y)?;
        let n = self.layers.len();
        if pass.activations.len() != n + 1 || pass.pre_activations.len() != n {
            return Err(Error::config(format!(
                "forward pass has {} activations and {} pre-activations, expected {} and {}",
                pass.activations.len(),
                pass.pre_activations.len(),
                n + 1,
                n
            )));
        }

        let output = pass.output();
        let loss = QuadraticLoss::loss(&output, y);

        // δ_L = (a_L − y) ⊙ σ'(z_L)
        let mut delta = Matrix::column(&QuadraticLoss::derivative(&output, y))
            .hadamard(&pass.pre_activations[n - 1].map(Sigmoid::derivative));

        let mut layers = Vec::with_capacity(n);
        for i in (0..n).rev() {
            let layer = &self.layers[i];
            layers.push(layer.compute_gradients(&delta, &pass.activations[i]));
            if i > 0 {
                delta = layer.propagate_delta(&delta, &pass.pre_activations[i - 1]);
            }
        }
        layers.reverse();

        Ok(Gradients { layers, loss })
    }

    /// One forward and one backward pass for a single sample.
    pub fn sample_gradients(&self, sample: &Sample) -> Result<Gradients> {
        let pass = self.forward_propagation(&sample.input)?;
        self.backward_propagation(&sample.target, &pass)
    }

    /// Gradients summed over a batch, one sample after another.
    pub fn batch_gradients<S: Borrow<Sample>>(&self, batch: &[S]) -> Result<Gradients> {
        let mut acc = Gradients::zeros_like(&self.layers);
        for sample in batch {
            let sample: &Sample = sample.borrow();
            acc.accumulate(&self.sample_gradients(sample)?);
        }
        Ok(acc)
    }

    /// Gradients summed over a batch, samples spread over the rayon pool.
    pub fn par_batch_gradients<S>(&self, batch: &[S]) -> Result<Gradients>
    where
        S: Borrow<Sample> + Sync,
    {
        batch
            .par_iter()
            .map(|sample| self.sample_gradients(<S as Borrow<Sample>>::borrow(sample)))
            .try_reduce(|| Gradients::zeros_like(&self.layers), |a, b| Ok(a.merge(b)))
    }

    /// Applies gradients summed over `batch_len` samples. The only place the
    /// parameters change.
    pub fn apply_gradients(&mut self, summed: &Gradients, optimizer: &Sgd, batch_len: usize) {
        debug_assert_eq!(summed.layers.len(), self.layers.len());
        for (layer, grad) in self.layers.iter_mut().zip(summed.layers.iter()) {
            optimizer.step(layer, grad, batch_len);
        }
    }

    /// One SGD step over `batch`: sum the per-sample gradients, then move
    /// every parameter by `learning_rate / |batch|` times the sum.
    pub fn update_mini_batch<S: Borrow<Sample>>(&mut self, batch: &[S], learning_rate: f64) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let summed = self.batch_gradients(batch)?;
        trace!(batch = batch.len(), loss = summed.loss, "mini-batch update");
        self.apply_gradients(&summed, &Sgd::new(learning_rate), batch.len());
        Ok(())
    }

    /// Runs mini-batch SGD over `training_set` for `epochs` epochs,
    /// evaluating on `test_set` after every epoch when one is given.
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        training_set: &[Sample],
        epochs: usize,
        batch_size: usize,
        learning_rate: f64,
        test_set: Option<&[Sample]>,
        rng: &mut R,
    ) -> Result<TrainSummary> {
        let config = TrainConfig::new(epochs, batch_size, learning_rate);
        train_loop(self, training_set, test_set, &config, rng)
    }

    /// Output activations for `x`; per-class scores, not normalized.
    pub fn predict(&self, x: &[f64]) -> Result<Vec<f64>> {
        self.check_input(x)?;
        let mut current = Matrix::column(x);
        for layer in &self.layers {
            current = layer.feed_from(&current).1;
        }
        Ok(current.to_column_vec())
    }

    /// Number of samples whose predicted class (argmax of the output) equals
    /// the argmax of their target.
    pub fn evaluate<S: Borrow<Sample>>(&self, test_set: &[S]) -> Result<usize> {
        let mut correct = 0;
        for sample in test_set {
            let sample: &Sample = sample.borrow();
            self.check_target(&sample.target)?;
            if argmax(&self.predict(&sample.input)?) == sample.label() {
                correct += 1;
            }
        }
        Ok(correct)
    }
}
