// Finite-difference checks of the analytic gradients from backward_propagation.

use ferrite_mlp::{Layer, Network, QuadraticLoss};

const EPS: f64 = 1e-5;
const REL_TOL: f64 = 1e-4;

fn cost(net: &Network, x: &[f64], y: &[f64]) -> f64 {
    let pass = net.forward_propagation(x).unwrap();
    QuadraticLoss::loss(&pass.output(), y)
}

// Copy of `net` with one weight (or bias, when `j` is None) shifted by `delta`.
fn perturbed(net: &Network, l: usize, i: usize, j: Option<usize>, delta: f64) -> Network {
    let mut layers = net.layers().to_vec();
    let mut weights = layers[l].weights().clone();
    let mut biases = layers[l].biases().clone();
    match j {
        Some(j) => weights.data[i][j] += delta,
        None => biases.data[i][0] += delta,
    }
    layers[l] = Layer::from_parameters(weights, biases).unwrap();
    Network::from_layers(layers).unwrap()
}

fn numeric(net: &Network, l: usize, i: usize, j: Option<usize>, x: &[f64], y: &[f64]) -> f64 {
    let plus = cost(&perturbed(net, l, i, j, EPS), x, y);
    let minus = cost(&perturbed(net, l, i, j, -EPS), x, y);
    (plus - minus) / (2.0 * EPS)
}

fn assert_close(analytic: f64, numeric: f64, what: &str) {
    let scale = analytic.abs().max(numeric.abs());
    assert!(
        (analytic - numeric).abs() <= REL_TOL * scale + 1e-9,
        "{what}: analytic {analytic:e} vs numeric {numeric:e}"
    );
}

fn check_network(layer_sizes: &[usize], seed: u64, x: &[f64], y: &[f64]) {
    let net = Network::with_seed(layer_sizes, seed).unwrap();
    let pass = net.forward_propagation(x).unwrap();
    let grads = net.backward_propagation(y, &pass).unwrap();

    for (l, layer) in net.layers().iter().enumerate() {
        for i in 0..layer.size() {
            for j in 0..layer.input_size() {
                let analytic = grads.layers[l].weights.data[i][j];
                let estimate = numeric(&net, l, i, Some(j), x, y);
                assert_close(analytic, estimate, &format!("W[{l}][{i}][{j}]"));
            }
            let analytic = grads.layers[l].biases.data[i][0];
            let estimate = numeric(&net, l, i, None, x, y);
            assert_close(analytic, estimate, &format!("b[{l}][{i}]"));
        }
    }
}

#[test]
fn test_gradient_check_single_transition() {
    check_network(&[3, 2], 1, &[0.2, -0.5, 0.9], &[1.0, 0.0]);
}

#[test]
fn test_gradient_check_one_hidden_layer() {
    check_network(&[3, 4, 2], 2, &[0.2, -0.5, 0.9], &[0.0, 1.0]);
}

#[test]
fn test_gradient_check_deep_network() {
    check_network(&[4, 5, 3, 3], 3, &[0.9, 0.1, 0.0, 0.4], &[0.0, 0.0, 1.0]);
}

#[test]
fn test_gradient_loss_matches_cost() {
    let net = Network::with_seed(&[3, 4, 2], 4).unwrap();
    let x = [0.3, 0.3, 0.7];
    let y = [1.0, 0.0];
    let pass = net.forward_propagation(&x).unwrap();
    let grads = net.backward_propagation(&y, &pass).unwrap();
    approx::assert_relative_eq!(grads.loss, cost(&net, &x, &y), max_relative = 1e-12);
}
