pub mod gradients;
pub mod network;

pub use gradients::{Gradients, LayerGradient};
pub use network::{validate_layer_sizes, ForwardPass, Network};
