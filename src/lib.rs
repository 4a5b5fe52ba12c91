pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;
pub mod config;
pub mod report;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::sigmoid::Sigmoid;
pub use layers::dense::Layer;
pub use network::network::{ForwardPass, Network};
pub use network::gradients::Gradients;
pub use loss::quadratic::QuadraticLoss;
pub use optim::sgd::Sgd;
pub use data::sample::Sample;
pub use train::{train_loop, EpochOutcome, EpochStats, TrainConfig, TrainSummary};
pub use config::RunConfig;
pub use report::RunReport;
pub use error::{Error, Result};
