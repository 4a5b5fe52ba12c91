pub mod epoch_stats;
pub mod loop_fn;
pub mod summary;
pub mod train_config;

pub use epoch_stats::{EpochOutcome, EpochStats};
pub use loop_fn::{epoch_order, train_loop};
pub use summary::TrainSummary;
pub use train_config::TrainConfig;
