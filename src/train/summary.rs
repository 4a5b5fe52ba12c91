use serde::{Deserialize, Serialize};

use crate::train::epoch_stats::EpochStats;

/// Result of a `train_loop` run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainSummary {
    /// One entry per completed epoch, in order.
    pub epochs: Vec<EpochStats>,
    /// Number of mini-batch updates applied.
    pub updates: usize,
    /// True when the stop flag or a dropped progress receiver ended the run.
    pub stopped_early: bool,
}

impl TrainSummary {
    pub fn last(&self) -> Option<&EpochStats> {
        self.epochs.last()
    }

    /// Test accuracy of the final epoch, if it was evaluated.
    pub fn final_accuracy(&self) -> Option<f64> {
        self.last().and_then(EpochStats::accuracy)
    }
}
