use std::fmt;

use serde::{Deserialize, Serialize};

/// What an epoch reports: accuracy on the test set when one was supplied,
/// otherwise just that it finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EpochOutcome {
    Evaluated { correct: usize, total: usize },
    Complete,
}

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based epoch index.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    pub outcome: EpochOutcome,
    /// Mean quadratic cost over the training samples of this epoch, measured
    /// on the parameters each batch saw before its update.
    pub train_loss: f64,
    /// Wall-clock duration of the epoch's updates in milliseconds (evaluation excluded).
    pub elapsed_ms: u64,
}

impl EpochStats {
    /// Test accuracy as a fraction in [0, 1], if the epoch was evaluated.
    pub fn accuracy(&self) -> Option<f64> {
        match self.outcome {
            EpochOutcome::Evaluated { total: 0, .. } => Some(0.0),
            EpochOutcome::Evaluated { correct, total } => Some(correct as f64 / total as f64),
            EpochOutcome::Complete => None,
        }
    }
}

impl fmt::Display for EpochStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            EpochOutcome::Evaluated { correct, total } => {
                write!(f, "Epoch {}: {} / {}", self.epoch, correct, total)
            }
            EpochOutcome::Complete => write!(f, "Epoch {} complete", self.epoch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(outcome: EpochOutcome) -> EpochStats {
        EpochStats { epoch: 2, total_epochs: 5, outcome, train_loss: 0.1, elapsed_ms: 12 }
    }

    #[test]
    fn display_matches_report_lines() {
        let evaluated = stats(EpochOutcome::Evaluated { correct: 9, total: 10 });
        assert_eq!(evaluated.to_string(), "Epoch 2: 9 / 10");
        assert_eq!(stats(EpochOutcome::Complete).to_string(), "Epoch 2 complete");
    }

    #[test]
    fn accuracy_only_when_evaluated() {
        assert_eq!(stats(EpochOutcome::Evaluated { correct: 3, total: 4 }).accuracy(), Some(0.75));
        assert_eq!(stats(EpochOutcome::Complete).accuracy(), None);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(EpochOutcome::Evaluated { correct: 1, total: 2 }).unwrap();
        assert_eq!(json["status"], "evaluated");
        assert_eq!(json["correct"], 1);
        let json = serde_json::to_value(EpochOutcome::Complete).unwrap();
        assert_eq!(json["status"], "complete");
    }
}
