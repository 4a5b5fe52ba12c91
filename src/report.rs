use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::train::summary::TrainSummary;

/// Machine-readable summary of a run, the format benchmark harnesses
/// compare across implementations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Total wall-clock time in seconds.
    pub training_time: f64,
    /// Test accuracy after the final epoch; `null` when no test set was used.
    pub accuracy: Option<f64>,
    /// Seconds spent on each epoch's updates.
    pub epoch_times: Vec<f64>,
    /// Test accuracy after each evaluated epoch.
    pub accuracies: Vec<f64>,
}

impl RunReport {
    pub fn from_summary(summary: &TrainSummary, training_time: Duration) -> RunReport {
        RunReport {
            training_time: training_time.as_secs_f64(),
            accuracy: summary.final_accuracy(),
            epoch_times: summary
                .epochs
                .iter()
                .map(|e| e.elapsed_ms as f64 / 1000.0)
                .collect(),
            accuracies: summary.epochs.iter().filter_map(|e| e.accuracy()).collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Writes the report as pretty-printed JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
