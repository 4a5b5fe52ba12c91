use std::sync::atomic::Ordering;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::data::sample::Sample;
use crate::error::{Error, Result};
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::epoch_stats::{EpochOutcome, EpochStats};
use crate::train::summary::TrainSummary;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` with mini-batch SGD for `config.epochs` epochs.
///
/// Every epoch draws a fresh random permutation of sample indices from `rng`
/// and cuts it into consecutive batches of `config.batch_size` (the last may
/// be shorter). `training_set` itself is never reordered. Batches run strictly
/// in order, each one seeing the parameters left by the previous update.
/// After each epoch the network is evaluated on `test_set` when one is given.
///
/// Hyperparameters and every sample's shape are validated before the first
/// update, so a failing run leaves `network` untouched.
///
/// # Early termination
/// The loop stops at the next mini-batch boundary if `config.stop_flag` is
/// set, and after the current epoch if the `progress_tx` receiver has been
/// dropped. Only fully completed epochs appear in the summary.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    training_set: &[Sample],
    test_set: Option<&[Sample]>,
    config: &TrainConfig,
    rng: &mut R,
) -> Result<TrainSummary> {
    config.validate()?;
    if training_set.is_empty() {
        return Err(Error::config("training set must not be empty"));
    }
    for sample in training_set.iter().chain(test_set.unwrap_or_default()) {
        network.check_sample(sample)?;
    }

    let optimizer = Sgd::new(config.learning_rate);
    let mut summary = TrainSummary::default();

    info!(
        samples = training_set.len(),
        epochs = config.epochs,
        batch_size = config.batch_size,
        learning_rate = config.learning_rate,
        parallel = config.parallel,
        "training started"
    );

    for epoch in 0..config.epochs {
        let t_start = Instant::now();

        // ── One full pass over the training data ───────────────────────────
        let order = epoch_order(training_set.len(), rng);
        let mut total_loss = 0.0;
        let mut completed = true;

        for batch_indices in order.chunks(config.batch_size) {
            if stop_requested(config) {
                completed = false;
                break;
            }
            let batch: Vec<&Sample> = batch_indices.iter().map(|&i| &training_set[i]).collect();
            let summed = if config.parallel {
                network.par_batch_gradients(&batch[..])?
            } else {
                network.batch_gradients(&batch[..])?
            };
            network.apply_gradients(&summed, &optimizer, batch.len());
            total_loss += summed.loss;
            summary.updates += 1;
        }

        if !completed {
            warn!(epoch, updates = summary.updates, "training stopped mid-epoch");
            summary.stopped_early = true;
            break;
        }

        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        // ── Evaluation ────────────────────────────────────────────────────
        let outcome = match test_set {
            Some(test) => EpochOutcome::Evaluated {
                correct: network.evaluate(test)?,
                total: test.len(),
            },
            None => EpochOutcome::Complete,
        };

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            outcome,
            train_loss: total_loss / training_set.len() as f64,
            elapsed_ms,
        };
        info!(train_loss = stats.train_loss, elapsed_ms, "{}", stats);
        summary.epochs.push(stats.clone());

        // ── Emit progress ─────────────────────────────────────────────────
        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                debug!(epoch, "progress receiver dropped, stopping");
                summary.stopped_early = true;
                break;
            }
        }
    }

    Ok(summary)
}

/// A fresh uniformly random permutation of `0..n`.
pub fn epoch_order<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map_or(false, |flag| flag.load(Ordering::Relaxed))
}
