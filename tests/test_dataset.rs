// End-to-end: IDX files on disk -> Dataset -> training -> report.

use std::path::PathBuf;
use std::time::Duration;

use ferrite_mlp::data::idx::IdxArray;
use ferrite_mlp::data::mnist::{TEST_IMAGES, TEST_LABELS, TRAIN_IMAGES, TRAIN_LABELS};
use ferrite_mlp::data::Dataset;
use ferrite_mlp::{Error, Network, RunReport};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SIDE: usize = 4;

// Class 0 lights up the top half of a 4x4 image, class 1 the bottom half.
fn synthetic_split(count: usize, seed: u64) -> (IdxArray, IdxArray) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pixels = Vec::with_capacity(count * SIDE * SIDE);
    let mut labels = Vec::with_capacity(count);
    for _ in 0..count {
        let class: u8 = rng.gen_range(0..2);
        for row in 0..SIDE {
            let lit = (row < SIDE / 2) == (class == 0);
            for _ in 0..SIDE {
                let base: u8 = if lit { 200 } else { 10 };
                pixels.push(base + rng.gen_range(0..40));
            }
        }
        labels.push(class);
    }
    (
        IdxArray { shape: vec![count, SIDE, SIDE], data: pixels },
        IdxArray { shape: vec![count], data: labels },
    )
}

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> TempDir {
        let path = std::env::temp_dir().join(format!("ferrite-mlp-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        TempDir(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn write_dataset(dir: &TempDir) {
    let (train_images, train_labels) = synthetic_split(120, 1);
    let (test_images, test_labels) = synthetic_split(40, 2);
    std::fs::write(dir.0.join(TRAIN_IMAGES), train_images.to_bytes()).unwrap();
    std::fs::write(dir.0.join(TRAIN_LABELS), train_labels.to_bytes()).unwrap();
    std::fs::write(dir.0.join(TEST_IMAGES), test_images.to_bytes()).unwrap();
    std::fs::write(dir.0.join(TEST_LABELS), test_labels.to_bytes()).unwrap();
}

#[test]
fn test_train_on_idx_files() {
    let dir = TempDir::new("e2e");
    write_dataset(&dir);

    let dataset = Dataset::load(&dir.0, 2).unwrap();
    assert_eq!(dataset.training.len(), 120);
    assert_eq!(dataset.test.len(), 40);
    assert!(dataset.training.iter().all(|s| s.input.len() == SIDE * SIDE));

    let (training, test) = dataset.into_parts();
    let mut rng = StdRng::seed_from_u64(42);
    let mut network = Network::new(&[SIDE * SIDE, 8, 2], &mut rng).unwrap();
    let summary = network
        .train(&training, 30, 10, 3.0, Some(test.as_slice()), &mut rng)
        .unwrap();

    let correct = network.evaluate(&test[..]).unwrap();
    assert!(correct >= 36, "only {correct} / 40 correct");

    let report = RunReport::from_summary(&summary, Duration::from_millis(250));
    assert_eq!(report.epoch_times.len(), 30);
    assert_eq!(report.accuracies.len(), 30);
    assert_eq!(report.accuracy, Some(correct as f64 / 40.0));
}

#[test]
fn test_truncated_file_is_decode_error() {
    let dir = TempDir::new("truncated");
    write_dataset(&dir);
    let path = dir.0.join(TEST_IMAGES);
    let mut bytes = std::fs::read(&path).unwrap();
    bytes.truncate(bytes.len() - 3);
    std::fs::write(&path, bytes).unwrap();

    let err = Dataset::load(&dir.0, 2).unwrap_err();
    assert!(matches!(err, Error::Decode(_)), "{err}");
}

#[test]
fn test_label_out_of_range_is_decode_error() {
    let dir = TempDir::new("labels");
    write_dataset(&dir);
    // Labels are 0/1 but only one class is declared.
    let err = Dataset::load(&dir.0, 1).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn test_missing_directory_is_io_error() {
    let err = Dataset::load("/nonexistent/ferrite-mlp-data", 10).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
