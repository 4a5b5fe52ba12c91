use std::path::Path;

use tracing::info;

use crate::data::encoding::{normalize, one_hot_encode, DEFAULT_NUM_CLASSES};
use crate::data::idx::{read_idx_file, IdxArray};
use crate::data::sample::Sample;
use crate::error::{Error, Result};

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// Training and test samples decoded from a directory of IDX files.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub training: Vec<Sample>,
    pub test: Vec<Sample>,
}

impl Dataset {
    /// Loads the four standard MNIST files from `dir`.
    pub fn load(dir: impl AsRef<Path>, num_classes: usize) -> Result<Dataset> {
        let dir = dir.as_ref();
        let training = load_split(dir, TRAIN_IMAGES, TRAIN_LABELS, num_classes)?;
        let test = load_split(dir, TEST_IMAGES, TEST_LABELS, num_classes)?;
        info!(
            dir = %dir.display(),
            training = training.len(),
            test = test.len(),
            "loaded dataset"
        );
        Ok(Dataset { training, test })
    }

    /// Keeps at most `train_limit` training and `test_limit` test samples.
    pub fn truncate(&mut self, train_limit: Option<usize>, test_limit: Option<usize>) {
        if let Some(n) = train_limit {
            self.training.truncate(n);
        }
        if let Some(n) = test_limit {
            self.test.truncate(n);
        }
    }

    pub fn into_parts(self) -> (Vec<Sample>, Vec<Sample>) {
        (self.training, self.test)
    }
}

/// `(training, test)` from `dir` with the default ten classes.
pub fn load(dir: impl AsRef<Path>) -> Result<(Vec<Sample>, Vec<Sample>)> {
    Dataset::load(dir, DEFAULT_NUM_CLASSES).map(Dataset::into_parts)
}

fn load_split(dir: &Path, images: &str, labels: &str, num_classes: usize) -> Result<Vec<Sample>> {
    let images = read_idx_file(dir.join(images))?;
    let labels = read_idx_file(dir.join(labels))?;
    samples_from_idx(&images, &labels, num_classes)
}

/// Pairs an image array `[count, rows, cols]` with a label array `[count]`.
pub fn samples_from_idx(
    images: &IdxArray,
    labels: &IdxArray,
    num_classes: usize,
) -> Result<Vec<Sample>> {
    if images.shape.len() != 3 {
        return Err(Error::decode(format!(
            "image file must have 3 dimensions [count, rows, cols], got {:?}",
            images.shape
        )));
    }
    if labels.shape.len() != 1 {
        return Err(Error::decode(format!(
            "label file must have 1 dimension [count], got {:?}",
            labels.shape
        )));
    }
    if images.count() != labels.count() {
        return Err(Error::decode(format!(
            "image file declares {} items but label file declares {}",
            images.count(),
            labels.count()
        )));
    }

    let inputs = normalize(&images.data, images.item_len())?;
    let targets = one_hot_encode(&labels.data[..], num_classes)?;

    Ok(inputs
        .into_iter()
        .zip(targets)
        .map(|(input, target)| Sample::new(input, target))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn images(count: usize) -> IdxArray {
        IdxArray {
            shape: vec![count, 2, 2],
            data: (0..count * 4).map(|i| (i * 17 % 256) as u8).collect(),
        }
    }

    fn labels(values: &[u8]) -> IdxArray {
        IdxArray { shape: vec![values.len()], data: values.to_vec() }
    }

    #[test]
    fn pairs_images_with_one_hot_labels() {
        let samples = samples_from_idx(&images(3), &labels(&[1, 0, 2]), 3).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].input.len(), 4);
        assert_eq!(samples[0].target, vec![0.0, 1.0, 0.0]);
        assert_eq!(samples[2].label(), 2);
        assert!(samples.iter().flat_map(|s| &s.input).all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn rejects_count_mismatch() {
        let err = samples_from_idx(&images(3), &labels(&[1, 0]), 3).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn rejects_wrong_dimensionality() {
        let flat = IdxArray { shape: vec![4], data: vec![0; 4] };
        assert!(samples_from_idx(&flat, &labels(&[0, 0, 0, 0]), 2).is_err());
        assert!(samples_from_idx(&images(1), &images(1), 2).is_err());
    }

    #[test]
    fn load_reads_standard_file_names() {
        let dir = std::env::temp_dir().join(format!("ferrite-mlp-mnist-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(TRAIN_IMAGES), images(4).to_bytes()).unwrap();
        std::fs::write(dir.join(TRAIN_LABELS), labels(&[0, 1, 9, 3]).to_bytes()).unwrap();
        std::fs::write(dir.join(TEST_IMAGES), images(2).to_bytes()).unwrap();
        std::fs::write(dir.join(TEST_LABELS), labels(&[5, 6]).to_bytes()).unwrap();

        let (training, test) = load(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(training.len(), 4);
        assert_eq!(test.len(), 2);
        assert_eq!(training[2].label(), 9);
        assert_eq!(test[1].target.len(), DEFAULT_NUM_CLASSES);
    }

    #[test]
    fn truncate_limits_both_splits() {
        let mut dataset = Dataset {
            training: samples_from_idx(&images(3), &labels(&[0, 1, 1]), 2).unwrap(),
            test: samples_from_idx(&images(2), &labels(&[1, 0]), 2).unwrap(),
        };
        dataset.truncate(Some(1), None);
        assert_eq!(dataset.training.len(), 1);
        assert_eq!(dataset.test.len(), 2);
    }
}
