use crate::error::{Error, Result};

/// Default number of classes (digits 0-9).
pub const DEFAULT_NUM_CLASSES: usize = 10;

/// Reshapes raw pixel bytes into vectors of `width` consecutive bytes, each
/// byte divided by 255.0 so values lie in `[0.0, 1.0]`.
pub fn normalize(pixels: &[u8], width: usize) -> Result<Vec<Vec<f64>>> {
    if width == 0 {
        return Err(Error::decode("image width must be at least 1"));
    }
    if pixels.len() % width != 0 {
        return Err(Error::decode(format!(
            "{} pixel bytes do not divide into images of {} pixels",
            pixels.len(),
            width
        )));
    }
    Ok(pixels
        .chunks_exact(width)
        .map(|chunk| chunk.iter().map(|&px| px as f64 / 255.0).collect())
        .collect())
}

/// One-hot encodes integer class labels into vectors of length `num_classes`.
pub fn one_hot_encode<L>(labels: &[L], num_classes: usize) -> Result<Vec<Vec<f64>>>
where
    L: Copy + Into<usize>,
{
    if num_classes == 0 {
        return Err(Error::config("num_classes must be at least 1"));
    }
    labels
        .iter()
        .enumerate()
        .map(|(i, &label)| {
            let class: usize = label.into();
            if class >= num_classes {
                return Err(Error::decode(format!(
                    "label at index {}: class {} is out of range for {} classes",
                    i, class, num_classes
                )));
            }
            let mut one_hot = vec![0.0; num_classes];
            one_hot[class] = 1.0;
            Ok(one_hot)
        })
        .collect()
}
