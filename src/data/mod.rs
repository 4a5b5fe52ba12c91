pub mod encoding;
pub mod idx;
pub mod mnist;
pub mod sample;

pub use encoding::{normalize, one_hot_encode, DEFAULT_NUM_CLASSES};
pub use idx::{decode_idx, read_idx_file, IdxArray};
pub use mnist::{load, Dataset};
pub use sample::Sample;
