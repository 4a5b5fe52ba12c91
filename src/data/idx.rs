//! Decoder for the IDX binary format used by MNIST and its derivatives.
//!
//! # Layout
//! ```text
//! bytes 0-1:   0x00 0x00   (reserved, must be zero)
//! byte  2:     dtype       (only 0x08 = unsigned byte is supported)
//! byte  3:     n_dims      (number of dimensions, at least 1)
//! next 4*n_dims bytes:     dimension sizes, big-endian u32
//! remaining bytes:         product(dims) unsigned bytes, row-major
//! ```
//! Image files carry `[count, rows, cols]`, label files carry `[count]`.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// dtype code for unsigned bytes.
pub const UNSIGNED_BYTE: u8 = 0x08;

const HEADER_LEN: usize = 4;

/// A decoded IDX file: its declared shape and raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdxArray {
    pub shape: Vec<usize>,
    pub data: Vec<u8>,
}

impl IdxArray {
    /// Number of items along the first dimension.
    pub fn count(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// Product of every dimension after the first.
    pub fn item_len(&self) -> usize {
        self.shape.iter().skip(1).product()
    }

    /// Serializes back into IDX bytes (unsigned-byte dtype).
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + 4 * self.shape.len() + self.data.len());
        out.extend_from_slice(&[0x00, 0x00, UNSIGNED_BYTE, self.shape.len() as u8]);
        for &dim in &self.shape {
            out.extend_from_slice(&(dim as u32).to_be_bytes());
        }
        out.extend_from_slice(&self.data);
        out
    }
}

/// Decodes IDX bytes, requiring the payload length to match the declared
/// shape exactly.
pub fn decode_idx(bytes: &[u8]) -> Result<IdxArray> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::decode(format!(
            "IDX file too short: expected at least {} header bytes, got {}",
            HEADER_LEN,
            bytes.len()
        )));
    }

    let zero = u16::from_be_bytes([bytes[0], bytes[1]]);
    if zero != 0 {
        return Err(Error::decode(format!(
            "IDX bytes 0-1 must be 0x0000 (reserved), got 0x{:04X}",
            zero
        )));
    }
    if bytes[2] != UNSIGNED_BYTE {
        return Err(Error::decode(format!(
            "IDX byte 2 (dtype) must be 0x{:02X} (uint8), got 0x{:02X}",
            UNSIGNED_BYTE, bytes[2]
        )));
    }
    let n_dims = bytes[3] as usize;
    if n_dims == 0 {
        return Err(Error::decode("IDX byte 3 (dimensions) must be at least 1, got 0"));
    }

    let payload_start = HEADER_LEN + 4 * n_dims;
    if bytes.len() < payload_start {
        return Err(Error::decode(format!(
            "IDX header declares {} dimensions ({} header bytes) but file is only {} bytes",
            n_dims,
            payload_start,
            bytes.len()
        )));
    }

    let shape: Vec<usize> = bytes[HEADER_LEN..payload_start]
        .chunks_exact(4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize)
        .collect();

    let expected = shape
        .iter()
        .try_fold(1_usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| Error::decode(format!("IDX shape {:?} overflows usize", shape)))?;

    let payload = &bytes[payload_start..];
    if payload.len() != expected {
        return Err(Error::decode(format!(
            "IDX shape {:?} requires {} payload bytes, found {}",
            shape,
            expected,
            payload.len()
        )));
    }

    Ok(IdxArray {
        shape,
        data: payload.to_vec(),
    })
}

/// Reads and decodes an IDX file from disk.
pub fn read_idx_file(path: impl AsRef<Path>) -> Result<IdxArray> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let array = decode_idx(&bytes).map_err(|e| match e {
        Error::Decode(msg) => Error::decode(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;
    debug!(path = %path.display(), shape = ?array.shape, "decoded IDX file");
    Ok(array)
}
