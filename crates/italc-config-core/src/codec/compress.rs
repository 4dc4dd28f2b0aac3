//! qCompress-compatible zlib framing plus base64 transport encoding.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use thiserror::Error;

/// Size of the big-endian length prefix in front of the zlib stream.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Error type for compression and encoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Input larger than the 32-bit length prefix can describe.
    #[error("input of {0} bytes exceeds the 4 GiB compression limit")]
    TooLarge(usize),

    /// Compressed data shorter than its length prefix.
    #[error("compressed data is truncated ({0} bytes)")]
    Truncated(usize),

    /// The zlib stream inflated to a different size than the prefix announced.
    #[error("length prefix announces {expected} bytes but stream inflated to {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The zlib encoder or decoder failed.
    #[error("zlib stream error: {0}")]
    Zlib(#[from] std::io::Error),

    /// The text was not valid base64.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Compresses `data` into the length-prefixed zlib layout.
///
/// Empty input is encoded as the bare zero prefix without a zlib stream.
///
/// # Errors
///
/// Returns [`CodecError::TooLarge`] for inputs over `u32::MAX` bytes.
pub fn compress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let length = u32::try_from(data.len()).map_err(|_| CodecError::TooLarge(data.len()))?;
    if length == 0 {
        return Ok(vec![0; LENGTH_PREFIX_SIZE]);
    }

    let mut out = Vec::with_capacity(LENGTH_PREFIX_SIZE + data.len() / 2);
    out.extend_from_slice(&length.to_be_bytes());

    let mut encoder = ZlibEncoder::new(out, Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Inverse of [`compress`].
///
/// # Errors
///
/// Returns [`CodecError::Truncated`] when the prefix is missing,
/// [`CodecError::Zlib`] for a corrupt stream and
/// [`CodecError::LengthMismatch`] when the inflated size disagrees with the prefix.
pub fn uncompress(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    if data.len() < LENGTH_PREFIX_SIZE {
        return Err(CodecError::Truncated(data.len()));
    }
    let (prefix, stream) = data.split_at(LENGTH_PREFIX_SIZE);
    let expected = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    if stream.is_empty() {
        return match expected {
            0 => Ok(Vec::new()),
            _ => Err(CodecError::Truncated(data.len())),
        };
    }

    let mut out = Vec::with_capacity(expected);
    ZlibDecoder::new(stream).read_to_end(&mut out)?;

    if out.len() != expected {
        return Err(CodecError::LengthMismatch {
            expected,
            actual: out.len(),
        });
    }
    Ok(out)
}

/// Compresses and base64-encodes a log file for embedding in JSON.
pub fn encode_log(data: &[u8]) -> Result<String, CodecError> {
    Ok(STANDARD.encode(compress(data)?))
}

/// Decodes a value produced by [`encode_log`] back into the raw log bytes.
pub fn decode_log(text: &str) -> Result<Vec<u8>, CodecError> {
    uncompress(&STANDARD.decode(text.trim())?)
}
