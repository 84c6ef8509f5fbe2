//! XBC1 compression functionality
//!
//! Builds complete containers for every compression kind:
//! - `None`: payload stored as-is
//! - `Zlib`: ZLib compression with configurable levels
//! - `Zstd`: Zstandard compression with configurable levels

use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::io::Write;
use tracing::debug;

use crate::{CompressionKind, Error, Result, Xbc1Header, checksum};

/// Build an XBC1 container from raw payload bytes.
///
/// The digest is computed over `data` before compression. The compressor's
/// output is stored as-is even when it is larger than the input; expansion
/// policy is the caller's concern.
///
/// # Arguments
/// * `data` - Raw payload to store
/// * `kind` - Compression kind to use
/// * `level` - Optional compression level (ZLib 1-9, Zstd 1-19)
/// * `name` - Name embedded in the header, truncated to fit
pub fn compress(
    data: &[u8],
    kind: CompressionKind,
    level: Option<u8>,
    name: &str,
) -> Result<Vec<u8>> {
    let payload = match kind {
        CompressionKind::None => data.to_vec(),
        CompressionKind::Zlib => compress_zlib(data, level.unwrap_or(9))?,
        CompressionKind::Zstd => compress_zstd(data, level.unwrap_or(19))?,
    };

    debug!(
        "XBC1 {kind:?}: {} bytes -> {} bytes",
        data.len(),
        payload.len()
    );

    let header = Xbc1Header {
        compression: kind,
        decompressed_size: data.len() as u32,
        compressed_size: payload.len() as u32,
        digest: checksum(data),
        name: name.to_string(),
    };

    let mut result = Vec::with_capacity(crate::HEADER_SIZE + payload.len());
    header.write_to(&mut result)?;
    result.extend_from_slice(&payload);
    Ok(result)
}

/// ZLib payload compression
fn compress_zlib(data: &[u8], level: u8) -> Result<Vec<u8>> {
    let compression_level = match level {
        0 => Compression::none(),
        1 => Compression::fast(),
        2..=8 => Compression::new(u32::from(level)),
        _ => Compression::best(),
    };

    let mut encoder = ZlibEncoder::new(Vec::new(), compression_level);
    encoder.write_all(data).map_err(Error::Io)?;
    encoder.finish().map_err(Error::Io)
}

/// Zstandard payload compression
fn compress_zstd(data: &[u8], level: u8) -> Result<Vec<u8>> {
    zstd::encode_all(data, i32::from(level))
        .map_err(|e| Error::CompressionFailed(format!("zstd encoding failed: {e}")))
}
