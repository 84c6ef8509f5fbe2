//! XBC1 decompression implementation

use flate2::read::ZlibDecoder;
use std::io::{Cursor, Read};
use tracing::{debug, trace};

use crate::{CompressionKind, Error, HEADER_SIZE, Result, Xbc1Header, checksum};

/// Decompress a complete XBC1 container.
///
/// Validates the magic and header, inflates the payload according to its
/// compression kind, and verifies both the declared decompressed size and
/// the payload digest before returning.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let header = Xbc1Header::parse(&mut Cursor::new(data), data.len() as u64)?;

    // Header parsing guarantees the declared payload fits in `data`
    let payload = &data[HEADER_SIZE..HEADER_SIZE + header.compressed_size as usize];

    trace!(
        "Decompressing XBC1 container: kind={:?}, {} -> {} bytes",
        header.compression, header.compressed_size, header.decompressed_size
    );

    let result = match header.compression {
        CompressionKind::None => payload.to_vec(),
        CompressionKind::Zlib => decompress_zlib(payload)?,
        CompressionKind::Zstd => decompress_zstd(payload)?,
    };

    if result.len() != header.decompressed_size as usize {
        return Err(Error::SizeMismatch {
            expected: header.decompressed_size,
            actual: result.len() as u32,
        });
    }

    let actual = checksum(&result);
    if actual != header.digest {
        return Err(Error::ChecksumMismatch {
            expected: header.digest,
            actual,
        });
    }

    debug!(
        "XBC1 {:?}: {} bytes -> {} bytes",
        header.compression,
        payload.len(),
        result.len()
    );

    Ok(result)
}

/// ZLib payload decompression
fn decompress_zlib(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut result = Vec::new();

    decoder
        .read_to_end(&mut result)
        .map_err(|e| Error::DecompressionFailed(format!("zlib decompression failed: {e}")))?;

    Ok(result)
}

/// Zstandard payload decompression
fn decompress_zstd(data: &[u8]) -> Result<Vec<u8>> {
    zstd::decode_all(data)
        .map_err(|e| Error::DecompressionFailed(format!("zstd decompression failed: {e}")))
}
