//! Error types for XBC1 parsing, compression and decompression

use thiserror::Error;

/// Result type for XBC1 operations
pub type Result<T> = std::result::Result<T, Error>;

/// XBC1 error types
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid XBC1 magic bytes
    #[error("Invalid XBC1 magic: expected 'xbc1', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Truncated data
    #[error("Truncated data: expected {expected} bytes, got {actual}")]
    Truncated { expected: u64, actual: u64 },

    /// Unknown compression kind value in the header
    #[error("Unknown compression kind: {0}")]
    UnknownCompression(u32),

    /// Decompressed payload does not match the size declared in the header
    #[error("Decompressed size mismatch: header declares {expected} bytes, got {actual}")]
    SizeMismatch { expected: u32, actual: u32 },

    /// Payload digest does not match the header after decompression
    #[error("Checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Compression failed
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    /// Decompression failed
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),
}
