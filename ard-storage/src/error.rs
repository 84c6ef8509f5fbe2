//! Error types for ARD/ARH archive operations

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArdError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid ARH magic: expected 'arh2', got {0:?}")]
    InvalidIndexMagic([u8; 4]),

    #[error("Invalid ARH index: {0}")]
    InvalidIndexFormat(String),

    #[error("Truncated ARH index: expected {expected} bytes, got {actual}")]
    TruncatedIndex { expected: u64, actual: u64 },

    #[error("Read beyond archive bounds: offset={offset}, length={length}, size={size}")]
    RangeOutOfBounds { offset: u64, length: u64, size: u64 },

    #[error("XBC1 error: {0}")]
    Xbc1(#[from] xbc1::Error),

    #[error("Entry {index} ({cache_id:016x}) failed: {source}")]
    EntryFailed {
        index: usize,
        cache_id: u64,
        #[source]
        source: Box<ArdError>,
    },
}

pub type Result<T> = std::result::Result<T, ArdError>;
