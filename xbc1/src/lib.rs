//! XBC1 Compression/Decompression Library
//!
//! XBC1 is a single-block compressed container format used by a game
//! engine's asset pipeline. A container is a fixed 48-byte header (magic,
//! compression kind, sizes, payload digest, embedded name) followed by the
//! compressed payload. This crate provides parsing, encoding, and
//! decompression for all supported compression kinds.

pub mod checksum;
pub mod compress;
pub mod decompress;
pub mod error;
pub mod header;

pub use checksum::checksum;
pub use compress::compress;
pub use decompress::decompress;
pub use error::{Error, Result};
pub use header::{CompressionKind, Xbc1Header};

/// XBC1 magic bytes
pub const XBC1_MAGIC: [u8; 4] = *b"xbc1";

/// Fixed header size in bytes, embedded name field included
pub const HEADER_SIZE: usize = 48;

/// Size of the NUL-padded name field within the header
pub const NAME_FIELD_SIZE: usize = 28;

/// Longest name storable in the header, leaving room for the terminator
pub const MAX_NAME_LENGTH: usize = NAME_FIELD_SIZE - 1;
