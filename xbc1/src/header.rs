//! XBC1 header parsing and serialization

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use tracing::trace;

use crate::{Error, HEADER_SIZE, MAX_NAME_LENGTH, NAME_FIELD_SIZE, Result, XBC1_MAGIC};

/// Compression kind of an XBC1 payload.
///
/// The wire values are fixed by the format: `none` is the identity kind,
/// `zlib` and `zstd` are frame-based compressors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionKind {
    /// Payload stored as-is
    None,
    /// ZLib-compressed payload
    Zlib,
    /// Zstandard-compressed payload
    Zstd,
}

impl CompressionKind {
    /// Parse a compression kind from its wire value.
    ///
    /// Returns `None` for values the format does not define.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Zlib),
            3 => Some(Self::Zstd),
            _ => None,
        }
    }

    /// Wire value of this compression kind.
    pub fn as_u32(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Zlib => 1,
            Self::Zstd => 3,
        }
    }
}

/// Parsed XBC1 container header.
///
/// The on-disk layout is 48 bytes: magic, compression kind, decompressed
/// size, compressed size, payload digest, and a NUL-padded name field. The
/// payload immediately follows the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xbc1Header {
    /// How the payload is compressed
    pub compression: CompressionKind,

    /// Size of the payload after decompression
    pub decompressed_size: u32,

    /// Size of the stored payload.
    ///
    /// Not guaranteed to be smaller than `decompressed_size`; incompressible
    /// input may expand.
    pub compressed_size: u32,

    /// Digest over the decompressed payload
    pub digest: u32,

    /// Name embedded in the header, at most 27 characters
    pub name: String,
}

impl Xbc1Header {
    /// Parse an XBC1 header at the reader's current position, with a
    /// container of up to `length` bytes.
    ///
    /// Fails if the header itself or the payload it declares would not fit
    /// in `length` bytes, so callers can slice the payload without bounds
    /// surprises.
    pub fn parse<R: Read>(f: &mut R, length: u64) -> Result<Self> {
        if length < HEADER_SIZE as u64 {
            return Err(Error::Truncated {
                expected: HEADER_SIZE as u64,
                actual: length,
            });
        }

        let mut magic = [0; XBC1_MAGIC.len()];
        f.read_exact(&mut magic)?;
        if magic != XBC1_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let kind_value = f.read_u32::<LittleEndian>()?;
        let compression =
            CompressionKind::from_u32(kind_value).ok_or(Error::UnknownCompression(kind_value))?;

        let decompressed_size = f.read_u32::<LittleEndian>()?;
        let compressed_size = f.read_u32::<LittleEndian>()?;
        let digest = f.read_u32::<LittleEndian>()?;

        let mut name_bytes = [0u8; NAME_FIELD_SIZE];
        f.read_exact(&mut name_bytes)?;
        let name_end = name_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(NAME_FIELD_SIZE);
        let name = String::from_utf8_lossy(&name_bytes[..name_end]).into_owned();

        let total = HEADER_SIZE as u64 + u64::from(compressed_size);
        if total > length {
            // The declared payload would run past the buffer we have
            return Err(Error::Truncated {
                expected: total,
                actual: length,
            });
        }

        trace!(
            "XBC1 header: kind={compression:?}, decompressed={decompressed_size}, \
             compressed={compressed_size}, name={name:?}"
        );

        Ok(Self {
            compression,
            decompressed_size,
            compressed_size,
            digest,
            name,
        })
    }

    /// Serialize the header into a writer.
    ///
    /// Names longer than the field allows are truncated, matching the
    /// original tooling.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&XBC1_MAGIC)?;
        w.write_u32::<LittleEndian>(self.compression.as_u32())?;
        w.write_u32::<LittleEndian>(self.decompressed_size)?;
        w.write_u32::<LittleEndian>(self.compressed_size)?;
        w.write_u32::<LittleEndian>(self.digest)?;

        let mut name_bytes = [0u8; NAME_FIELD_SIZE];
        let name = self.name.as_bytes();
        let copy_len = name.len().min(MAX_NAME_LENGTH);
        name_bytes[..copy_len].copy_from_slice(&name[..copy_len]);
        w.write_all(&name_bytes)?;

        Ok(())
    }
}
