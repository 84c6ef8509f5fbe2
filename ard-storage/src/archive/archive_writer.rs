//! ARD file writer for sequential, alignment-aware archive construction

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// Append-only writer for ARD data files.
///
/// Each append records its pre-padding offset and then zero-pads the file
/// to the next alignment boundary, so every offset handed back is a
/// multiple of the alignment. The writer is held by a single coordinating
/// owner; payload preparation may be parallel but appends are serialized
/// through `&mut self`.
pub struct ArdWriter {
    writer: BufWriter<File>,
    cursor: u64,
    alignment: u64,
}

impl ArdWriter {
    /// Create a new ARD file, truncating any existing one.
    pub fn create(path: &Path, alignment: u64) -> Result<Self> {
        debug!("Creating ARD file: {:?} (alignment {})", path, alignment);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            cursor: 0,
            alignment: alignment.max(1),
        })
    }

    /// Append entry bytes and return the offset they were written at.
    ///
    /// The returned offset is the value recorded in the entry's ARH record;
    /// the zero padding emitted after the payload is never referenced by
    /// any index.
    pub fn append(&mut self, data: &[u8]) -> Result<u64> {
        let offset = self.cursor;

        self.writer.write_all(data)?;
        self.cursor += data.len() as u64;

        let padding = (self.alignment - self.cursor % self.alignment) % self.alignment;
        if padding > 0 {
            self.writer.write_all(&vec![0u8; padding as usize])?;
            self.cursor += padding;
        }

        debug!(
            "Appended {} bytes at offset {:x} ({} padding)",
            data.len(),
            offset,
            padding
        );

        Ok(offset)
    }

    /// Current end-of-file cursor, always aligned.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Flush buffered bytes to disk.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
