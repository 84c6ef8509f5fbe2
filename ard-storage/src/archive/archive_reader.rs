//! ARD file reader with memory mapping support

use memmap2::{Mmap, MmapOptions};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use tracing::debug;

use crate::error::{ArdError, Result};

/// Backing storage for an open ARD file.
enum Backing {
    /// Memory-mapped file
    Mapped(Mmap),
    /// Buffered reader fallback; the mutex serializes seeks so ranges can
    /// be read from multiple worker threads
    Buffered(Mutex<BufReader<File>>),
}

/// Random-access reader over an ARD data file.
///
/// Ranges are read concurrently from worker threads during extraction;
/// `read_at` takes `&self` on both backing paths.
pub struct ArdReader {
    backing: Backing,
    /// Size of the data file
    size: u64,
}

impl ArdReader {
    /// Open an ARD file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        debug!("Opening ARD file: {:?} (size: {} bytes)", path, size);

        // Limit mmap to 2GB files
        let backing = if size > 0 && size < 2_147_483_648 {
            match unsafe { MmapOptions::new().map(&file) } {
                Ok(mmap) => {
                    debug!("Successfully memory-mapped ARD file");
                    Backing::Mapped(mmap)
                }
                Err(e) => {
                    debug!("Failed to memory-map ARD file, using buffered reader: {e}");
                    Backing::Buffered(Mutex::new(BufReader::new(file)))
                }
            }
        } else {
            Backing::Buffered(Mutex::new(BufReader::new(file)))
        };

        Ok(Self { backing, size })
    }

    /// Read exactly `length` bytes starting at `offset`.
    ///
    /// A range extending past the end of the file fails before any read;
    /// this is the signal for a corrupt or mismatched ARD/ARH pair.
    pub fn read_at(&self, offset: u64, length: usize) -> Result<Vec<u8>> {
        let end = offset.checked_add(length as u64).unwrap_or(u64::MAX);
        if end > self.size {
            return Err(ArdError::RangeOutOfBounds {
                offset,
                length: length as u64,
                size: self.size,
            });
        }

        match &self.backing {
            Backing::Mapped(mmap) => {
                let data = &mmap[offset as usize..offset as usize + length];
                Ok(data.to_vec())
            }
            Backing::Buffered(file) => {
                let mut file = file.lock();
                file.seek(SeekFrom::Start(offset))?;
                let mut buffer = vec![0u8; length];
                file.read_exact(&mut buffer)?;
                Ok(buffer)
            }
        }
    }

    /// Size of the ARD file in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// `true` if the file is memory-mapped.
    pub fn is_memory_mapped(&self) -> bool {
        matches!(self.backing, Backing::Mapped(_))
    }
}
