//! Parser and writer for ARH index files

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, trace};

use crate::error::{ArdError, Result};
use crate::types::EntryRecord;

/// ARH magic bytes
pub const ARH_MAGIC: [u8; 4] = *b"arh2";

/// Size of the fixed ARH header
pub const ARH_HEADER_SIZE: u32 = 16;

/// Size of one serialized entry record
pub const ARH_ENTRY_SIZE: u32 = 28;

/// Parsed ARH index: the ordered list of entry records describing the
/// paired ARD data file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArhIndex {
    entries: Vec<EntryRecord>,
}

impl ArhIndex {
    /// Build an index from records already in final file order.
    pub fn new(entries: Vec<EntryRecord>) -> Self {
        Self { entries }
    }

    /// All records, in index order.
    pub fn entries(&self) -> &[EntryRecord] {
        &self.entries
    }

    /// Number of entries in the index.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse an ARH file from disk.
    pub fn parse_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let length = file.metadata()?.len();
        let mut reader = BufReader::new(file);
        Self::parse(&mut reader, length)
    }

    /// Parse an ARH index from a reader of `length` total bytes.
    ///
    /// The header is validated before any record is read: a bad magic, an
    /// entries offset inside the header, or an entry count whose records
    /// would run past `length` all fail up front.
    pub fn parse<R: Read + Seek>(reader: &mut R, length: u64) -> Result<Self> {
        if length < u64::from(ARH_HEADER_SIZE) {
            return Err(ArdError::TruncatedIndex {
                expected: u64::from(ARH_HEADER_SIZE),
                actual: length,
            });
        }

        let mut magic = [0; ARH_MAGIC.len()];
        reader.read_exact(&mut magic)?;
        if magic != ARH_MAGIC {
            return Err(ArdError::InvalidIndexMagic(magic));
        }

        let entry_count = reader.read_u32::<LittleEndian>()?;
        let entries_offset = reader.read_u32::<LittleEndian>()?;
        let _reserved = reader.read_u32::<LittleEndian>()?;

        debug!("ARH header: {entry_count} entries at offset {entries_offset}");

        if entries_offset < ARH_HEADER_SIZE {
            return Err(ArdError::InvalidIndexFormat(format!(
                "entries offset {entries_offset} overlaps the header"
            )));
        }

        let expected =
            u64::from(entries_offset) + u64::from(entry_count) * u64::from(ARH_ENTRY_SIZE);
        if expected > length {
            return Err(ArdError::TruncatedIndex {
                expected,
                actual: length,
            });
        }

        reader.seek(SeekFrom::Start(u64::from(entries_offset)))?;

        let mut entries = Vec::with_capacity(entry_count as usize);
        for index in 0..entry_count {
            let cache_id = reader.read_u64::<LittleEndian>()?;
            let offset = reader.read_u64::<LittleEndian>()?;
            let stored_size = reader.read_u32::<LittleEndian>()?;
            let decompressed_size = reader.read_u32::<LittleEndian>()?;
            let flags = reader.read_u32::<LittleEndian>()?;

            let (format, content) = EntryRecord::decode_flags(flags);

            if index < 5 {
                trace!(
                    "Entry {index}: cache_id={cache_id:016x}, offset={offset:x}, \
                     stored={stored_size}, decompressed={decompressed_size}, flags={flags:#x}"
                );
            }

            entries.push(EntryRecord {
                cache_id,
                offset,
                stored_size,
                decompressed_size,
                format,
                content,
            });
        }

        debug!("Parsed ARH index with {} entries", entries.len());

        Ok(Self { entries })
    }

    /// Write the index to disk.
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Serialize the index: header, then records in index order.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&ARH_MAGIC)?;
        writer.write_u32::<LittleEndian>(self.entries.len() as u32)?;
        writer.write_u32::<LittleEndian>(ARH_HEADER_SIZE)?;
        writer.write_u32::<LittleEndian>(0)?;

        for entry in &self.entries {
            writer.write_u64::<LittleEndian>(entry.cache_id)?;
            writer.write_u64::<LittleEndian>(entry.offset)?;
            writer.write_u32::<LittleEndian>(entry.stored_size)?;
            writer.write_u32::<LittleEndian>(entry.decompressed_size)?;
            writer.write_u32::<LittleEndian>(entry.flags())?;
        }

        Ok(())
    }

    /// Select entries matching `predicate`, preserving their original index
    /// positions.
    ///
    /// The source list is not mutated; each selected record is returned
    /// together with its index so callers can fetch and name output
    /// correctly from a non-contiguous subset.
    pub fn filter(&self, predicate: impl Fn(&EntryRecord) -> bool) -> Vec<(usize, EntryRecord)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| predicate(entry))
            .map(|(index, entry)| (index, *entry))
            .collect()
    }
}
