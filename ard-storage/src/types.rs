//! Common types used throughout the archive engine

use std::path::PathBuf;

use crate::error::ArdError;

/// Alignment boundary for entry offsets within the ARD data file.
///
/// Construction pads every appended entry with zeros up to the next
/// multiple; all recorded offsets are multiples of this constant.
pub const ARD_ALIGNMENT: u64 = 16;

/// How an entry's bytes are stored in the ARD data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredFormat {
    /// Bytes stored as-is
    Raw,
    /// Bytes are a complete XBC1 container
    Xbc1,
}

/// Content tag recorded in an entry's flags, used for filtered extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Unclassified content
    Unknown,
    /// BDAT table data
    Bdat,
}

impl ContentKind {
    /// Parse a content tag from its flags byte. Unrecognized tags read as
    /// `Unknown` so newer archives stay extractable.
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            1 => Self::Bdat,
            _ => Self::Unknown,
        }
    }

    /// Flags-byte value of this content tag.
    pub fn as_tag(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Bdat => 1,
        }
    }

    /// Extension given to extracted files of this kind.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Unknown => ".dec",
            Self::Bdat => ".bdat",
        }
    }
}

/// One entry of the ARH index.
///
/// Entries are addressed by their position in the index; the record carries
/// everything needed to fetch and decode the entry's ARD range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRecord {
    /// Identifier naming the entry, also the extracted file's stem
    pub cache_id: u64,
    /// Byte offset of the entry within the ARD file
    pub offset: u64,
    /// Size of the stored bytes on disk
    pub stored_size: u32,
    /// Size of the entry after decompression (equals `stored_size` for raw
    /// entries)
    pub decompressed_size: u32,
    /// Whether the stored bytes are an XBC1 container or raw passthrough
    pub format: StoredFormat,
    /// Content tag used for filtering
    pub content: ContentKind,
}

/// Flag bit marking an entry's stored bytes as an XBC1 container
const FLAG_XBC1: u32 = 1;
/// Bit position of the content tag within the flags word
const TAG_SHIFT: u32 = 8;

impl EntryRecord {
    /// Flags word as stored in the ARH record.
    pub fn flags(&self) -> u32 {
        let container = match self.format {
            StoredFormat::Raw => 0,
            StoredFormat::Xbc1 => FLAG_XBC1,
        };
        container | (u32::from(self.content.as_tag()) << TAG_SHIFT)
    }

    /// Decode the stored format and content tag from a flags word.
    pub fn decode_flags(flags: u32) -> (StoredFormat, ContentKind) {
        let format = if flags & FLAG_XBC1 != 0 {
            StoredFormat::Xbc1
        } else {
            StoredFormat::Raw
        };
        let content = ContentKind::from_tag(((flags >> TAG_SHIFT) & 0xFF) as u8);
        (format, content)
    }

    /// Name of the file this entry extracts to.
    pub fn file_name(&self) -> String {
        format!("{:016x}{}", self.cache_id, self.content.extension())
    }
}

/// Predicate over entry records, used to select a subset for extraction.
pub type EntryPredicate = dyn Fn(&EntryRecord) -> bool + Sync;

/// Classifier mapping raw file content to a content tag during
/// construction. Supplied by the caller; the engine treats it as opaque.
pub type ContentClassifier = dyn Fn(&[u8]) -> ContentKind + Sync;

/// One input file for archive construction.
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Path to read the file from
    pub path: PathBuf,
    /// Cache id recorded in the entry
    pub cache_id: u64,
    /// Entry name: construction sort key, also embedded in XBC1 headers
    pub name: String,
}

/// Extraction failure for a single entry.
#[derive(Debug)]
pub struct EntryFailure {
    /// Position of the entry in the ARH index
    pub index: usize,
    /// Cache id of the failed entry
    pub cache_id: u64,
    /// What went wrong
    pub error: ArdError,
}

/// Outcome of an extraction run.
#[derive(Debug, Default)]
pub struct ExtractSummary {
    /// Entries selected after filtering
    pub selected: usize,
    /// Entries successfully written out
    pub written: usize,
    /// Total decompressed bytes written
    pub bytes_written: u64,
    /// Per-entry failures, in index order
    pub failures: Vec<EntryFailure>,
}

impl ExtractSummary {
    /// `true` if every selected entry was extracted.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Options for extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Worker count; `None` uses the host's available parallelism
    pub workers: Option<usize>,
}

/// Options for archive construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Compression kind for entries; `None` stores entries raw
    pub compression: Option<xbc1::CompressionKind>,
    /// Compression level passed through to the codec
    pub level: Option<u8>,
    /// Store an entry raw when its encoded container would not be smaller
    pub store_raw_when_larger: bool,
    /// Worker count; `None` uses the host's available parallelism
    pub workers: Option<usize>,
}

/// Outcome of a construction run.
#[derive(Debug)]
pub struct BuildSummary {
    /// Number of entries written to the archive
    pub entries: usize,
    /// Final size of the ARD data file, padding included
    pub ard_bytes: u64,
}
