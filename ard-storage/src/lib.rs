//! ARD/ARH split archive engine
//!
//! An archive is a pair of files: the ARH index describing entries (offset,
//! sizes, flags, content tag) and the ARD data blob holding the entry bytes
//! at 16-byte-aligned offsets, each either raw or wrapped in an XBC1
//! container. This crate provides index parsing and serialization, a
//! random-access data plane over the ARD file, and the extraction and
//! construction engines, parallelized across entries by a worker pool.

pub mod archive;
pub mod engine;
pub mod error;
pub mod index;
pub mod types;
pub mod worker;

pub use archive::{ArdReader, ArdWriter};
pub use engine::{build_archive, extract_archive};
pub use error::{ArdError, Result};
pub use index::ArhIndex;
pub use types::{
    ARD_ALIGNMENT, BuildOptions, BuildSummary, ContentClassifier, ContentKind, EntryFailure,
    EntryPredicate, EntryRecord, ExtractOptions, ExtractSummary, InputFile, StoredFormat,
};
pub use worker::WorkerPool;
