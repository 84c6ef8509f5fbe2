//! Archive extraction

use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::archive::ArdReader;
use crate::error::Result;
use crate::index::ArhIndex;
use crate::types::{
    EntryFailure, EntryPredicate, EntryRecord, ExtractOptions, ExtractSummary, StoredFormat,
};
use crate::worker::WorkerPool;

/// Extract an ARD/ARH pair into `output_dir`.
///
/// Entries matching `filter` (all entries when `None`) are read from the
/// ARD file, decompressed when stored as XBC1 containers, and written to
/// `output_dir` under names derived from their cache id and content tag.
/// ARD ranges of excluded entries are never touched.
///
/// A single entry's failure is recorded in the summary and does not abort
/// the rest of the batch; top-level failures (unreadable ARH/ARD, output
/// directory creation) fail the whole call before any worker is
/// dispatched.
pub fn extract_archive(
    ard_path: &Path,
    arh_path: &Path,
    output_dir: &Path,
    filter: Option<&EntryPredicate>,
    options: &ExtractOptions,
) -> Result<ExtractSummary> {
    let index = ArhIndex::parse_file(arh_path)?;
    info!("Loaded ARH index: {} entries", index.len());

    let reader = ArdReader::open(ard_path)?;
    fs::create_dir_all(output_dir)?;

    let selected = match filter {
        Some(predicate) => index.filter(predicate),
        None => index.filter(|_| true),
    };
    info!("Extracting {} of {} entries", selected.len(), index.len());

    let pool = WorkerPool::new(options.workers);
    let outcomes = pool.run(selected, |_, (entry_index, record)| {
        extract_entry(&reader, &record, output_dir).map_err(|error| EntryFailure {
            index: entry_index,
            cache_id: record.cache_id,
            error,
        })
    });

    let mut summary = ExtractSummary {
        selected: outcomes.len(),
        ..ExtractSummary::default()
    };
    for outcome in outcomes {
        match outcome {
            Ok(bytes) => {
                summary.written += 1;
                summary.bytes_written += bytes;
            }
            Err(failure) => {
                warn!(
                    "Entry {} ({:016x}) failed: {}",
                    failure.index, failure.cache_id, failure.error
                );
                summary.failures.push(failure);
            }
        }
    }

    info!(
        "Extraction finished: {} written, {} failed, {} bytes",
        summary.written,
        summary.failures.len(),
        summary.bytes_written
    );

    Ok(summary)
}

/// Extract one entry: read its ARD range, decode if it is a container, and
/// write the output file. Returns the number of bytes written.
fn extract_entry(reader: &ArdReader, record: &EntryRecord, output_dir: &Path) -> Result<u64> {
    let stored = reader.read_at(record.offset, record.stored_size as usize)?;

    let data = match record.format {
        StoredFormat::Xbc1 => xbc1::decompress(&stored)?,
        StoredFormat::Raw => stored,
    };

    let path = output_dir.join(record.file_name());
    fs::write(&path, &data)?;

    debug!(
        "Extracted {:016x}: {} -> {} bytes",
        record.cache_id,
        record.stored_size,
        data.len()
    );

    Ok(data.len() as u64)
}
