//! Archive construction

use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};
use xbc1::Xbc1Header;

use crate::archive::ArdWriter;
use crate::error::{ArdError, Result};
use crate::index::ArhIndex;
use crate::types::{
    ARD_ALIGNMENT, BuildOptions, BuildSummary, ContentClassifier, ContentKind, EntryRecord,
    InputFile, StoredFormat,
};
use crate::worker::WorkerPool;

/// An entry prepared by a worker, waiting for its ARD append.
struct PreparedEntry {
    cache_id: u64,
    data: Vec<u8>,
    decompressed_size: u32,
    format: StoredFormat,
    content: ContentKind,
}

/// Build an ARD/ARH pair from a set of input files.
///
/// Inputs are ordered by entry name before processing, so the index layout
/// is reproducible for identical input sets regardless of how the caller
/// enumerated them. Payload preparation (read + optional XBC1 encode) runs
/// in the worker pool; the ARD appends happen afterwards, in entry order,
/// through the single coordinating writer. The ARH is written last, only
/// after every entry has been appended and flushed.
///
/// Construction is all-or-nothing: any preparation failure aborts the run
/// before the ARD file is created, and an append failure removes the
/// partial ARD so no plausible-looking broken archive is left behind.
pub fn build_archive(
    mut inputs: Vec<InputFile>,
    ard_path: &Path,
    arh_path: &Path,
    classifier: Option<&ContentClassifier>,
    options: &BuildOptions,
) -> Result<BuildSummary> {
    inputs.sort_by(|a, b| a.name.cmp(&b.name));
    info!("Building archive from {} input files", inputs.len());

    let pool = WorkerPool::new(options.workers);
    let outcomes = pool.run(inputs, |index, input| {
        prepare_entry(&input, classifier, options).map_err(|error| ArdError::EntryFailed {
            index,
            cache_id: input.cache_id,
            source: Box::new(error),
        })
    });

    let mut prepared = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        // The first failed entry aborts the whole construction
        prepared.push(outcome?);
    }

    let mut writer = ArdWriter::create(ard_path, ARD_ALIGNMENT)?;
    let entries = match append_entries(&mut writer, &prepared) {
        Ok(entries) => entries,
        Err(error) => {
            // Do not leave a partial data file behind
            drop(writer);
            let _ = fs::remove_file(ard_path);
            return Err(error);
        }
    };
    let ard_bytes = writer.cursor();
    drop(writer);

    ArhIndex::new(entries).write_file(arh_path)?;

    info!(
        "Built archive: {} entries, {} ARD bytes",
        prepared.len(),
        ard_bytes
    );

    Ok(BuildSummary {
        entries: prepared.len(),
        ard_bytes,
    })
}

/// Append prepared payloads in entry order, recording their offsets.
fn append_entries(writer: &mut ArdWriter, prepared: &[PreparedEntry]) -> Result<Vec<EntryRecord>> {
    let mut entries = Vec::with_capacity(prepared.len());
    for entry in prepared {
        let offset = writer.append(&entry.data)?;
        entries.push(EntryRecord {
            cache_id: entry.cache_id,
            offset,
            stored_size: entry.data.len() as u32,
            decompressed_size: entry.decompressed_size,
            format: entry.format,
            content: entry.content,
        });
    }
    writer.flush()?;
    Ok(entries)
}

/// Read one input file and produce its stored bytes.
fn prepare_entry(
    input: &InputFile,
    classifier: Option<&ContentClassifier>,
    options: &BuildOptions,
) -> Result<PreparedEntry> {
    let raw = fs::read(&input.path)?;

    // Inputs that are already XBC1 containers pass through unchanged, with
    // the decompressed size lifted from their header.
    if raw.len() >= xbc1::HEADER_SIZE && raw[..4] == xbc1::XBC1_MAGIC {
        let header = Xbc1Header::parse(&mut Cursor::new(&raw), raw.len() as u64)?;
        debug!(
            "{}: passing through existing container ({} bytes)",
            input.name,
            raw.len()
        );
        return Ok(PreparedEntry {
            cache_id: input.cache_id,
            decompressed_size: header.decompressed_size,
            data: raw,
            format: StoredFormat::Xbc1,
            content: ContentKind::Unknown,
        });
    }

    let content = classifier.map_or(ContentKind::Unknown, |classify| classify(&raw));
    let decompressed_size = raw.len() as u32;

    let Some(kind) = options.compression else {
        return Ok(PreparedEntry {
            cache_id: input.cache_id,
            data: raw,
            decompressed_size,
            format: StoredFormat::Raw,
            content,
        });
    };

    let container = xbc1::compress(&raw, kind, options.level, &input.name)?;
    if options.store_raw_when_larger && container.len() >= raw.len() {
        debug!(
            "{}: container would expand {} -> {} bytes, storing raw",
            input.name,
            raw.len(),
            container.len()
        );
        return Ok(PreparedEntry {
            cache_id: input.cache_id,
            data: raw,
            decompressed_size,
            format: StoredFormat::Raw,
            content,
        });
    }

    Ok(PreparedEntry {
        cache_id: input.cache_id,
        data: container,
        decompressed_size,
        format: StoredFormat::Xbc1,
        content,
    })
}
