//! ARD/ARH archive commands

use anyhow::{Context, bail};
use clap::Args;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

use ard_storage::{
    BuildOptions, ContentKind, EntryRecord, ExtractOptions, InputFile, build_archive,
    extract_archive,
};

use super::CompressionArg;

#[derive(Args)]
pub struct ExtractArgs {
    /// ARD data file
    pub ard: PathBuf,

    /// ARH index file
    pub arh: PathBuf,

    /// Output directory (default: ARD path with an _extracted suffix)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only extract entries tagged as BDAT tables
    #[arg(long)]
    pub only_bdat: bool,

    /// Worker thread count (default: host parallelism)
    #[arg(short, long)]
    pub workers: Option<usize>,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Directory of files to archive
    pub input_dir: PathBuf,

    /// ARD data file to create
    pub ard: PathBuf,

    /// ARH index file to create
    pub arh: PathBuf,

    /// Compress entries into XBC1 containers with this kind
    #[arg(short, long, value_enum)]
    pub compress: Option<CompressionArg>,

    /// Compression level (zlib 1-9, zstd 1-19)
    #[arg(short, long)]
    pub level: Option<u8>,

    /// Store an entry raw when compression would not shrink it
    #[arg(long)]
    pub store_raw_when_larger: bool,

    /// Worker thread count (default: host parallelism)
    #[arg(short, long)]
    pub workers: Option<usize>,
}

pub fn handle_extract(args: ExtractArgs) -> anyhow::Result<()> {
    let output = args.output.unwrap_or_else(|| {
        let mut name = args.ard.file_stem().unwrap_or_default().to_os_string();
        name.push("_extracted");
        args.ard.with_file_name(name)
    });

    let bdat_only = |entry: &EntryRecord| entry.content == ContentKind::Bdat;
    let filter: Option<&ard_storage::EntryPredicate> = if args.only_bdat {
        Some(&bdat_only)
    } else {
        None
    };

    let options = ExtractOptions {
        workers: args.workers,
    };
    let summary = extract_archive(&args.ard, &args.arh, &output, filter, &options)?;

    info!(
        "Extracted {} of {} entries to {}",
        summary.written,
        summary.selected,
        output.display()
    );

    if !summary.is_complete() {
        bail!(
            "{} of {} entries failed to extract",
            summary.failures.len(),
            summary.selected
        );
    }
    Ok(())
}

pub fn handle_create(args: CreateArgs) -> anyhow::Result<()> {
    let inputs = collect_inputs(&args.input_dir)?;
    if inputs.is_empty() {
        bail!("no input files found under {}", args.input_dir.display());
    }
    info!(
        "Found {} files to archive under {}",
        inputs.len(),
        args.input_dir.display()
    );

    let options = BuildOptions {
        compression: args.compress.map(Into::into),
        level: args.level,
        store_raw_when_larger: args.store_raw_when_larger,
        workers: args.workers,
    };
    let summary = build_archive(inputs, &args.ard, &args.arh, Some(&classify_content), &options)?;

    info!(
        "Created {} ({} bytes) and {} with {} entries",
        args.ard.display(),
        summary.ard_bytes,
        args.arh.display(),
        summary.entries
    );
    Ok(())
}

/// Walk the input directory and list files in lexicographic order by
/// relative path.
fn collect_inputs(dir: &Path) -> anyhow::Result<Vec<InputFile>> {
    let mut inputs = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");

        inputs.push(InputFile {
            cache_id: derive_cache_id(&relative),
            name: relative,
            path: entry.into_path(),
        });
    }

    inputs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(inputs)
}

/// Derive an entry's cache id from its relative path.
///
/// File stems that already look like hex cache ids (as produced by
/// extraction) are parsed back; anything else hashes the relative path.
fn derive_cache_id(relative: &str) -> u64 {
    let stem = Path::new(relative)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if !stem.is_empty()
        && stem.len() <= 16
        && stem.chars().all(|c| c.is_ascii_hexdigit())
        && let Ok(id) = u64::from_str_radix(&stem, 16)
    {
        return id;
    }

    let mut hasher = DefaultHasher::new();
    relative.hash(&mut hasher);
    hasher.finish()
}

/// Content classifier handed to the archive engine: tag BDAT tables by
/// their magic so they can be filtered at extraction time.
fn classify_content(data: &[u8]) -> ContentKind {
    if data.starts_with(b"BDAT") {
        ContentKind::Bdat
    } else {
        ContentKind::Unknown
    }
}
