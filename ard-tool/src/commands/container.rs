//! Standalone XBC1 container commands

use anyhow::Context;
use clap::Subcommand;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::CompressionArg;

#[derive(Subcommand)]
pub enum ContainerCommands {
    /// Compress a file into an XBC1 container
    Compress {
        /// File to compress
        input: PathBuf,

        /// Output path (default: input with an .xbc1 extension)
        output: Option<PathBuf>,

        /// Compression kind
        #[arg(short, long, value_enum, default_value = "zlib")]
        kind: CompressionArg,

        /// Compression level (zlib 1-9, zstd 1-19)
        #[arg(short, long)]
        level: Option<u8>,

        /// Name embedded in the container header (default: input file name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Decompress an XBC1 container
    Decompress {
        /// Container to decompress
        input: PathBuf,

        /// Output path (default: input with a .dec extension)
        output: Option<PathBuf>,
    },
}

pub fn handle(cmd: ContainerCommands) -> anyhow::Result<()> {
    match cmd {
        ContainerCommands::Compress {
            input,
            output,
            kind,
            level,
            name,
        } => compress(&input, output, kind, level, name),
        ContainerCommands::Decompress { input, output } => decompress(&input, output),
    }
}

fn compress(
    input: &Path,
    output: Option<PathBuf>,
    kind: CompressionArg,
    level: Option<u8>,
    name: Option<String>,
) -> anyhow::Result<()> {
    let data = fs::read(input).with_context(|| format!("reading {}", input.display()))?;

    let name = name.unwrap_or_else(|| {
        input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let container = xbc1::compress(&data, kind.into(), level, &name)?;

    let output = output.unwrap_or_else(|| input.with_extension("xbc1"));
    fs::write(&output, &container).with_context(|| format!("writing {}", output.display()))?;

    info!(
        "Compressed {} -> {}: {} -> {} bytes",
        input.display(),
        output.display(),
        data.len(),
        container.len()
    );
    Ok(())
}

fn decompress(input: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let container = fs::read(input).with_context(|| format!("reading {}", input.display()))?;

    let data = xbc1::decompress(&container)?;

    let output = output.unwrap_or_else(|| input.with_extension("dec"));
    fs::write(&output, &data).with_context(|| format!("writing {}", output.display()))?;

    info!(
        "Decompressed {} -> {}: {} -> {} bytes",
        input.display(),
        output.display(),
        container.len(),
        data.len()
    );
    Ok(())
}
