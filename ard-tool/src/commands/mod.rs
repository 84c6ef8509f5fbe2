//! Command handlers

pub mod archive;
pub mod container;

use clap::ValueEnum;
use xbc1::CompressionKind;

/// Compression kinds selectable on the command line.
///
/// The identity kind is not offered here; storing raw data is what the
/// archive does when compression is not requested at all.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CompressionArg {
    Zlib,
    Zstd,
}

impl From<CompressionArg> for CompressionKind {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Zlib => Self::Zlib,
            CompressionArg::Zstd => Self::Zstd,
        }
    }
}
