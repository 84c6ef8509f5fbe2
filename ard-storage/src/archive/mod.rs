//! ARD data plane: random-access reads and alignment-aware appends

mod archive_reader;
mod archive_writer;

pub use archive_reader::ArdReader;
pub use archive_writer::ArdWriter;
