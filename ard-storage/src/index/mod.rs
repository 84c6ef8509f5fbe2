//! ARH index parsing and serialization

mod arh;

pub use arh::{ARH_ENTRY_SIZE, ARH_HEADER_SIZE, ARH_MAGIC, ArhIndex};
