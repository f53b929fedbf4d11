use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is too short for a record header ({len} bytes)", path.display())]
    TruncatedHeader { path: PathBuf, len: usize },

    #[error("{} is not a valid marx file (magic {found:?})", path.display())]
    InvalidMagic { path: PathBuf, found: [u8; 4] },

    #[error("{}: unknown type tag {:?}", path.display(), char::from(*tag))]
    UnknownTypeTag { path: PathBuf, tag: u8 },

    #[error(
        "{}: payload of {len} bytes is not a multiple of the element size {element_size}",
        path.display()
    )]
    PayloadSize {
        path: PathBuf,
        len: usize,
        element_size: usize,
    },

    #[error("{}: cannot shape {elements} elements as {rows} x {cols}", path.display())]
    Shape {
        path: PathBuf,
        elements: usize,
        rows: i32,
        cols: i32,
    },
}

impl RecordError {
    /// Errors the directory reader treats as an absent column rather than a
    /// broken one: unreadable files and files that are not records at all.
    pub fn is_skippable(&self) -> bool {
        matches!(self, RecordError::Io { .. } | RecordError::InvalidMagic { .. })
    }
}
