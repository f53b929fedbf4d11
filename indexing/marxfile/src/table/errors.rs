use std::io;
use std::path::PathBuf;

use crate::recordfile::RecordError;

use super::params::ParamError;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("failed to list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("column {name} has {found} rows, table has {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("column {name} already exists")]
    DuplicateColumn { name: String },

    #[error(transparent)]
    Params(#[from] ParamError),
}
