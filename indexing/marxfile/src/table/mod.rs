//! Assembly of a MARX output directory (one `.dat` record per column plus
//! the `marx.par` parameter file) into a single [`Table`].

pub mod common;
pub mod dir_reader;
pub mod errors;
pub mod params;

pub use common::Table;
pub use dir_reader::{DEFAULT_PAR_FILE, TableConfig, list_columns, read_dir_table};
pub use errors::TableError;
pub use params::{ParamError, ParamKind, ParamValue, Params, parse_params, read_params};
