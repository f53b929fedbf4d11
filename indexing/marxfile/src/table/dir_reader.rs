use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::recordfile::{ReadOptions, read_record_with};

use super::common::Table;
use super::errors::TableError;
use super::params::read_params;

pub const DATA_EXTENSION: &str = "dat";
pub const DEFAULT_PAR_FILE: &str = "marx.par";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Column files to read, without the `.dat` suffix. `None` reads every
    /// `.dat` file in the directory.
    pub columns: Option<Vec<String>>,
    pub par_file: Option<String>,
    pub read: ReadOptions,
}

impl TableConfig {
    /// Restricts the table to the given columns, e.g. `["xpos", "energy"]`.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.columns = Some(columns.into_iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    pub fn with_read_options(mut self, read: ReadOptions) -> Self {
        self.read = read;
        self
    }

    pub fn par_file_name(&self) -> &str {
        self.par_file.as_deref().unwrap_or(DEFAULT_PAR_FILE)
    }
}

/// Lists the column names (file stems) of every `.dat` file in `dir`, sorted.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed.
pub fn list_columns(dir: &Path) -> Result<Vec<String>, TableError> {
    let io_err = |source: std::io::Error| TableError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(DATA_EXTENSION) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Reads a MARX output directory into a table.
///
/// Column files that are missing or are not record files are skipped with a
/// warning. Any other decode failure aborts the whole read, so a returned
/// table is always complete. The parameter file is required.
///
/// # Errors
///
/// Returns an error if the directory cannot be listed, a column is corrupt,
/// columns disagree in length, or the parameter file cannot be read.
pub fn read_dir_table<P: AsRef<Path>>(dir: P, config: &TableConfig) -> Result<Table, TableError> {
    let dir = dir.as_ref();
    let names = match &config.columns {
        Some(columns) => columns.clone(),
        None => list_columns(dir)?,
    };

    let mut table = Table::new();
    for name in &names {
        let path = dir.join(format!("{name}.{DATA_EXTENSION}"));
        match read_record_with(&path, &config.read) {
            Ok(record) => table.insert(record.name, record.column)?,
            Err(err) if err.is_skippable() => {
                warn!(column = %name, error = %err, "skipping column");
            }
            Err(err) => return Err(err.into()),
        }
    }

    table.extend_meta(read_params(dir.join(config.par_file_name()))?);
    debug!(
        dir = %dir.display(),
        columns = table.num_columns(),
        rows = table.len(),
        "read table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recordfile::common::record_bytes;
    use crate::table::params::ParamValue;

    fn write_record(dir: &Path, file: &str, tag: u8, name: &str, rows: i32, payload: &[u8]) {
        fs::write(
            dir.join(format!("{file}.dat")),
            record_bytes(tag, name, rows, 0, payload),
        )
        .expect("err writing record");
    }

    fn write_par(dir: &Path) {
        fs::write(dir.join(DEFAULT_PAR_FILE), "NumRays,i,a,2\nDetIdeal,b,h,yes\n")
            .expect("err writing par file");
    }

    #[test]
    fn test_read_all_columns() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "xpos", b'E', "xpos", 2, &[0x3f, 0x80, 0, 0, 0x40, 0, 0, 0]);
        write_record(dir.path(), "pha", b'I', "pha", 2, &[0, 9, 0, 10]);
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        write_par(dir.path());

        let table = read_dir_table(dir.path(), &TableConfig::default()).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["pha", "xpos"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("xpos").unwrap().value_f64(1, 0), Some(2.0));
        assert_eq!(table.meta()["NumRays"], ParamValue::Int(2));
        assert_eq!(table.meta()["DetIdeal"], ParamValue::Bool(true));
    }

    #[test]
    fn test_selected_columns_skip_missing() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "pha", b'I', "pha", 1, &[0, 9]);
        fs::write(dir.path().join("bad.dat"), [0u8; 36]).unwrap();
        write_par(dir.path());

        let config = TableConfig::default().with_columns(["energy", "pha", "bad"]);
        let table = read_dir_table(dir.path(), &config).unwrap();
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["pha"]);
    }

    #[test]
    fn test_uses_header_name() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "col0", b'A', "time", 1, &[4]);
        write_par(dir.path());

        let table = read_dir_table(dir.path(), &TableConfig::default()).unwrap();
        assert!(table.column("time").is_some());
        assert!(table.column("col0").is_none());
    }

    #[test]
    fn test_corrupt_column_aborts() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "xpos", b'Z', "xpos", 1, &[0]);
        write_par(dir.path());

        let err = read_dir_table(dir.path(), &TableConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            TableError::Record(crate::recordfile::RecordError::UnknownTypeTag { .. })
        ));
    }

    #[test]
    fn test_missing_par_file() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "pha", b'I', "pha", 1, &[0, 9]);
        let err = read_dir_table(dir.path(), &TableConfig::default()).unwrap_err();
        assert!(matches!(err, TableError::Params(_)));
    }

    #[test]
    fn test_config_from_json() {
        let config: TableConfig = serde_json::from_str(
            r#"{"columns": ["xpos"], "par_file": "run.par", "read": {"strict": true}}"#,
        )
        .unwrap();
        assert_eq!(config.columns, Some(vec!["xpos".to_string()]));
        assert_eq!(config.par_file_name(), "run.par");
        assert!(config.read.strict);

        let config: TableConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TableConfig::default());
        assert_eq!(config.par_file_name(), DEFAULT_PAR_FILE);
    }

    #[test]
    fn test_strict_option_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        write_record(dir.path(), "pha", b'I', "pha", 3, &[0, 9]);
        write_par(dir.path());

        let lenient = read_dir_table(dir.path(), &TableConfig::default()).unwrap();
        assert_eq!(lenient.len(), 1);

        let config = TableConfig::default().with_read_options(ReadOptions::strict());
        let err = read_dir_table(dir.path(), &config).unwrap_err();
        assert!(matches!(err, TableError::Record(_)));
    }
}
