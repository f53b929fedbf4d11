use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

const NAME_FIELD: usize = 0;
const TYPE_FIELD: usize = 1;
const VALUE_FIELD: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("failed to open parameter file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed parameter file: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: missing {field} field")]
    MissingField { line: u64, field: &'static str },

    #[error("line {line}: unknown parameter type {code:?}")]
    UnknownType { line: u64, code: String },

    #[error("line {line}: {name} = {value:?} is not a valid {kind}")]
    InvalidValue {
        line: u64,
        name: String,
        value: String,
        kind: ParamKind,
    },
}

/// Parameter type codes of the `marx.par` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Boolean,
    Filename,
    Integer,
    Real,
    Text,
}

impl ParamKind {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "b" => Some(ParamKind::Boolean),
            "f" => Some(ParamKind::Filename),
            "i" => Some(ParamKind::Integer),
            "r" => Some(ParamKind::Real),
            "s" => Some(ParamKind::Text),
            _ => None,
        }
    }

    /// Converts a raw value. Booleans are true only for `yes`; filenames and
    /// strings are kept as written.
    pub fn convert(self, raw: &str) -> Option<ParamValue> {
        match self {
            ParamKind::Boolean => Some(ParamValue::Bool(raw.trim() == "yes")),
            ParamKind::Filename | ParamKind::Text => Some(ParamValue::Text(raw.to_string())),
            ParamKind::Integer => raw.trim().parse().ok().map(ParamValue::Int),
            ParamKind::Real => raw.trim().parse().ok().map(ParamValue::Real),
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ParamKind::Boolean => "boolean",
            ParamKind::Filename => "filename",
            ParamKind::Integer => "integer",
            ParamKind::Real => "real",
            ParamKind::Text => "string",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    Text(String),
}

pub type Params = BTreeMap<String, ParamValue>;

/// Reads the parameter file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a line cannot be parsed.
pub fn read_params<P: AsRef<Path>>(path: P) -> Result<Params, ParamError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| ParamError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_params(file)
}

/// Parses `name,type,mode,value,min,max,prompt` lines. Lines starting with
/// `#` and blank lines are skipped.
pub fn parse_params<R: io::Read>(reader: R) -> Result<Params, ParamError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut params = Params::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        if record.iter().all(str::is_empty) {
            continue;
        }

        let field = |idx: usize, what: &'static str| {
            record
                .get(idx)
                .ok_or(ParamError::MissingField { line, field: what })
        };
        let name = field(NAME_FIELD, "name")?;
        let code = field(TYPE_FIELD, "type")?;
        let raw = field(VALUE_FIELD, "value")?;

        let kind = ParamKind::from_code(code).ok_or_else(|| ParamError::UnknownType {
            line,
            code: code.to_string(),
        })?;
        let value = kind.convert(raw).ok_or_else(|| ParamError::InvalidValue {
            line,
            name: name.to_string(),
            value: raw.to_string(),
            kind,
        })?;

        debug!(name, ?value, "read parameter");
        params.insert(name.to_string(), value);
    }
    Ok(params)
}
