use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::array::{Array, Column};
use super::common::Header;
use super::element::{Element, ElementType};
use super::errors::RecordError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Reject flat payloads whose element count differs from the header's
    /// row count. Matrix payloads are always checked.
    pub strict: bool,
}

impl ReadOptions {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// One decoded record file.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub column: Column,
}

/// Reads and decodes the record file at `path` with the default options.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid record.
pub fn read_record<P: AsRef<Path>>(path: P) -> Result<Record, RecordError> {
    read_record_with(path, &ReadOptions::default())
}

/// Reads the whole file into memory, releases it, then decodes the bytes.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid record.
pub fn read_record_with<P: AsRef<Path>>(
    path: P,
    options: &ReadOptions,
) -> Result<Record, RecordError> {
    let path = path.as_ref();
    let buff = fs::read(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_record(&buff, path, options)
}

/// Decodes a record already held in memory. `path` only labels errors.
///
/// # Errors
///
/// Returns an error if the header is invalid or the payload does not fit
/// the declared shape.
pub fn decode_record(
    buff: &[u8],
    path: &Path,
    options: &ReadOptions,
) -> Result<Record, RecordError> {
    let (header, payload) = Header::parse(buff, path)?;
    let column = match header.element {
        ElementType::Int8 => decode_column::<i8>(&header, payload, path, options)?,
        ElementType::Int16 => decode_column::<i16>(&header, payload, path, options)?,
        ElementType::Int32 => decode_column::<i32>(&header, payload, path, options)?,
        ElementType::Float32 => decode_column::<f32>(&header, payload, path, options)?,
        ElementType::Float64 => decode_column::<f64>(&header, payload, path, options)?,
    };
    debug!(
        path = %path.display(),
        name = %header.name,
        element = %header.element,
        shape = ?column.shape().dims(),
        "decoded record"
    );
    Ok(Record {
        name: header.name,
        column,
    })
}

fn decode_column<T: Element>(
    header: &Header,
    payload: &[u8],
    path: &Path,
    options: &ReadOptions,
) -> Result<Column, RecordError> {
    let data = T::decode_be(payload).ok_or_else(|| RecordError::PayloadSize {
        path: path.to_path_buf(),
        len: payload.len(),
        element_size: T::TYPE.size(),
    })?;
    let elements = data.len();
    let shape_error = || RecordError::Shape {
        path: path.to_path_buf(),
        elements,
        rows: header.rows,
        cols: header.cols,
    };

    let array = Array::flat(data);
    let array = if header.is_flat() {
        if options.strict && usize::try_from(header.rows).ok() != Some(elements) {
            return Err(shape_error());
        }
        array
    } else {
        let rows = usize::try_from(header.rows).map_err(|_| shape_error())?;
        let cols = usize::try_from(header.cols).map_err(|_| shape_error())?;
        array.reshape(rows, cols).ok_or_else(shape_error)?
    };
    Ok(T::into_column(array))
}
