use std::path::Path;

use zerocopy::FromBytes;
use zerocopy::byteorder::{BigEndian, I32};
use zerocopy_derive::{FromBytes, Immutable, KnownLayout, Unaligned};

use super::element::ElementType;
use super::errors::RecordError;

pub const MAGIC: [u8; 4] = [131, 19, 137, 141];
pub const HEADER_SIZE: usize = 32;
pub const NAME_SIZE: usize = 15;

/// On-disk layout of the 32 byte record header.
#[derive(Debug, FromBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
struct RawHeader {
    magic: [u8; 4],
    tag: u8,
    name: [u8; NAME_SIZE],
    rows: I32<BigEndian>,
    cols: I32<BigEndian>,
    _reserved: I32<BigEndian>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub element: ElementType,
    pub name: String,
    pub rows: i32,
    /// `<= 0` means the payload is one dimensional.
    pub cols: i32,
}

impl Header {
    /// Splits `buff` into the decoded header and the payload that follows it.
    ///
    /// # Errors
    ///
    /// Fails when the buffer is shorter than a header, when the magic bytes
    /// do not match, or when the type tag is not one of the known codes.
    pub fn parse<'a>(buff: &'a [u8], path: &Path) -> Result<(Header, &'a [u8]), RecordError> {
        let (raw, payload) =
            RawHeader::read_from_prefix(buff).map_err(|_| RecordError::TruncatedHeader {
                path: path.to_path_buf(),
                len: buff.len(),
            })?;

        if raw.magic != MAGIC {
            return Err(RecordError::InvalidMagic {
                path: path.to_path_buf(),
                found: raw.magic,
            });
        }

        let element = ElementType::from_tag(raw.tag).ok_or_else(|| RecordError::UnknownTypeTag {
            path: path.to_path_buf(),
            tag: raw.tag,
        })?;

        Ok((
            Header {
                element,
                name: decode_name(&raw.name),
                rows: raw.rows.get(),
                cols: raw.cols.get(),
            },
            payload,
        ))
    }

    pub fn is_flat(&self) -> bool {
        self.cols <= 0
    }
}

fn decode_name(field: &[u8]) -> String {
    let end = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// Builds a complete record file image for tests.
#[cfg(test)]
pub(crate) fn record_bytes(tag: u8, name: &str, rows: i32, cols: i32, payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(HEADER_SIZE + payload.len());
    data.extend_from_slice(&MAGIC);
    data.push(tag);
    let mut field = [0u8; NAME_SIZE];
    field[..name.len()].copy_from_slice(name.as_bytes());
    data.extend_from_slice(&field);
    data.extend_from_slice(&rows.to_be_bytes());
    data.extend_from_slice(&cols.to_be_bytes());
    data.extend_from_slice(&0i32.to_be_bytes());
    data.extend_from_slice(payload);
    data
}
