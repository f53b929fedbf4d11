//! Decoding of single MARX record files.
//!
//! A record is a 32 byte header (magic, type tag, column name, row and
//! column counts) followed by a big-endian payload of one element type.

pub mod array;
pub mod common;
pub mod element;
pub mod errors;
pub mod file_decoder;

pub use array::{Array, Column, Shape};
pub use common::{HEADER_SIZE, Header, MAGIC};
pub use element::{ELEMENT_TYPES, Element, ElementType};
pub use errors::RecordError;
pub use file_decoder::{ReadOptions, Record, decode_record, read_record, read_record_with};
