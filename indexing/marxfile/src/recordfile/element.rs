use std::fmt;

use num_traits::ToPrimitive;
use serde::Serialize;
use zerocopy::FromBytes;
use zerocopy::byteorder::{BigEndian, F32, F64, I16, I32};

use super::array::{Array, Column};

/// Element encodings a record payload may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Int8,
    Int16,
    Int32,
    Float32,
    Float64,
}

pub const ELEMENT_TYPES: [ElementType; 5] = [
    ElementType::Int8,
    ElementType::Int16,
    ElementType::Int32,
    ElementType::Float32,
    ElementType::Float64,
];

impl ElementType {
    pub const fn tag(self) -> u8 {
        match self {
            ElementType::Int8 => b'A',
            ElementType::Int16 => b'I',
            ElementType::Int32 => b'J',
            ElementType::Float32 => b'E',
            ElementType::Float64 => b'D',
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        ELEMENT_TYPES.into_iter().find(|t| t.tag() == tag)
    }

    /// Width of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            ElementType::Int8 => 1,
            ElementType::Int16 => 2,
            ElementType::Int32 | ElementType::Float32 => 4,
            ElementType::Float64 => 8,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ElementType::Int8 => "int8",
            ElementType::Int16 => "int16",
            ElementType::Int32 => "int32",
            ElementType::Float32 => "float32",
            ElementType::Float64 => "float64",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod private {
    pub trait Sealed {}
}

/// A Rust primitive that one of the record type tags decodes into.
pub trait Element:
    private::Sealed + Copy + fmt::Debug + PartialEq + ToPrimitive + Serialize + 'static
{
    const TYPE: ElementType;

    /// Decodes a big-endian payload. Returns `None` when the payload length
    /// is not a whole number of elements.
    fn decode_be(payload: &[u8]) -> Option<Vec<Self>>;

    fn into_column(array: Array<Self>) -> Column;

    fn from_column(column: &Column) -> Option<&Array<Self>>;
}

macro_rules! impl_element {
    ($($t:ty => $wire:ty, $variant:ident);* $(;)?) => {
        $(
        impl private::Sealed for $t {}

        impl Element for $t {
            const TYPE: ElementType = ElementType::$variant;

            fn decode_be(payload: &[u8]) -> Option<Vec<Self>> {
                let wire = <[$wire]>::ref_from_bytes(payload).ok()?;
                Some(wire.iter().map(|&v| <$t>::from(v)).collect())
            }

            fn into_column(array: Array<Self>) -> Column {
                Column::$variant(array)
            }

            fn from_column(column: &Column) -> Option<&Array<Self>> {
                match column {
                    Column::$variant(array) => Some(array),
                    _ => None,
                }
            }
        })*
    };
}

impl_element!(
    i8 => i8, Int8;
    i16 => I16<BigEndian>, Int16;
    i32 => I32<BigEndian>, Int32;
    f32 => F32<BigEndian>, Float32;
    f64 => F64<BigEndian>, Float64;
);
