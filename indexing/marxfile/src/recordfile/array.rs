use num_traits::ToPrimitive;
use serde::ser::{Serialize, Serializer};

use super::element::{Element, ElementType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Flat(usize),
    Matrix { rows: usize, cols: usize },
}

impl Shape {
    /// Length of the first dimension.
    pub fn rows(&self) -> usize {
        match *self {
            Shape::Flat(len) => len,
            Shape::Matrix { rows, .. } => rows,
        }
    }

    pub fn dims(&self) -> Vec<usize> {
        match *self {
            Shape::Flat(len) => vec![len],
            Shape::Matrix { rows, cols } => vec![rows, cols],
        }
    }
}

/// A decoded payload: a flat element buffer in row-major order plus its shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<T> {
    data: Vec<T>,
    shape: Shape,
}

impl<T: Element> Array<T> {
    pub fn flat(data: Vec<T>) -> Self {
        let shape = Shape::Flat(data.len());
        Self { data, shape }
    }

    /// Reinterprets the buffer as `rows x cols`. Returns `None` when the
    /// element count does not match or `cols` is zero.
    pub fn reshape(self, rows: usize, cols: usize) -> Option<Self> {
        if cols == 0 || rows.checked_mul(cols)? != self.data.len() {
            return None;
        }
        Some(Self {
            data: self.data,
            shape: Shape::Matrix { rows, cols },
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.shape.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Row `i` of a matrix, or a one element slice of a flat array.
    pub fn row(&self, i: usize) -> Option<&[T]> {
        match self.shape {
            Shape::Flat(_) => self.data.get(i..i.checked_add(1)?),
            Shape::Matrix { cols, .. } => {
                let start = i.checked_mul(cols)?;
                self.data.get(start..start.checked_add(cols)?)
            }
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        match self.shape {
            Shape::Flat(_) if col == 0 => self.data.get(row).copied(),
            Shape::Flat(_) => None,
            Shape::Matrix { rows, cols } if row < rows && col < cols => {
                self.data.get(row * cols + col).copied()
            }
            Shape::Matrix { .. } => None,
        }
    }
}

impl<T: Element> Serialize for Array<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.shape {
            Shape::Flat(_) => serializer.collect_seq(&self.data),
            Shape::Matrix { cols, .. } => serializer.collect_seq(self.data.chunks(cols)),
        }
    }
}

/// A typed column as read from one record file.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int8(Array<i8>),
    Int16(Array<i16>),
    Int32(Array<i32>),
    Float32(Array<f32>),
    Float64(Array<f64>),
}

macro_rules! with_array {
    ($column:expr, $array:ident => $body:expr) => {
        match $column {
            Column::Int8($array) => $body,
            Column::Int16($array) => $body,
            Column::Int32($array) => $body,
            Column::Float32($array) => $body,
            Column::Float64($array) => $body,
        }
    };
}

impl Column {
    pub fn element_type(&self) -> ElementType {
        match self {
            Column::Int8(_) => ElementType::Int8,
            Column::Int16(_) => ElementType::Int16,
            Column::Int32(_) => ElementType::Int32,
            Column::Float32(_) => ElementType::Float32,
            Column::Float64(_) => ElementType::Float64,
        }
    }

    pub fn shape(&self) -> Shape {
        with_array!(self, a => a.shape())
    }

    pub fn len(&self) -> usize {
        with_array!(self, a => a.len())
    }

    pub fn is_empty(&self) -> bool {
        with_array!(self, a => a.is_empty())
    }

    pub fn as_array<T: Element>(&self) -> Option<&Array<T>> {
        T::from_column(self)
    }

    /// Any element widened to `f64`; `col` must be 0 for flat columns.
    pub fn value_f64(&self, row: usize, col: usize) -> Option<f64> {
        with_array!(self, a => a.get(row, col).and_then(|v| v.to_f64()))
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        with_array!(self, a => a.serialize(serializer))
    }
}
