use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};

use crate::recordfile::Column;

use super::errors::TableError;
use super::params::{ParamValue, Params};

/// Named columns of equal length plus run metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
    meta: Params,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column. Every column must have the same number of rows as
    /// the first one inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken or the row count differs.
    pub fn insert(&mut self, name: String, column: Column) -> Result<(), TableError> {
        if self.column(&name).is_some() {
            return Err(TableError::DuplicateColumn { name });
        }
        if let Some((_, first)) = self.columns.first()
            && first.len() != column.len()
        {
            return Err(TableError::ColumnLength {
                name,
                expected: first.len(),
                found: column.len(),
            });
        }
        self.columns.push((name, column));
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Row count shared by every column, 0 for an empty table.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |(_, c)| c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn meta(&self) -> &Params {
        &self.meta
    }

    pub fn set_meta(&mut self, name: impl Into<String>, value: ParamValue) {
        self.meta.insert(name.into(), value);
    }

    pub fn extend_meta(&mut self, params: Params) {
        self.meta.extend(params);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

struct ColumnsView<'a>(&'a [(String, Column)]);

impl Serialize for ColumnsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, column) in self.0 {
            map.serialize_entry(name, column)?;
        }
        map.end()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Table", 2)?;
        state.serialize_field("columns", &ColumnsView(&self.columns))?;
        state.serialize_field("meta", &self.meta)?;
        state.end()
    }
}
