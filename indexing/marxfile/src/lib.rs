pub mod recordfile;
pub mod table;

pub use recordfile::{
    Array, Column, ElementType, ReadOptions, Record, RecordError, Shape, decode_record,
    read_record, read_record_with,
};
pub use table::{Table, TableConfig, TableError, read_dir_table};
