//! DB2 source dialect.

pub mod model;
pub mod parser;

pub use model::{Db2Column, Db2TableKind, PartitionKind, PartitionSpec, SessionScope, TableDefinition};
pub use parser::Db2Parser;
