//! Vellum Table Interfaces
//!
//! The consumed side of the write engine: tables, selections, document
//! streams and transform functions.
//!
//! Responsibilities:
//! - Define the table mutation contract (`Table`, `SingleSelection`)
//! - Define transform function evaluation (`WriteFunction`)
//! - Define document streams, batch bounds and key-extraction pushdown
//! - Provide an in-memory reference engine (`MemTable`) implementing the
//!   full contract
//!
//! # Module Structure
//!
//! - `table` - The `Table` and `SingleSelection` traits
//! - `func` - The `WriteFunction` trait with constant and closure impls
//! - `stream` - `DatumStream`, `BatchSpec`, `Projection`, `VecStream`
//! - `options` - Policy values of the mutation contract
//! - `mem` - In-memory reference engine
//! - `error` - Error types for table operations

mod error;
mod func;
mod mem;
mod options;
mod stream;
mod table;

pub use error::{TableError, TableResult};
pub use func::{ConstFn, MapFn, WriteFunction};
pub use mem::{MemSelection, MemTable};
pub use options::{ConflictPolicy, Durability, ReturnChanges};
pub use stream::{BatchSpec, DatumStream, Projection, VecStream};
pub use table::{SingleSelection, Table};
