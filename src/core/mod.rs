//! Core eBilanz types: document model, row classification, namespace
//! registry and the error taxonomy.
//!
//! Nothing in here touches the filesystem or XML; the transformations live
//! in the `ebilanz` module.

mod builder;
mod error;
pub mod fields;
mod namespace;
mod types;

pub use builder::*;
pub use error::*;
pub use fields::{ReservedField, RowKind, classify};
pub use namespace::*;
pub use types::*;
