//! Tariff Rulings Domain Layer
//!
//! Core data model shared by every crate in the workspace: the fixed-schema
//! ruling [`Record`], the [`Field`] names that make up the canonical schema,
//! the two text views of a source document, and the benchmark specification.
//!
//! ## Key Concepts
//!
//! - **Record**: one extraction result per ruling identifier; absent values
//!   are `None`, never guessed
//! - **Field**: a named slot in the record, with its canonical snake_case key
//! - **DocumentText**: the `normalized` (search) and `pretty` (line-structured)
//!   views of one ruling letter
//! - **BenchmarkSpec**: the canonical output field order
//!
//! ## Architecture
//!
//! Pure data and trait definitions only. Retrieval, LLM access and report
//! rendering live in other crates behind the traits in [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod benchmark;
pub mod document;
pub mod field;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use benchmark::{BenchmarkSpec, OutputSpec};
pub use document::DocumentText;
pub use field::Field;
pub use record::{Record, LINE_BREAK};
