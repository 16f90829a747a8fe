//! Tariff CLI library.
//!
//! This library provides the pieces behind the `tariff` binary: configuration
//! loading, the base directory layout, the file-backed document source, the
//! end-to-end pipeline, and output formatting.

pub mod cli;
pub mod config;
pub mod error;
pub mod inputs;
pub mod output;
pub mod pipeline;
pub mod source;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use inputs::Layout;
pub use output::{Formatter, OutputFormat};
pub use pipeline::{Pipeline, RunReport};
pub use source::FileDocumentSource;
