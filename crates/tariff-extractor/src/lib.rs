//! Tariff Rulings Regex Extractor
//!
//! Pulls structured fields out of customs ruling letters with layered
//! pattern-matching heuristics.
//!
//! # Overview
//!
//! Ruling letters follow a loose house style: a header with the ruling
//! number, date and recipient block, a narrative description of the
//! merchandise, the classification analysis, and a signature. The letters
//! come from HTML exports, legacy `.doc` files and PDFs, so whitespace and
//! line structure are unreliable. Each extractor here targets one field (or
//! a small cluster) and expresses its fallbacks as an ordered table of
//! matchers.
//!
//! # Architecture
//!
//! ```text
//! raw text → text::document_from_raw → (normalized, pretty)
//!          → fields::* → RegexExtractor → Record
//! ```
//!
//! # Example Usage
//!
//! ```
//! use tariff_extractor::{text::document_from_raw, RegexExtractor};
//!
//! let doc = document_from_raw(
//!     "N000001",
//!     "The applicable subheading for the mug will be 6912.00.4810. \
//!      The rate of duty will be 9.8 percent ad valorem.",
//! );
//! let record = RegexExtractor::default().extract(&doc);
//!
//! assert_eq!(record.hts_decision.as_deref(), Some("6912.00.4810"));
//! assert_eq!(record.duty_rate.as_deref(), Some("9.8 percent ad valorem"));
//! assert_eq!(record.hts_suggestion, None);
//! ```

#![warn(missing_docs)]

mod assembler;
mod config;
mod error;
pub mod fields;
pub mod text;


pub use assembler::RegexExtractor;
pub use config::ExtractorConfig;
pub use error::ExtractorError;
