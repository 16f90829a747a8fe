//! Field extractors
//!
//! Each submodule targets one field or a small cluster of related fields.
//! Extractors are pure functions of text: they never fetch documents and
//! never fail. When a heuristic finds nothing the field stays `None` rather
//! than being guessed.

pub mod dates;
pub mod description;
pub mod duty;
pub mod hts;
pub mod parties;
mod signature;

pub use dates::extract_dates;
pub use description::extract_product_description;
pub use duty::extract_duty_rate;
pub use hts::extract_hts_codes;
pub use parties::{extract_parties_people, Parties};
