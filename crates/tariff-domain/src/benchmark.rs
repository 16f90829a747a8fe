//! Benchmark specification - canonical output schema

use crate::field::Field;
use serde::{Deserialize, Serialize};

/// Benchmark specification
///
/// Only the `output` section is read; any other keys in the benchmark file
/// are ignored. Field keys not in [`Field`] fail deserialization, since a
/// fixed-schema record cannot carry them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkSpec {
    /// Output schema
    pub output: OutputSpec,
}

/// Output section of the benchmark specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Canonical field order of every exported record
    pub field_order: Vec<Field>,
}

impl BenchmarkSpec {
    /// Create a spec with an explicit field order
    pub fn new(field_order: Vec<Field>) -> Self {
        Self {
            output: OutputSpec { field_order },
        }
    }

    /// Canonical field order
    pub fn field_order(&self) -> &[Field] {
        &self.output.field_order
    }

    /// Validate the benchmark field order
    ///
    /// The identifier must be part of the order (records are matched across
    /// sources by it) and no field may appear twice.
    pub fn validate(&self) -> Result<(), String> {
        let order = self.field_order();
        if !order.contains(&Field::RulingId) {
            return Err("field_order must include ruling_id".to_string());
        }
        for (idx, field) in order.iter().enumerate() {
            if order[..idx].contains(field) {
                return Err(format!("field_order lists '{}' more than once", field));
            }
        }
        Ok(())
    }
}

impl Default for BenchmarkSpec {
    /// Every field in [`Field::ALL`] order
    fn default() -> Self {
        Self::new(Field::ALL.to_vec())
    }
}
