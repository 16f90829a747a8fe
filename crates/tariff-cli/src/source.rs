//! File-backed document source.

use crate::error::{CliError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tariff_domain::traits::DocumentSource;
use tariff_domain::DocumentText;
use tariff_extractor::text::document_from_raw;
use tracing::debug;

/// Reads ruling text from a cache directory.
///
/// For ruling `N1` it looks for `N1.normalized.txt` plus `N1.pretty.txt`.
/// When those are missing but a raw `N1.txt` exists, both views are derived
/// from it and written back to the cache.
#[derive(Debug, Clone)]
pub struct FileDocumentSource {
    cache_dir: PathBuf,
}

impl FileDocumentSource {
    /// Source over `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// The cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn path(&self, id: &str, suffix: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.{}", id, suffix))
    }
}

impl DocumentSource for FileDocumentSource {
    type Error = CliError;

    fn fetch(&self, id: &str) -> Result<DocumentText> {
        if id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(CliError::InvalidInput(format!("Bad ruling id '{}'", id)));
        }

        let normalized_path = self.path(id, "normalized.txt");
        let pretty_path = self.path(id, "pretty.txt");
        if normalized_path.exists() && pretty_path.exists() {
            debug!("Cache hit for {}", id);
            return Ok(DocumentText::new(
                id,
                fs::read_to_string(&normalized_path)?,
                fs::read_to_string(&pretty_path)?,
            ));
        }

        let raw_path = self.path(id, "txt");
        if !raw_path.exists() {
            return Err(CliError::DocumentNotFound(id.to_string()));
        }

        let document = document_from_raw(id, &fs::read_to_string(&raw_path)?);
        fs::write(&normalized_path, &document.normalized)?;
        fs::write(&pretty_path, &document.pretty)?;
        debug!("Derived text views for {} from {}", id, raw_path.display());
        Ok(document)
    }
}
