//! Base directory layout and input loaders.

use crate::error::{CliError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tariff_domain::{BenchmarkSpec, Record};
use tracing::{debug, info};

/// Locations of every input and output under a base directory.
#[derive(Debug, Clone)]
pub struct Layout {
    base_dir: PathBuf,
}

impl Layout {
    /// Layout rooted at `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Cached document text views.
    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join("cache")
    }

    /// `in/01_benchmarks/01_benchmark_spec.json`
    pub fn spec_path(&self) -> PathBuf {
        self.benchmarks_dir().join("01_benchmark_spec.json")
    }

    /// `in/01_benchmarks/02_benchmark_values.json`
    pub fn bench_values_path(&self) -> PathBuf {
        self.benchmarks_dir().join("02_benchmark_values.json")
    }

    /// `in/02_rulings/01_ruling_ids.json`
    pub fn ruling_ids_json_path(&self) -> PathBuf {
        self.rulings_dir().join("01_ruling_ids.json")
    }

    /// `in/02_rulings/01_ruling_ids.txt`
    pub fn ruling_ids_txt_path(&self) -> PathBuf {
        self.rulings_dir().join("01_ruling_ids.txt")
    }

    /// Raw extraction output directory.
    pub fn raw_dir(&self) -> PathBuf {
        self.base_dir.join("out").join("02_extractions_raw")
    }

    /// Comparison and triage output directory.
    pub fn checks_dir(&self) -> PathBuf {
        self.base_dir.join("out").join("03_checks")
    }

    /// Goal records from the regex extractor.
    pub fn regex_raw_path(&self) -> PathBuf {
        self.raw_dir().join("extract__regex__raw__all.json")
    }

    /// Goal records from the LLM extractor.
    pub fn llm_raw_path(&self) -> PathBuf {
        self.raw_dir().join("extract__llm__raw__all.json")
    }

    /// Triage report.
    pub fn triage_path(&self) -> PathBuf {
        self.checks_dir()
            .join("check__triage__bench_regex_llm__goal__all.json")
    }

    /// Regex vs benchmark report.
    pub fn bench_regex_path(&self) -> PathBuf {
        self.checks_dir().join("check__bench__regex__goal__all.json")
    }

    /// Regex vs LLM disagreement report.
    pub fn disagreement_path(&self) -> PathBuf {
        self.checks_dir()
            .join("check__disagreement__regex_llm__goal__all.json")
    }

    /// Create the cache and output directories.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [self.cache_dir(), self.raw_dir(), self.checks_dir()] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn benchmarks_dir(&self) -> PathBuf {
        self.base_dir.join("in").join("01_benchmarks")
    }

    fn rulings_dir(&self) -> PathBuf {
        self.base_dir.join("in").join("02_rulings")
    }
}

/// Trim ids, drop empties and duplicates; first occurrence wins.
pub fn normalize_ruling_ids<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    ids.into_iter()
        .map(|id| id.as_ref().trim().to_string())
        .filter(|id| !id.is_empty() && seen.insert(id.clone()))
        .collect()
}

/// Load ruling ids: the JSON file, else the text file, else `fallback`.
///
/// The JSON file holds a list, or an object with a `ruling_ids` list.
/// Numbers are accepted and stringified.
pub fn load_ruling_ids(layout: &Layout, fallback: &[String]) -> Result<Vec<String>> {
    let json_path = layout.ruling_ids_json_path();
    if json_path.exists() {
        let value: Value = serde_json::from_str(&fs::read_to_string(&json_path)?)?;
        let items = match &value {
            Value::Array(items) => items,
            Value::Object(obj) => match obj.get("ruling_ids") {
                Some(Value::Array(items)) => items,
                _ => return Err(ids_shape_error()),
            },
            _ => return Err(ids_shape_error()),
        };
        let ids = normalize_ruling_ids(items.iter().filter_map(id_text));
        info!("Loaded {} ruling ids from {}", ids.len(), json_path.display());
        return Ok(ids);
    }

    let txt_path = layout.ruling_ids_txt_path();
    if txt_path.exists() {
        let ids = normalize_ruling_ids(fs::read_to_string(&txt_path)?.lines());
        info!("Loaded {} ruling ids from {}", ids.len(), txt_path.display());
        return Ok(ids);
    }

    debug!("No ruling ids file, using {} fallback ids", fallback.len());
    Ok(normalize_ruling_ids(fallback))
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn ids_shape_error() -> CliError {
    CliError::InvalidInput(
        "01_ruling_ids.json must be a list or an object with a 'ruling_ids' list".to_string(),
    )
}

/// Load and validate the benchmark specification.
pub fn load_spec(layout: &Layout) -> Result<BenchmarkSpec> {
    let path = layout.spec_path();
    let json = fs::read_to_string(&path).map_err(|e| {
        CliError::Config(format!("Cannot read benchmark spec {}: {}", path.display(), e))
    })?;
    Ok(tariff_report::parse_spec(&json)?)
}

/// Load benchmark values; a missing file means no benchmark.
pub fn load_bench_values(layout: &Layout) -> Result<Vec<Record>> {
    load_records_if_exists(&layout.bench_values_path())
}

/// Load a record file, or nothing when it does not exist.
pub fn load_records_if_exists(path: &Path) -> Result<Vec<Record>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    Ok(tariff_report::parse_records(&fs::read_to_string(path)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: PathBuf, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_normalize_ruling_ids() {
        let ids = normalize_ruling_ids([" N1 ", "", "N2", "N1", "  "]);
        assert_eq!(ids, vec!["N1", "N2"]);
    }

    #[test]
    fn test_ids_from_json_list() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        write(layout.ruling_ids_json_path(), r#"["N1", " N2", "N1", 42]"#);

        let ids = load_ruling_ids(&layout, &[]).unwrap();
        assert_eq!(ids, vec!["N1", "N2", "42"]);
    }

    #[test]
    fn test_ids_from_json_object() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        write(layout.ruling_ids_json_path(), r#"{"ruling_ids": ["N3"]}"#);
        assert_eq!(load_ruling_ids(&layout, &[]).unwrap(), vec!["N3"]);

        write(layout.ruling_ids_json_path(), r#"{"ids": ["N3"]}"#);
        assert!(matches!(
            load_ruling_ids(&layout, &[]),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ids_from_text_then_fallback() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        let fallback = vec!["N9".to_string()];
        assert_eq!(load_ruling_ids(&layout, &fallback).unwrap(), vec!["N9"]);

        write(layout.ruling_ids_txt_path(), "N4\n\nN5\n");
        assert_eq!(load_ruling_ids(&layout, &fallback).unwrap(), vec!["N4", "N5"]);
    }

    #[test]
    fn test_missing_spec_is_config_error() {
        let dir = TempDir::new().unwrap();
        let layout = Layout::new(dir.path());
        assert!(matches!(load_spec(&layout), Err(CliError::Config(_))));
        assert!(load_bench_values(&layout).unwrap().is_empty());
    }
}
