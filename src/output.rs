//! Output of chart-ready series.
//!
//! Supports pretty-printing to the log, JSON logging, and writing JSON files.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty-printed JSON, replacing any existing file.
///
/// Creates missing parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let body = serde_json::to_vec_pretty(value)?;
    fs::write(path, &body).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), bytes = body.len(), "JSON written");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::bucketize_hours;
    use std::env;

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&bucketize_hours(&[]));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&bucketize_hours(&[])).unwrap();
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let dir = env::temp_dir().join("engagement_series_test_out");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested/buckets.json");

        write_json(&path, &bucketize_hours(&[])).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 8);
        assert_eq!(parsed[0]["label"], "12 AM");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_json_overwrites() {
        let path = env::temp_dir().join("engagement_series_test_overwrite.json");
        write_json(&path, &vec![1, 2, 3]).unwrap();
        write_json(&path, &vec![4]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(serde_json::from_str::<Vec<u32>>(&content).unwrap(), vec![4]);

        fs::remove_file(&path).unwrap();
    }
}
