//! Loading backend documents from a file or over HTTP.
//!
//! Transport stays outside the series layer; this module only turns a
//! `FILE_OR_URL` argument into bytes and JSON for the CLI.

mod client;

pub use client::{BasicClient, HttpClient};

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Url(String),
}

impl Source {
    /// `http(s)://…` is fetched as-is, `/api/…` is joined onto `base_url`, and
    /// anything else is a local path.
    pub fn resolve(source: &str, base_url: &str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            Source::Url(source.to_string())
        } else if source.starts_with("/api/") {
            Source::Url(format!("{}{}", base_url.trim_end_matches('/'), source))
        } else {
            Source::File(PathBuf::from(source))
        }
    }
}

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("Backend returned status {}: {}", status, body);
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Reads the raw bytes of a document.
#[tracing::instrument(skip(client))]
pub async fn load_source<C: HttpClient>(client: &C, source: &Source) -> Result<Vec<u8>> {
    let bytes = match source {
        Source::Url(url) => fetch_bytes(client, url)
            .await
            .with_context(|| format!("failed to fetch {url}"))?,
        Source::File(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
    };
    debug!(bytes = bytes.len(), "Document loaded");
    Ok(bytes)
}

/// Loads a document and decodes it as `T`.
pub async fn load_json<C: HttpClient, T: DeserializeOwned>(client: &C, source: &Source) -> Result<T> {
    let bytes = load_source(client, source).await?;
    serde_json::from_slice(&bytes).with_context(|| format!("invalid JSON in {source:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::StudentListing;
    use std::env;
    use std::fs;
    use std::time::Duration;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_resolve_absolute_url() {
        assert_eq!(
            Source::resolve("https://example.org/x.json", "http://127.0.0.1:5001"),
            Source::Url("https://example.org/x.json".to_string())
        );
    }

    #[test]
    fn test_resolve_api_path_against_base() {
        assert_eq!(
            Source::resolve("/api/courses", "http://127.0.0.1:5001/"),
            Source::Url("http://127.0.0.1:5001/api/courses".to_string())
        );
    }

    #[test]
    fn test_resolve_local_path() {
        assert_eq!(
            Source::resolve("data/record.json", "http://127.0.0.1:5001"),
            Source::File(PathBuf::from("data/record.json"))
        );
    }

    #[tokio::test]
    async fn test_load_json_from_file() {
        let path = temp_path("engagement_series_test_students.json");
        fs::write(&path, r#"{"students": [{"student_id": 3}, {"student_id": "4"}]}"#).unwrap();

        let client = BasicClient::new(Duration::from_secs(1)).unwrap();
        let listing: StudentListing = load_json(&client, &Source::File(path.clone()))
            .await
            .unwrap();

        assert_eq!(listing.students.len(), 2);
        assert_eq!(listing.students[0].student_id, "3");

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_load_missing_file_errors() {
        let client = BasicClient::new(Duration::from_secs(1)).unwrap();
        let result = load_source(&client, &Source::File(temp_path("engagement_series_missing.json"))).await;
        assert!(result.is_err());
    }
}
