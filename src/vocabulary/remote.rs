//! Download of the latest released export from a vocabulary registry API.
//!
//! Requires the `remote` feature. Resolution takes two requests:
//!
//! 1. `GET {api_url}/vocabularies/{name}/releases/latest` returns the release
//!    document, whose `exportUrl` points at the export file
//! 2. `GET {exportUrl}` returns the export bytes
//!
//! Both requests share the caller-supplied timeout.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{Result, VocabError};

/// Release document of a vocabulary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyRelease {
    #[serde(default)]
    pub key: Option<i64>,
    #[serde(default)]
    pub vocabulary_key: Option<i64>,
    #[serde(default)]
    pub version: Option<String>,
    pub export_url: String,
}

/// Client for a vocabulary registry API.
#[derive(Debug, Clone)]
pub struct RemoteExportClient {
    client: Client,
    api_url: String,
}

impl RemoteExportClient {
    /// Create a client for `api_url` whose requests time out after `timeout`.
    pub fn new<S: Into<String>>(api_url: S, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VocabError::remote(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// URL of the latest release document for `vocabulary_name`.
    pub fn latest_release_url(&self, vocabulary_name: &str) -> String {
        format!(
            "{}/vocabularies/{}/releases/latest",
            self.api_url.trim_end_matches('/'),
            vocabulary_name
        )
    }

    /// Resolve the latest release of `vocabulary_name`.
    pub fn latest_release(&self, vocabulary_name: &str) -> Result<VocabularyRelease> {
        let url = self.latest_release_url(vocabulary_name);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| VocabError::remote(format!("Request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(VocabError::remote(format!(
                "No release found for vocabulary '{vocabulary_name}' ({}): {url}",
                response.status()
            )));
        }

        let release: VocabularyRelease = response
            .json()
            .map_err(|e| VocabError::remote(format!("Invalid release document at {url}: {e}")))?;
        log::info!(
            "Resolved release {} of vocabulary '{vocabulary_name}': {}",
            release.version.as_deref().unwrap_or("?"),
            release.export_url
        );
        Ok(release)
    }

    /// Download the export bytes of `release`.
    pub fn download_export(&self, release: &VocabularyRelease) -> Result<Vec<u8>> {
        let url = &release.export_url;
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| VocabError::remote(format!("Request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(VocabError::remote(format!(
                "Export download failed ({}): {url}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| VocabError::remote(format!("Failed to read export from {url}: {e}")))?;
        Ok(bytes.to_vec())
    }

    /// Resolve and download the latest export of `vocabulary_name`.
    pub fn fetch_latest_export(&self, vocabulary_name: &str) -> Result<Vec<u8>> {
        let release = self.latest_release(vocabulary_name)?;
        self.download_export(&release)
    }
}
