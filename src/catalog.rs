// Gitabase Reader - Scripture Library Core
// Copyright (C) 2025 Gitabase contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Gitabase descriptions for scan enrichment
//!
//! The catalog supplies human titles and freshness data for known
//! (type, lang) pairs. It is strictly optional: the scanner works without a
//! source, and every failure here degrades to identity-derived defaults.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{GitabaseError, Result};
use crate::identity::GitabaseId;

/// Default catalog request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// One catalog record describing a Gitabase
///
/// Matching against discovered files is by (type, lang), compared
/// case-insensitively because catalog data is hand-maintained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitabaseDescription {
    #[serde(rename = "type")]
    pub content_type: String,
    pub lang: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version: Option<i64>,
}

impl GitabaseDescription {
    /// Whether this record describes the given identity
    pub fn matches(&self, id: &GitabaseId) -> bool {
        self.content_type.eq_ignore_ascii_case(id.content_type.as_str())
            && self.lang.eq_ignore_ascii_case(id.lang.as_str())
    }
}

/// Source of Gitabase descriptions
///
/// Implementations must be cheap to call repeatedly; the scanner fetches
/// once per scan.
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    async fn descriptions(&self) -> Result<Vec<GitabaseDescription>>;
}

/// In-memory description source
///
/// Used for bundled catalog data and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDescriptions {
    entries: Vec<GitabaseDescription>,
}

impl StaticDescriptions {
    pub fn new(entries: Vec<GitabaseDescription>) -> Self {
        Self { entries }
    }

    /// Parse a JSON array of description records
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<GitabaseDescription> = serde_json::from_str(json)?;
        Ok(Self { entries })
    }
}

#[async_trait]
impl DescriptionSource for StaticDescriptions {
    async fn descriptions(&self) -> Result<Vec<GitabaseDescription>> {
        Ok(self.entries.clone())
    }
}

/// Description source backed by a single HTTP endpoint
///
/// Expects a JSON array of [`GitabaseDescription`] records. Network and
/// decode failures come back as typed errors; the scanner treats them as
/// non-fatal.
#[derive(Debug, Clone)]
pub struct HttpDescriptionSource {
    client: Client,
    url: String,
}

impl HttpDescriptionSource {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Gitabase/1.0 (core)")
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DescriptionSource for HttpDescriptionSource {
    async fn descriptions(&self) -> Result<Vec<GitabaseDescription>> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GitabaseError::catalog_failed(
                format!("GET {} returned {}", self.url, status),
                Some(status.as_u16()),
            ));
        }

        let entries: Vec<GitabaseDescription> = response
            .json()
            .await
            .map_err(|e| GitabaseError::InvalidCatalogResponse(e.to_string()))?;

        tracing::debug!(url = %self.url, count = entries.len(), "fetched gitabase descriptions");
        Ok(entries)
    }
}
