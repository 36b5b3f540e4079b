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


//! Gitabase folder scanner
//!
//! Turns a folder of files into a set of validated [`Gitabase`] descriptors.
//! Discovery is best-effort: a file that is not a usable Gitabase (wrong
//! extension, empty, not SQLite, no `books` table, unparseable name) is
//! skipped with a log line, never reported as a failure. Only a broken walk
//! of the folder itself fails the scan.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

use crate::catalog::DescriptionSource;
use crate::error::{GitabaseError, Result};
use crate::file::paths::is_database_file;
use crate::identity::{parse_file_name, FileNameError, GitabaseId};
use crate::storage::handle::inspect_gitabase_file;
use crate::storage::models::Gitabase;

/// Scans a folder for valid Gitabase database files
///
/// An optional [`DescriptionSource`] enriches discovered descriptors with
/// catalog titles; without one (or with a failing one) descriptors keep
/// their identity-derived defaults.
pub struct GitabaseScanner {
    descriptions: Option<Arc<dyn DescriptionSource>>,
}

impl GitabaseScanner {
    pub fn new() -> Self {
        Self { descriptions: None }
    }

    pub fn with_description_source(source: Arc<dyn DescriptionSource>) -> Self {
        Self {
            descriptions: Some(source),
        }
    }

    /// Scan `folder` for Gitabase files
    ///
    /// Lists immediate children only; subdirectories are not entered. Every
    /// `.db` file (case-insensitive) is validated by opening it read-only
    /// and checking `sqlite_master` for a `books` table.
    ///
    /// # Errors
    /// Returns [`GitabaseError::InvalidPath`] when `folder` does not exist
    /// or is not a directory, and a file I/O error when the walk itself
    /// breaks. Invalid candidate files are not errors.
    pub async fn scan(&self, folder: &Path) -> Result<Vec<Gitabase>> {
        if !folder.exists() {
            return Err(GitabaseError::InvalidPath(format!(
                "Folder does not exist: {}",
                folder.display()
            )));
        }

        if !folder.is_dir() {
            return Err(GitabaseError::InvalidPath(format!(
                "Path is not a directory: {}",
                folder.display()
            )));
        }

        let mut entries = fs::read_dir(folder).await.map_err(|e| {
            GitabaseError::FileIoError(format!(
                "Failed to read folder {}: {}",
                folder.display(),
                e
            ))
        })?;

        let mut found: Vec<Gitabase> = Vec::new();
        let mut seen: HashSet<GitabaseId> = HashSet::new();

        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            GitabaseError::FileIoError(format!(
                "Failed to read entry in {}: {}",
                folder.display(),
                e
            ))
        })? {
            let path = entry.path();
            if path.is_dir() || !is_database_file(&path) {
                continue;
            }

            let Some(gitabase) = self.process_candidate(&path).await else {
                continue;
            };

            // First file found under an id wins; the registry is keyed by id
            if !seen.insert(gitabase.id.clone()) {
                tracing::warn!(
                    gitabase = %gitabase.id,
                    path = %path.display(),
                    "duplicate gitabase id, keeping the first file found"
                );
                continue;
            }

            found.push(gitabase);
        }

        self.enrich(&mut found).await;

        tracing::info!(
            folder = %folder.display(),
            count = found.len(),
            "gitabase scan complete"
        );
        Ok(found)
    }

    /// Validate one candidate file, returning `None` when it is skipped
    async fn process_candidate(&self, path: &Path) -> Option<Gitabase> {
        let metadata = match fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return None,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping unreadable file");
                return None;
            }
        };

        if metadata.len() == 0 {
            tracing::debug!(path = %path.display(), "skipping empty file");
            return None;
        }

        let name = path.file_name()?.to_str()?;
        let id = match parse_file_name(name) {
            Ok(id) => id,
            Err(FileNameError::MissingMarker) => {
                // The file may still prove to be a Gitabase below; register
                // it under the fallback identity rather than losing it
                tracing::debug!(path = %path.display(), "no gitabase marker, using fallback identity");
                GitabaseId::fallback()
            }
            Err(FileNameError::Malformed(reason)) => {
                tracing::debug!(path = %path.display(), %reason, "skipping malformed gitabase name");
                return None;
            }
        };

        // Authoritative check: the file must open as SQLite and carry books
        let inspection = match inspect_gitabase_file(path).await {
            Ok(inspection) => inspection,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping non-database file");
                return None;
            }
        };
        if !inspection.has_books {
            tracing::debug!(path = %path.display(), "skipping database without a books table");
            return None;
        }

        let mut gitabase = Gitabase::new(id, path.to_path_buf());
        gitabase.version = inspection.user_version;
        gitabase.has_translation = inspection.has_translation;
        gitabase.last_modified = metadata.modified().ok().map(DateTime::<Utc>::from);

        Some(gitabase)
    }

    /// Apply catalog titles to the discovered descriptors
    ///
    /// A failing source leaves every descriptor unchanged.
    async fn enrich(&self, gitabases: &mut [Gitabase]) {
        let Some(source) = &self.descriptions else {
            return;
        };

        let descriptions = match source.descriptions().await {
            Ok(descriptions) => descriptions,
            Err(e) => {
                tracing::warn!(error = %e, "catalog unavailable, keeping default titles");
                return;
            }
        };

        for gitabase in gitabases.iter_mut() {
            let Some(description) = descriptions.iter().find(|d| d.matches(&gitabase.id)) else {
                continue;
            };

            if !description.title.is_empty() {
                gitabase.title = description.title.clone();
            }
            if let Some(last_modified) = description.last_modified {
                gitabase.last_modified = Some(last_modified);
            }
            if let Some(version) = description.version {
                gitabase.version = version;
            }
        }
    }
}

impl Default for GitabaseScanner {
    fn default() -> Self {
        Self::new()
    }
}
