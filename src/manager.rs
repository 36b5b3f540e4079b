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


//! Gitabase library manager
//!
//! The composition root of the core: one manager owns the registry, the
//! connection cache, and the scanner, and wires them into the operations
//! the host app calls. The host keeps exactly one manager for the process
//! lifetime and hands its registry watchers to the UI.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::catalog::{DescriptionSource, HttpDescriptionSource};
use crate::error::{GitabaseError, Result};
use crate::file::paths::{default_gitabase_dir, gitabase_path};
use crate::file::scanner::GitabaseScanner;
use crate::identity::{parse_file_name, FileNameError, GitabaseId};
use crate::registry::GitabaseRegistry;
use crate::storage::cache::{ConnectionCache, DEFAULT_MAX_OPEN_HANDLES};
use crate::storage::handle::{inspect_gitabase_file, GitabaseHandle};
use crate::storage::models::Gitabase;

/// Library configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitabaseConfig {
    /// Folder the scanner walks for database files
    pub folder: PathBuf,

    /// Maximum simultaneously open database handles
    pub max_open_handles: usize,

    /// Catalog endpoint for scan enrichment; `None` disables enrichment
    pub catalog_url: Option<String>,
}

impl Default for GitabaseConfig {
    fn default() -> Self {
        Self {
            folder: default_gitabase_dir(),
            max_open_handles: DEFAULT_MAX_OPEN_HANDLES,
            catalog_url: None,
        }
    }
}

/// Owns and wires the core's components
pub struct GitabaseManager {
    registry: Arc<GitabaseRegistry>,
    cache: ConnectionCache,
    scanner: GitabaseScanner,
}

impl GitabaseManager {
    /// Build a manager from configuration
    ///
    /// A configured catalog URL becomes an [`HttpDescriptionSource`]; use
    /// [`GitabaseManager::with_description_source`] to supply a custom one.
    pub fn new(config: GitabaseConfig) -> Result<Self> {
        let source: Option<Arc<dyn DescriptionSource>> = match &config.catalog_url {
            Some(url) => Some(Arc::new(HttpDescriptionSource::new(url.clone())?)),
            None => None,
        };
        Ok(Self::build(config, source))
    }

    pub fn with_description_source(
        config: GitabaseConfig,
        source: Arc<dyn DescriptionSource>,
    ) -> Self {
        Self::build(config, Some(source))
    }

    fn build(config: GitabaseConfig, source: Option<Arc<dyn DescriptionSource>>) -> Self {
        let registry = Arc::new(GitabaseRegistry::new());
        registry.set_folder(&config.folder);

        let scanner = match source {
            Some(source) => GitabaseScanner::with_description_source(source),
            None => GitabaseScanner::new(),
        };

        Self {
            registry,
            cache: ConnectionCache::new(config.max_open_handles),
            scanner,
        }
    }

    /// The observable registry, for UI binding
    pub fn registry(&self) -> &Arc<GitabaseRegistry> {
        &self.registry
    }

    /// Folder currently scanned for databases
    pub fn folder(&self) -> PathBuf {
        self.registry.folder().unwrap_or_else(default_gitabase_dir)
    }

    /// Point the library at a different folder
    ///
    /// Does not scan; call [`GitabaseManager::rescan`] afterwards.
    pub fn set_folder(&self, folder: &Path) {
        self.registry.set_folder(folder);
    }

    // ===== Scanning =====

    /// Scan the library folder and replace the registry's descriptor set
    ///
    /// After the replace, cached handles whose databases vanished from the
    /// folder are closed, so the cache never outlives the registry set.
    pub async fn rescan(&self) -> Result<Vec<Gitabase>> {
        let folder = self.folder();
        let found = self.scanner.scan(&folder).await?;

        let ids: HashSet<GitabaseId> = found.iter().map(|g| g.id.clone()).collect();
        self.registry.set_all(found.clone());
        self.cache.retain(&ids).await;

        Ok(found)
    }

    // ===== Opening =====

    /// Get an open handle for the given Gitabase
    ///
    /// The path comes from the registered descriptor; an unregistered id
    /// falls back to its canonical file name inside the library folder, so
    /// a caller restoring a persisted selection key works before the first
    /// scan finishes.
    pub async fn open(&self, id: &GitabaseId) -> Result<GitabaseHandle> {
        let path = match self.registry.find(id) {
            Some(gitabase) => gitabase.file_path,
            None => gitabase_path(&self.folder(), id),
        };
        self.cache.get(id, &path).await
    }

    // ===== Incremental registration =====

    /// Validate a single file and register it without a full rescan
    ///
    /// Used after a manual copy or import. Unlike the scanner this is loud:
    /// a file that fails validation is the whole point of the call, so it
    /// comes back as a typed error instead of a silent skip.
    pub async fn add_gitabase(&self, path: &Path) -> Result<Gitabase> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GitabaseError::InvalidPath(path.display().to_string()))?;

        let id = match parse_file_name(name) {
            Ok(id) => id,
            Err(FileNameError::MissingMarker) => GitabaseId::fallback(),
            Err(e) => return Err(GitabaseError::invalid_file_name(name, e.to_string())),
        };

        let inspection = inspect_gitabase_file(path)
            .await
            .map_err(|e| GitabaseError::not_a_gitabase(path.display().to_string(), e.to_string()))?;
        if !inspection.has_books {
            return Err(GitabaseError::not_a_gitabase(
                path.display().to_string(),
                "no books table",
            ));
        }

        let mut gitabase = Gitabase::new(id, path.to_path_buf());
        gitabase.version = inspection.user_version;
        gitabase.has_translation = inspection.has_translation;
        if let Ok(metadata) = fs::metadata(path).await {
            gitabase.last_modified = metadata.modified().ok().map(Into::into);
        }

        // A re-import under an already registered id supersedes it
        self.cache.close(&gitabase.id).await;
        self.registry.add(gitabase.clone());
        tracing::info!(gitabase = %gitabase.id, path = %path.display(), "registered gitabase");

        Ok(gitabase)
    }

    /// Deregister a Gitabase and close its cached handle
    ///
    /// The database file stays on disk; see
    /// [`GitabaseManager::delete_gitabase`].
    pub async fn remove_gitabase(&self, id: &GitabaseId) -> Result<Gitabase> {
        self.cache.close(id).await;
        self.registry
            .remove(id)
            .ok_or_else(|| GitabaseError::GitabaseNotFound(id.key()))
    }

    /// Deregister a Gitabase and delete its file
    pub async fn delete_gitabase(&self, id: &GitabaseId) -> Result<()> {
        let gitabase = self.remove_gitabase(id).await?;
        fs::remove_file(&gitabase.file_path).await.map_err(|e| {
            GitabaseError::FileIoError(format!(
                "Failed to delete {}: {}",
                gitabase.file_path.display(),
                e
            ))
        })?;
        tracing::info!(gitabase = %id, "deleted gitabase file");
        Ok(())
    }

    // ===== Selection =====

    /// Select the current Gitabase by id
    pub fn set_current(&self, id: &GitabaseId) -> Result<Gitabase> {
        self.registry
            .set_current(id)
            .ok_or_else(|| GitabaseError::GitabaseNotFound(id.key()))
    }

    /// Identity of the current selection
    pub fn current_id(&self) -> Result<GitabaseId> {
        self.registry
            .current()
            .map(|g| g.id)
            .ok_or(GitabaseError::NoCurrentGitabase)
    }

    // ===== Teardown =====

    /// Close every cached handle; called at process teardown
    pub async fn shutdown(&self) {
        self.cache.close_all().await;
        tracing::info!("gitabase manager shut down");
    }

    /// Number of currently open database handles
    pub async fn open_handles(&self) -> usize {
        self.cache.len().await
    }
}
