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


//! Open connection to a single Gitabase file
//!
//! Gitabase databases ship read-only: the app never writes them, so every
//! handle opens with `mode=ro` and never creates a missing file. The handle
//! wraps a small sqlx pool; clones share the pool, and closing any clone
//! closes them all.

use crate::error::{GitabaseError, Result};
use crate::identity::GitabaseId;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    ConnectOptions,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// An open, read-only Gitabase database
#[derive(Debug, Clone)]
pub struct GitabaseHandle {
    id: GitabaseId,
    path: PathBuf,
    pool: SqlitePool,
}

impl GitabaseHandle {
    /// Open the database file at `path` under the given identity
    ///
    /// # Errors
    /// Returns error if the file does not exist or the pool cannot connect.
    /// A file that is not SQLite at all connects lazily and fails on the
    /// first query instead; use [`inspect_gitabase_file`] to validate
    /// content up front.
    pub async fn open(id: GitabaseId, path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(GitabaseError::FileNotFound(path.display().to_string()));
        }

        let connection_string = format!("sqlite://{}?mode=ro", path.display());
        let mut connect_opts = SqliteConnectOptions::from_str(&connection_string)?
            .read_only(true)
            .create_if_missing(false)
            .busy_timeout(Duration::from_secs(30));

        // Disable logging for production use
        connect_opts = connect_opts.disable_statement_logging();

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(connect_opts)
            .await?;

        tracing::debug!(gitabase = %id, path = %path.display(), "opened gitabase");

        Ok(Self {
            id,
            path: path.to_path_buf(),
            pool,
        })
    }

    /// Identity this handle was opened under
    pub fn id(&self) -> &GitabaseId {
        &self.id
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get reference to the connection pool
    ///
    /// Use this to execute queries directly on the pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database and release all connections
    ///
    /// Waits for in-flight queries to finish. Closing an already closed
    /// handle is a no-op.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!(gitabase = %self.id, "closed gitabase");
    }

    /// Whether the underlying pool has been closed
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// What a content probe found inside a candidate database file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitabaseInspection {
    /// The `books` table exists, which marks a real Gitabase
    pub has_books: bool,
    /// Schema version from `PRAGMA user_version`
    pub user_version: i64,
    /// A `translations` table is present
    pub has_translation: bool,
}

/// Probe a file's content with a short-lived read-only connection
///
/// Opens the path as SQLite and reads the markers the scanner needs. A file
/// that is not SQLite fails the first query, so garbage comes back as `Err`
/// rather than a zeroed inspection.
pub async fn inspect_gitabase_file(path: &Path) -> Result<GitabaseInspection> {
    let connection_string = format!("sqlite://{}?mode=ro", path.display());
    let connect_opts = SqliteConnectOptions::from_str(&connection_string)?
        .read_only(true)
        .create_if_missing(false)
        .busy_timeout(Duration::from_secs(30))
        .disable_statement_logging();

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .connect_with(connect_opts)
        .await?;

    let result = inspect_with_pool(&pool).await;
    pool.close().await;
    result
}

async fn inspect_with_pool(pool: &SqlitePool) -> Result<GitabaseInspection> {
    let has_books: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'books'",
    )
    .fetch_one(pool)
    .await?;

    let user_version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;

    let has_translation: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'translations'",
    )
    .fetch_one(pool)
    .await?;

    Ok(GitabaseInspection {
        has_books: has_books > 0,
        user_version,
        has_translation: has_translation > 0,
    })
}
