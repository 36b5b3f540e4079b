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


//! Fallible row mapping with a skip-on-failure policy
//!
//! Gitabase files come from outside the app, so any row may carry junk. A
//! listing must survive that: each row maps through a fallible function,
//! and a failed row is logged and dropped instead of aborting the whole
//! result. NULL columns are not failures; they decode to typed defaults
//! through the accessors below.

use futures_util::stream::BoxStream;
use futures_util::TryStreamExt;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::error::Result;

/// Fold rows through a fallible mapper, skipping rows that fail
///
/// `context` names the listing for the log line.
pub fn collect_rows<T, F>(rows: Vec<SqliteRow>, context: &str, map: F) -> Vec<T>
where
    F: Fn(&SqliteRow) -> Result<T>,
{
    let mut items = Vec::with_capacity(rows.len());
    for row in &rows {
        match map(row) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!(context, error = %e, "skipping unmappable row");
            }
        }
    }
    items
}

/// Fold a row stream through a fallible mapper, skipping rows that fail
///
/// Same policy as [`collect_rows`] but consumes rows as the driver produces
/// them, so large listings never buffer twice. A stream-level error is a
/// query failure and still propagates; only per-row mapping failures are
/// skipped.
pub async fn collect_stream<'a, T, F>(
    mut rows: BoxStream<'a, std::result::Result<SqliteRow, sqlx::Error>>,
    context: &str,
    map: F,
) -> Result<Vec<T>>
where
    F: Fn(&SqliteRow) -> Result<T>,
{
    let mut items = Vec::new();
    while let Some(row) = rows.try_next().await? {
        match map(&row) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!(context, error = %e, "skipping unmappable row");
            }
        }
    }
    Ok(items)
}

/// Read a text column, treating NULL as empty
pub fn text_or_empty(row: &SqliteRow, column: &str) -> Result<String> {
    Ok(row.try_get::<Option<String>, _>(column)?.unwrap_or_default())
}

/// Read a nullable text column
pub fn opt_text(row: &SqliteRow, column: &str) -> Result<Option<String>> {
    Ok(row.try_get::<Option<String>, _>(column)?)
}

/// Read an integer column with a typed default for NULL
pub fn int_or(row: &SqliteRow, column: &str, default: i64) -> Result<i64> {
    Ok(row.try_get::<Option<i64>, _>(column)?.unwrap_or(default))
}

/// Read a nullable integer column
pub fn opt_int(row: &SqliteRow, column: &str) -> Result<Option<i64>> {
    Ok(row.try_get::<Option<i64>, _>(column)?)
}

/// Read an integer column as a boolean flag, NULL counting as false
pub fn flag(row: &SqliteRow, column: &str) -> Result<bool> {
    Ok(int_or(row, column, 0)? != 0)
}

/// Read a blob column, treating NULL as empty
///
/// Accepts TEXT cells too; image payloads are base64 text stored under a
/// BLOB-declared column and arrive through here as the string's bytes.
pub fn blob_or_empty(row: &SqliteRow, column: &str) -> Result<Vec<u8>> {
    Ok(row.try_get::<Option<Vec<u8>>, _>(column)?.unwrap_or_default())
}
